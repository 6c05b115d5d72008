//! Polls, the CFP ranking and conference standings.
//!
//! Everything here is a pure read over the league except [`apply_ranks`],
//! which writes the `rank` field of every team record.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::config::RankingConfig;
use crate::models::{Conference, League, Team, TeamId};

pub const TOP_25: usize = 25;

fn poll_order(a: &Team, b: &Team) -> Ordering {
    let (ra, rb) = (&a.record, &b.record);
    rb.wins
        .cmp(&ra.wins)
        .then(ra.losses.cmp(&rb.losses))
        .then(rb.point_differential().cmp(&ra.point_differential()))
        .then(b.prestige.cmp(&a.prestige))
}

/// Wins, fewest losses, point differential, prestige.
pub fn ap_poll(league: &League, size: usize) -> Vec<&Team> {
    let mut teams: Vec<&Team> = league.teams().iter().collect();
    teams.sort_by(|a, b| poll_order(a, b));
    teams.truncate(size);
    teams
}

pub fn ap_top25(league: &League) -> Vec<&Team> {
    ap_poll(league, TOP_25)
}

/// Same ordering as the AP poll.
pub fn coaches_poll(league: &League, size: usize) -> Vec<&Team> {
    ap_poll(league, size)
}

pub fn coaches_top25(league: &League) -> Vec<&Team> {
    coaches_poll(league, TOP_25)
}

/// `wins * win_weight - losses * loss_weight + prestige`
pub fn cfp_score(team: &Team, config: &RankingConfig) -> i64 {
    i64::from(team.record.wins) * config.cfp_win_weight - i64::from(team.record.losses) * config.cfp_loss_weight
        + i64::from(team.prestige)
}

pub fn cfp_ranking<'a>(league: &'a League, config: &RankingConfig, size: usize) -> Vec<&'a Team> {
    let mut teams: Vec<&Team> = league.teams().iter().collect();
    teams.sort_by_key(|t| std::cmp::Reverse(cfp_score(t, config)));
    teams.truncate(size);
    teams
}

pub fn cfp_top25<'a>(league: &'a League, config: &RankingConfig) -> Vec<&'a Team> {
    cfp_ranking(league, config, TOP_25)
}

/// Conference wins, overall wins, prestige.
pub fn conference_standings(league: &League, conference: Conference) -> Vec<&Team> {
    let mut teams = league.conference_members(conference);
    teams.sort_by(|a, b| {
        b.record
            .conf_wins
            .cmp(&a.record.conf_wins)
            .then(b.record.wins.cmp(&a.record.wins))
            .then(b.prestige.cmp(&a.prestige))
    });
    teams
}

fn team_ids(teams: Vec<&Team>) -> Vec<TeamId> {
    teams.into_iter().map(|t| t.id.clone()).collect()
}

/// The ranking that drives `rank` in `week`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RankSource {
    Ap,
    Cfp,
}

impl RankSource {
    pub fn for_week(week: u8, config: &RankingConfig) -> Self {
        if week >= config.cfp_from_week {
            RankSource::Cfp
        } else {
            RankSource::Ap
        }
    }
}

/// Rewrites every team's `rank`: 1-based position in the ranking in effect for
/// `week`, 0 for everyone outside it.
pub fn apply_ranks(league: &mut League, week: u8, config: &RankingConfig) -> RankSource {
    let source = RankSource::for_week(week, config);
    let ranked = match source {
        RankSource::Ap => team_ids(ap_poll(league, config.poll_size)),
        RankSource::Cfp => team_ids(cfp_ranking(league, config, config.poll_size)),
    };

    for team in league.teams_mut() {
        team.record.rank = ranked
            .iter()
            .position(|id| *id == team.id)
            .map_or(0, |i| u8::try_from(i + 1).unwrap_or(u8::MAX));
    }
    source
}

/// Owned copy of the three polls after a week, for reporting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingSnapshot {
    pub week: u8,
    pub ap: Vec<TeamId>,
    pub coaches: Vec<TeamId>,
    pub cfp: Vec<TeamId>,
}

impl RankingSnapshot {
    pub fn capture(league: &League, week: u8, config: &RankingConfig) -> Self {
        Self {
            week,
            ap: team_ids(ap_poll(league, config.poll_size)),
            coaches: team_ids(coaches_poll(league, config.poll_size)),
            cfp: team_ids(cfp_ranking(league, config, config.poll_size)),
        }
    }
}

// ========== Tests ==========
