//! Regular-season schedule generator.
//!
//! Two phases:
//! 1. Conference slate: full round robin for small conferences, a bounded
//!    greedy matching for large ones, placed preferably in the conference
//!    window (weeks 5-14 by default).
//! 2. Non-conference filling: a fixed number of passes pairing teams still
//!    below the game target, early weeks first.
//!
//! The generator never fails. Teams it cannot fill simply get more bye weeks;
//! `ScheduleReport` lists them.

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

use super::{pair_key, Matchup, Schedule};
use crate::config::ScheduleConfig;
use crate::models::{League, Team, TeamId};

type PairSet = HashSet<(TeamId, TeamId)>;

/// Builds the full regular-season schedule for `league`.
pub fn generate_season_schedule<R: Rng + ?Sized>(
    league: &League,
    config: &ScheduleConfig,
    rng: &mut R,
) -> Schedule {
    let mut schedule = Schedule::new();
    // Pairs count as used once they are drawn, even when no week could hold them.
    let mut claimed = PairSet::new();

    for conference in league.conferences() {
        if conference.is_independent() {
            continue;
        }

        let members = league.conference_members(conference);
        let pairings = if members.len() <= config.round_robin_max_teams {
            round_robin(&members)
        } else {
            partial_slate(&members, config.large_conference_games, &claimed, rng)
        };

        // One week order per conference: pairings arrive round by round, so each
        // round lands in a single week and a round robin always fits.
        let weeks = conference_week_order(config, rng);
        let mut dropped = 0usize;
        for (home, away) in pairings {
            claimed.insert(pair_key(&home, &away));

            match first_common_free_week(&schedule, &home, &away, &weeks) {
                Some(week) => {
                    schedule.insert(Matchup::new(week, home, away, true));
                }
                None => dropped += 1,
            }
        }

        if dropped > 0 {
            debug!("{conference}: {dropped} conference pairings found no free week");
        }
    }

    let conference_games = schedule.len();
    fill_non_conference(league, config, &mut schedule, &mut claimed, rng);

    info!(
        "Generated schedule: {} fixtures ({} conference, {} non-conference) for {} teams",
        schedule.len(),
        conference_games,
        schedule.len() - conference_games,
        league.len()
    );

    schedule
}

/// Every unordered pair exactly once, ordered by round (circle method).
///
/// An odd conference gets a phantom member; whoever draws it has the bye.
fn round_robin(members: &[&Team]) -> Vec<(TeamId, TeamId)> {
    let mut slots: Vec<Option<&TeamId>> = members.iter().map(|t| Some(&t.id)).collect();
    if slots.len() % 2 == 1 {
        slots.push(None);
    }

    let n = slots.len();
    let mut pairings = Vec::with_capacity(members.len() * members.len().saturating_sub(1) / 2);
    for round in 0..n.saturating_sub(1) {
        for i in 0..n / 2 {
            if let (Some(a), Some(b)) = (slots[i], slots[n - 1 - i]) {
                let (home, away) = if (round + i) % 2 == 0 { (a, b) } else { (b, a) };
                pairings.push((home.clone(), away.clone()));
            }
        }
        // slot 0 stays put, the rest rotate one step
        slots[1..].rotate_right(1);
    }
    pairings
}

/// Bounded matching for conferences too large for a round robin.
///
/// Each round sorts teams by conference games so far and pairs each one with
/// the first shuffled opponent that is still open this round, has not met it,
/// and is below `games`. Teams left without a partner sit the round out.
fn partial_slate<R: Rng + ?Sized>(
    members: &[&Team],
    games: u8,
    claimed: &PairSet,
    rng: &mut R,
) -> Vec<(TeamId, TeamId)> {
    let mut counts: HashMap<&TeamId, u8> = members.iter().map(|t| (&t.id, 0)).collect();
    let mut met = PairSet::new();
    let mut pairings = Vec::new();

    for _round in 0..games {
        let mut order: Vec<&Team> = members.to_vec();
        order.sort_by_key(|t| counts[&t.id]);

        let mut open: HashSet<&TeamId> =
            order.iter().filter(|t| counts[&t.id] < games).map(|t| &t.id).collect();

        for home in &order {
            if !open.contains(&home.id) {
                continue;
            }

            let mut candidates: Vec<&Team> = members.to_vec();
            candidates.shuffle(rng);

            let opponent = candidates.into_iter().find(|away| {
                let key = pair_key(&home.id, &away.id);
                away.id != home.id
                    && open.contains(&away.id)
                    && !met.contains(&key)
                    && !claimed.contains(&key)
            });

            if let Some(away) = opponent {
                met.insert(pair_key(&home.id, &away.id));
                pairings.push((home.id.clone(), away.id.clone()));
                *counts.entry(&home.id).or_default() += 1;
                *counts.entry(&away.id).or_default() += 1;
                open.remove(&home.id);
                open.remove(&away.id);
            }
        }
    }

    pairings
}

/// Shuffled conference window followed by the shuffled early weeks.
fn conference_week_order<R: Rng + ?Sized>(config: &ScheduleConfig, rng: &mut R) -> Vec<u8> {
    let mut window: Vec<u8> = (config.conference_window_start..=config.regular_season_weeks).collect();
    let mut early: Vec<u8> = (1..config.conference_window_start).collect();
    window.shuffle(rng);
    early.shuffle(rng);
    window.extend(early);
    window
}

fn first_common_free_week(schedule: &Schedule, a: &TeamId, b: &TeamId, weeks: &[u8]) -> Option<u8> {
    weeks.iter().copied().find(|&w| schedule.is_team_free(a, w) && schedule.is_team_free(b, w))
}

fn fill_non_conference<R: Rng + ?Sized>(
    league: &League,
    config: &ScheduleConfig,
    schedule: &mut Schedule,
    claimed: &mut PairSet,
    rng: &mut R,
) {
    let target = config.games_per_team as usize;

    // Early weeks in order, then the rest shuffled once for the whole fill.
    let mut weeks: Vec<u8> = (1..config.conference_window_start).collect();
    let mut filler: Vec<u8> = (config.conference_window_start..=config.regular_season_weeks).collect();
    filler.shuffle(rng);
    weeks.extend(filler);

    for pass in 0..config.fill_passes {
        let mut needing: Vec<&Team> =
            league.teams().iter().filter(|t| schedule.game_count(&t.id) < target).collect();
        if needing.len() < 2 {
            break;
        }
        needing.shuffle(rng);

        let allow_same_conference = pass >= config.same_conference_fill_from_pass;

        for team in needing {
            if schedule.game_count(&team.id) >= target {
                continue;
            }

            let mut candidates: Vec<&Team> = league
                .teams()
                .iter()
                .filter(|other| {
                    other.id != team.id
                        && schedule.game_count(&other.id) < target
                        && !claimed.contains(&pair_key(&team.id, &other.id))
                        && (allow_same_conference || other.conference != team.conference)
                })
                .collect();
            candidates.shuffle(rng);

            for opponent in candidates {
                if schedule.game_count(&team.id) >= target {
                    break;
                }
                if let Some(week) = first_common_free_week(schedule, &team.id, &opponent.id, &weeks) {
                    schedule.insert(Matchup::new(
                        week,
                        team.id.clone(),
                        opponent.id.clone(),
                        team.conference == opponent.conference,
                    ));
                    claimed.insert(pair_key(&team.id, &opponent.id));
                }
            }
        }
    }
}

/// Post-generation summary: who fell short of the game target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleReport {
    pub fixtures: usize,
    pub conference_games: usize,
    /// (team, games scheduled) for every team below the target
    pub shortfalls: Vec<(TeamId, usize)>,
    pub duplicate_pairs: usize,
}

impl ScheduleReport {
    pub fn build(league: &League, schedule: &Schedule, config: &ScheduleConfig) -> Self {
        let target = config.games_per_team as usize;
        let shortfalls = league
            .teams()
            .iter()
            .map(|t| (t.id.clone(), schedule.game_count(&t.id)))
            .filter(|(_, n)| *n < target)
            .collect();

        Self {
            fixtures: schedule.len(),
            conference_games: schedule.fixtures().iter().filter(|f| f.is_conference_game).count(),
            shortfalls,
            duplicate_pairs: schedule.duplicate_pair_count(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.shortfalls.is_empty()
    }
}
