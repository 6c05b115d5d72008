//! 12-team College Football Playoff.
//!
//! Seeds come from the CFP ranking. Round one pairs 5-12, 6-11, 7-10 and 8-9
//! with the better seed at home while seeds 1-4 sit out. With
//! [`PlayoffFormat::FullBracket`] the bracket continues:
//!
//! ```text
//! week 16  CFP Rd 1                  5v12  6v11  7v10  8v9
//! week 17  CFP Quarterfinal          1 v W(8/9)   2 v W(7/10)   3 v W(6/11)   4 v W(5/12)
//! week 18  CFP Semifinal             W(QF1) v W(QF4)   W(QF2) v W(QF3)
//! week 19  CFP National Championship
//! ```
//!
//! The better seed hosts every game.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::{PlayoffConfig, PlayoffFormat, RankingConfig};
use crate::error::{LeagueError, Result};
use crate::models::{League, TeamId};
use crate::ranking::cfp_ranking;
use crate::schedule::{Matchup, Schedule};
use crate::season::SeasonStage;

pub const PLAYOFF_FIELD: usize = 12;

const ROUND_LABELS: [&str; 4] = ["CFP Rd 1", "CFP Quarterfinal", "CFP Semifinal", "CFP National Championship"];

/// First-round games from the current CFP ranking; empty below 12 teams.
pub fn generate_playoffs(league: &League, rankings: &RankingConfig, config: &PlayoffConfig) -> Vec<Matchup> {
    Bracket::seed(league, rankings, config).map(|b| b.round_matchups()).unwrap_or_default()
}

/// Seeded playoff field and the round currently scheduled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bracket {
    format: PlayoffFormat,
    first_round_week: u8,
    /// seeds[0] is the 1 seed
    seeds: Vec<TeamId>,
    round: usize,
    /// Pairings of the current round as (home, away)
    games: Vec<(TeamId, TeamId)>,
}

impl Bracket {
    /// Seeds the field from the CFP top 12. `None` when the league is too small.
    pub fn seed(league: &League, rankings: &RankingConfig, config: &PlayoffConfig) -> Option<Self> {
        let seeds: Vec<TeamId> =
            cfp_ranking(league, rankings, PLAYOFF_FIELD).into_iter().map(|t| t.id.clone()).collect();
        if seeds.len() < PLAYOFF_FIELD {
            return None;
        }

        // 5v12, 6v11, 7v10, 8v9
        let games = (4..8).map(|i| (seeds[i].clone(), seeds[PLAYOFF_FIELD + 3 - i].clone())).collect();
        info!("Playoff field set: #1 {} ... #12 {}", seeds[0], seeds[PLAYOFF_FIELD - 1]);

        Some(Self { format: config.format, first_round_week: config.first_round_week, seeds, round: 0, games })
    }

    pub fn seeds(&self) -> &[TeamId] {
        &self.seeds
    }

    /// 1-based seed, if the team made the field.
    pub fn seed_of(&self, team: &TeamId) -> Option<usize> {
        self.seeds.iter().position(|t| t == team).map(|i| i + 1)
    }

    pub fn current_week(&self) -> u8 {
        self.first_round_week + self.round as u8
    }

    pub fn round_label(&self) -> &'static str {
        ROUND_LABELS[self.round.min(ROUND_LABELS.len() - 1)]
    }

    pub fn pairings(&self) -> &[(TeamId, TeamId)] {
        &self.games
    }

    pub fn round_matchups(&self) -> Vec<Matchup> {
        let week = self.current_week();
        let label = self.round_label();
        self.games.iter().map(|(h, a)| Matchup::playoff(week, h.clone(), a.clone(), label)).collect()
    }

    /// Week of the title game, if this format plays one.
    pub fn title_week(&self) -> Option<u8> {
        title_week(self.format, self.first_round_week)
    }

    /// Whether another round follows the games of `week`.
    pub fn has_round_after(&self, week: u8) -> bool {
        match self.format {
            PlayoffFormat::FirstRoundOnly => false,
            PlayoffFormat::FullBracket => {
                week >= self.first_round_week && week < self.first_round_week + (ROUND_LABELS.len() as u8 - 1)
            }
        }
    }

    /// Reads the winners of the current round from `schedule` and pairs the
    /// next round. Returns the new games, to be added to the schedule.
    pub fn advance(&mut self, schedule: &Schedule) -> Result<Vec<Matchup>> {
        let week = self.current_week();
        if !self.has_round_after(week) {
            return Err(LeagueError::UnhandledSeasonState {
                stage: SeasonStage::PostSeason { week },
                reason: "no playoff round follows".to_string(),
            });
        }

        let winners = self
            .games
            .iter()
            .map(|(home, away)| {
                schedule
                    .team_fixture_in_week(home, week)
                    .filter(|f| f.played && f.involves(away))
                    .and_then(|f| f.winner.clone())
                    .ok_or_else(|| LeagueError::UnhandledSeasonState {
                        stage: SeasonStage::PostSeason { week },
                        reason: format!("playoff game {home} vs {away} has no result"),
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        let pairs: Vec<(TeamId, TeamId)> = match self.round {
            // seeds 1-4 meet the winners of 8/9, 7/10, 6/11, 5/12
            0 => (0..4).map(|i| (self.seeds[i].clone(), winners[3 - i].clone())).collect(),
            1 => vec![(winners[0].clone(), winners[3].clone()), (winners[1].clone(), winners[2].clone())],
            _ => vec![(winners[0].clone(), winners[1].clone())],
        };

        self.games = pairs.into_iter().map(|(a, b)| self.host_first(a, b)).collect();
        self.round += 1;
        info!("{} set for week {}", self.round_label(), self.current_week());
        Ok(self.round_matchups())
    }

    fn host_first(&self, a: TeamId, b: TeamId) -> (TeamId, TeamId) {
        let seed = |t: &TeamId| self.seed_of(t).unwrap_or(usize::MAX);
        if seed(&a) <= seed(&b) {
            (a, b)
        } else {
            (b, a)
        }
    }
}

/// Week of the title game for `format`, if it has one.
pub fn title_week(format: PlayoffFormat, first_round_week: u8) -> Option<u8> {
    match format {
        PlayoffFormat::FirstRoundOnly => None,
        PlayoffFormat::FullBracket => Some(first_round_week + ROUND_LABELS.len() as u8 - 1),
    }
}

// ========== Tests ==========

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Conference, Team, TeamRecord};

    /// Team "s{n}" ends up as CFP seed n.
    fn seeded_league(size: usize) -> League {
        let teams = (1..=size)
            .map(|n| {
                let mut t = Team::new(format!("s{n}"), format!("Seed {n}"), Conference::Sec, 50);
                t.record = TeamRecord { wins: (40 - n) as u16, ..Default::default() };
                t
            })
            .rev()
            .collect();
        League::new(teams).unwrap()
    }

    fn id(n: usize) -> TeamId {
        TeamId::new(format!("s{n}"))
    }

    fn play_round(schedule: &mut Schedule, games: Vec<Matchup>, home_wins: bool) {
        for fid in schedule.extend(games) {
            let (h, a) = if home_wins { (30, 10) } else { (10, 30) };
            schedule.record_result(fid, h, a).unwrap();
        }
    }

    #[test]
    fn test_first_round_seed_pairings() {
        let league = seeded_league(12);
        let games = generate_playoffs(&league, &RankingConfig::default(), &PlayoffConfig::default());

        let pairs: Vec<_> = games.iter().map(|g| (g.home.clone(), g.away.clone())).collect();
        assert_eq!(pairs, vec![(id(5), id(12)), (id(6), id(11)), (id(7), id(10)), (id(8), id(9))]);
        assert!(games.iter().all(|g| g.week == 16 && g.is_playoff && !g.is_conference_game));
        assert!(games.iter().all(|g| g.label.as_deref() == Some("CFP Rd 1")));
    }

    #[test]
    fn test_small_league_has_no_playoff() {
        let league = seeded_league(11);
        assert!(generate_playoffs(&league, &RankingConfig::default(), &PlayoffConfig::default()).is_empty());
    }

    #[test]
    fn test_first_round_only_stops_after_round_one() {
        let league = seeded_league(14);
        let config = PlayoffConfig { format: PlayoffFormat::FirstRoundOnly, ..Default::default() };
        let bracket = Bracket::seed(&league, &RankingConfig::default(), &config).unwrap();

        assert!(!bracket.has_round_after(16));
        assert_eq!(bracket.title_week(), None);
        let mut bracket = bracket;
        assert!(bracket.advance(&Schedule::new()).is_err());
    }

    #[test]
    fn test_full_bracket_chalk() {
        let league = seeded_league(12);
        let mut bracket = Bracket::seed(&league, &RankingConfig::default(), &PlayoffConfig::default()).unwrap();
        let mut schedule = Schedule::new();

        play_round(&mut schedule, bracket.round_matchups(), true);
        let qf = bracket.advance(&schedule).unwrap();
        let pairs: Vec<_> = qf.iter().map(|g| (g.home.clone(), g.away.clone())).collect();
        assert_eq!(pairs, vec![(id(1), id(8)), (id(2), id(7)), (id(3), id(6)), (id(4), id(5))]);
        assert!(qf.iter().all(|g| g.week == 17 && g.label.as_deref() == Some("CFP Quarterfinal")));

        play_round(&mut schedule, qf, true);
        let sf = bracket.advance(&schedule).unwrap();
        let pairs: Vec<_> = sf.iter().map(|g| (g.home.clone(), g.away.clone())).collect();
        assert_eq!(pairs, vec![(id(1), id(4)), (id(2), id(3))]);

        play_round(&mut schedule, sf, true);
        let title = bracket.advance(&schedule).unwrap();
        assert_eq!(title.len(), 1);
        assert_eq!((title[0].home.clone(), title[0].away.clone()), (id(1), id(2)));
        assert_eq!(title[0].week, 19);
        assert_eq!(bracket.title_week(), Some(19));
        assert!(!bracket.has_round_after(19));
    }

    #[test]
    fn test_better_seed_hosts_after_upsets() {
        let league = seeded_league(12);
        let mut bracket = Bracket::seed(&league, &RankingConfig::default(), &PlayoffConfig::default()).unwrap();
        let mut schedule = Schedule::new();

        // road teams sweep round one: 12, 11, 10, 9 advance
        play_round(&mut schedule, bracket.round_matchups(), false);
        let qf = bracket.advance(&schedule).unwrap();
        let pairs: Vec<_> = qf.iter().map(|g| (g.home.clone(), g.away.clone())).collect();
        assert_eq!(pairs, vec![(id(1), id(9)), (id(2), id(10)), (id(3), id(11)), (id(4), id(12))]);

        // and again: 9, 10, 11, 12 reach the semis, 9 hosts 12
        play_round(&mut schedule, qf, false);
        let sf = bracket.advance(&schedule).unwrap();
        let pairs: Vec<_> = sf.iter().map(|g| (g.home.clone(), g.away.clone())).collect();
        assert_eq!(pairs, vec![(id(9), id(12)), (id(10), id(11))]);
    }

    #[test]
    fn test_advance_requires_results() {
        let league = seeded_league(12);
        let mut bracket = Bracket::seed(&league, &RankingConfig::default(), &PlayoffConfig::default()).unwrap();
        let mut schedule = Schedule::new();
        schedule.extend(bracket.round_matchups());

        let err = bracket.advance(&schedule).unwrap_err();
        assert!(err.is_contract_violation());
    }
}
