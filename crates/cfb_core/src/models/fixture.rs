use serde::{Deserialize, Serialize};
use std::fmt;

use super::team::TeamId;

/// Sequential fixture identifier, unique within one season's schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FixtureId(pub u32);

impl fmt::Display for FixtureId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A scheduled or played game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixture {
    pub id: FixtureId,
    pub week: u8,
    pub home: TeamId,
    pub away: TeamId,
    pub played: bool,
    pub home_score: Option<u16>,
    pub away_score: Option<u16>,
    pub winner: Option<TeamId>,
    pub is_conference_game: bool,
    pub is_playoff: bool,
    /// "SEC Championship", "CFP Rd 1", ...
    pub label: Option<String>,
}

impl Fixture {
    pub fn new(id: FixtureId, week: u8, home: TeamId, away: TeamId, is_conference_game: bool) -> Self {
        Self {
            id,
            week,
            home,
            away,
            played: false,
            home_score: None,
            away_score: None,
            winner: None,
            is_conference_game,
            is_playoff: false,
            label: None,
        }
    }

    pub fn involves(&self, team: &TeamId) -> bool {
        self.home == *team || self.away == *team
    }

    pub fn opponent_of(&self, team: &TeamId) -> Option<&TeamId> {
        if self.home == *team {
            Some(&self.away)
        } else if self.away == *team {
            Some(&self.home)
        } else {
            None
        }
    }

    pub fn loser(&self) -> Option<&TeamId> {
        self.winner.as_ref().and_then(|w| self.opponent_of(w))
    }

    pub fn won_by(&self, team: &TeamId) -> bool {
        self.winner.as_ref() == Some(team)
    }

    /// Records the final score. The winner is the strictly greater score;
    /// callers guarantee scores are never level.
    pub(crate) fn record_score(&mut self, home_score: u16, away_score: u16) {
        self.home_score = Some(home_score);
        self.away_score = Some(away_score);
        self.winner = Some(if home_score > away_score { self.home.clone() } else { self.away.clone() });
        self.played = true;
    }

    pub fn score_line(&self) -> String {
        match (self.home_score, self.away_score) {
            (Some(h), Some(a)) => format!("{} {} - {} {}", self.home, h, a, self.away),
            _ => format!("{} vs {}", self.home, self.away),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_score_sets_winner() {
        let mut fixture = Fixture::new(FixtureId(1), 3, TeamId::from("1"), TeamId::from("2"), true);
        fixture.record_score(17, 24);

        assert!(fixture.played);
        assert_eq!(fixture.winner, Some(TeamId::from("2")));
        assert_eq!(fixture.loser(), Some(&TeamId::from("1")));
        assert!(fixture.won_by(&TeamId::from("2")));
    }

    #[test]
    fn test_opponent_lookup() {
        let fixture = Fixture::new(FixtureId(7), 1, TeamId::from("a"), TeamId::from("b"), false);
        assert_eq!(fixture.opponent_of(&TeamId::from("a")), Some(&TeamId::from("b")));
        assert_eq!(fixture.opponent_of(&TeamId::from("b")), Some(&TeamId::from("a")));
        assert_eq!(fixture.opponent_of(&TeamId::from("c")), None);
    }
}
