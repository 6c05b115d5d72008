//! Season schedule storage and generation.
//!
//! `Schedule` is append-only during a season and indexed by week and by team so
//! the per-week free checks done by the generator stay cheap.

pub mod generator;

pub use generator::{generate_season_schedule, ScheduleReport};

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::error::{LeagueError, Result};
use crate::models::{Fixture, FixtureId, TeamId};

/// A game to be added to the schedule; the schedule assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matchup {
    pub week: u8,
    pub home: TeamId,
    pub away: TeamId,
    pub is_conference_game: bool,
    pub is_playoff: bool,
    pub label: Option<String>,
}

impl Matchup {
    pub fn new(week: u8, home: TeamId, away: TeamId, is_conference_game: bool) -> Self {
        Self { week, home, away, is_conference_game, is_playoff: false, label: None }
    }

    pub fn playoff(week: u8, home: TeamId, away: TeamId, label: impl Into<String>) -> Self {
        Self {
            week,
            home,
            away,
            is_conference_game: false,
            is_playoff: true,
            label: Some(label.into()),
        }
    }
}

pub(crate) fn pair_key(a: &TeamId, b: &TeamId) -> (TeamId, TeamId) {
    if a <= b {
        (a.clone(), b.clone())
    } else {
        (b.clone(), a.clone())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Fixture>", into = "Vec<Fixture>")]
pub struct Schedule {
    fixtures: Vec<Fixture>,
    by_week: BTreeMap<u8, Vec<usize>>,
    by_team: HashMap<TeamId, Vec<usize>>,
    pairs: HashMap<(TeamId, TeamId), u8>,
    next_id: u32,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.fixtures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fixtures.is_empty()
    }

    pub fn fixtures(&self) -> &[Fixture] {
        &self.fixtures
    }

    pub fn insert(&mut self, matchup: Matchup) -> FixtureId {
        let id = FixtureId(self.next_id);
        self.next_id += 1;

        let mut fixture = Fixture::new(id, matchup.week, matchup.home, matchup.away, matchup.is_conference_game);
        fixture.is_playoff = matchup.is_playoff;
        fixture.label = matchup.label;

        self.index_fixture(self.fixtures.len(), &fixture);
        self.fixtures.push(fixture);
        id
    }

    pub fn extend(&mut self, matchups: impl IntoIterator<Item = Matchup>) -> Vec<FixtureId> {
        matchups.into_iter().map(|m| self.insert(m)).collect()
    }

    fn index_fixture(&mut self, idx: usize, fixture: &Fixture) {
        self.by_week.entry(fixture.week).or_default().push(idx);
        self.by_team.entry(fixture.home.clone()).or_default().push(idx);
        self.by_team.entry(fixture.away.clone()).or_default().push(idx);
        *self.pairs.entry(pair_key(&fixture.home, &fixture.away)).or_default() += 1;
    }

    fn reindex(&mut self) {
        self.by_week.clear();
        self.by_team.clear();
        self.pairs.clear();
        let fixtures = std::mem::take(&mut self.fixtures);
        for (idx, fixture) in fixtures.iter().enumerate() {
            self.index_fixture(idx, fixture);
        }
        self.fixtures = fixtures;
    }

    pub fn get(&self, id: FixtureId) -> Result<&Fixture> {
        self.position(id).map(|i| &self.fixtures[i])
    }

    fn position(&self, id: FixtureId) -> Result<usize> {
        // ids are handed out sequentially, so a binary search over the vec works
        self.fixtures
            .binary_search_by_key(&id, |f| f.id)
            .map_err(|_| LeagueError::UnknownFixtureReference(id))
    }

    /// Stores a final score. Fails on unknown ids; a fixture is scored once.
    pub fn record_result(&mut self, id: FixtureId, home_score: u16, away_score: u16) -> Result<&Fixture> {
        let idx = self.position(id)?;
        let fixture = &mut self.fixtures[idx];
        if fixture.played {
            return Err(LeagueError::FixtureAlreadyPlayed(id));
        }
        fixture.record_score(home_score, away_score);
        Ok(&self.fixtures[idx])
    }

    pub fn week(&self, week: u8) -> impl Iterator<Item = &Fixture> {
        self.by_week.get(&week).into_iter().flatten().map(move |&i| &self.fixtures[i])
    }

    pub fn week_ids(&self, week: u8) -> Vec<FixtureId> {
        self.week(week).map(|f| f.id).collect()
    }

    pub fn has_games_in_week(&self, week: u8) -> bool {
        self.by_week.get(&week).is_some_and(|v| !v.is_empty())
    }

    pub fn team_fixtures<'a>(&'a self, team: &TeamId) -> impl Iterator<Item = &'a Fixture> + 'a {
        self.by_team.get(team).into_iter().flatten().map(move |&i| &self.fixtures[i])
    }

    pub fn team_fixture_in_week(&self, team: &TeamId, week: u8) -> Option<&Fixture> {
        self.team_fixtures(team).find(|f| f.week == week)
    }

    pub fn is_team_free(&self, team: &TeamId, week: u8) -> bool {
        self.team_fixture_in_week(team, week).is_none()
    }

    pub fn game_count(&self, team: &TeamId) -> usize {
        self.by_team.get(team).map_or(0, Vec::len)
    }

    pub fn has_pair(&self, a: &TeamId, b: &TeamId) -> bool {
        self.pairs.contains_key(&pair_key(a, b))
    }

    /// Number of extra games between pairs that already met once.
    pub fn duplicate_pair_count(&self) -> usize {
        self.pairs.values().map(|&n| n.saturating_sub(1) as usize).sum()
    }

    /// Teams that appear in more than one game of the same week.
    pub fn double_booked(&self) -> Vec<(u8, TeamId)> {
        let mut out = Vec::new();
        for (&week, idxs) in &self.by_week {
            let mut seen = HashSet::new();
            for &i in idxs {
                let f = &self.fixtures[i];
                for team in [&f.home, &f.away] {
                    if !seen.insert(team) {
                        out.push((week, team.clone()));
                    }
                }
            }
        }
        out
    }

    pub fn last_week(&self) -> Option<u8> {
        self.by_week.keys().next_back().copied()
    }

    /// Drops every unplayed fixture for `team` in `week`. Pre-season edits only.
    pub(crate) fn remove_unplayed(&mut self, team: &TeamId, week: u8) -> usize {
        let before = self.fixtures.len();
        self.fixtures.retain(|f| f.played || f.week != week || !f.involves(team));
        let removed = before - self.fixtures.len();
        if removed > 0 {
            self.reindex();
        }
        removed
    }
}

impl From<Vec<Fixture>> for Schedule {
    fn from(mut fixtures: Vec<Fixture>) -> Self {
        fixtures.sort_by_key(|f| f.id);
        let next_id = fixtures.last().map_or(0, |f| f.id.0 + 1);
        let mut schedule = Schedule { fixtures, next_id, ..Default::default() };
        schedule.reindex();
        schedule
    }
}

impl From<Schedule> for Vec<Fixture> {
    fn from(schedule: Schedule) -> Self {
        schedule.fixtures
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> TeamId {
        TeamId::from(s)
    }

    #[test]
    fn test_insert_indexes_week_and_team() {
        let mut schedule = Schedule::new();
        let first = schedule.insert(Matchup::new(1, id("a"), id("b"), true));
        let second = schedule.insert(Matchup::new(2, id("a"), id("c"), false));

        assert_eq!(first, FixtureId(0));
        assert_eq!(second, FixtureId(1));
        assert_eq!(schedule.game_count(&id("a")), 2);
        assert_eq!(schedule.week(1).count(), 1);
        assert!(!schedule.is_team_free(&id("b"), 1));
        assert!(schedule.is_team_free(&id("b"), 2));
        assert!(schedule.has_pair(&id("c"), &id("a")));
        assert_eq!(schedule.last_week(), Some(2));
    }

    #[test]
    fn test_unknown_fixture_fails_fast() {
        let schedule = Schedule::new();
        let err = schedule.get(FixtureId(42)).unwrap_err();
        assert!(matches!(err, LeagueError::UnknownFixtureReference(FixtureId(42))));
    }

    #[test]
    fn test_record_result_only_once() {
        let mut schedule = Schedule::new();
        let fid = schedule.insert(Matchup::new(1, id("a"), id("b"), false));

        let fixture = schedule.record_result(fid, 31, 10).unwrap();
        assert_eq!(fixture.winner, Some(id("a")));
        assert!(schedule.record_result(fid, 10, 31).is_err());
    }

    #[test]
    fn test_duplicate_and_double_booking_detection() {
        let mut schedule = Schedule::new();
        schedule.insert(Matchup::new(1, id("a"), id("b"), false));
        schedule.insert(Matchup::new(1, id("a"), id("c"), false));
        schedule.insert(Matchup::new(3, id("b"), id("a"), false));

        assert_eq!(schedule.duplicate_pair_count(), 1);
        assert_eq!(schedule.double_booked(), vec![(1, id("a"))]);
    }

    #[test]
    fn test_remove_unplayed_reindexes() {
        let mut schedule = Schedule::new();
        schedule.insert(Matchup::new(1, id("a"), id("b"), false));
        schedule.insert(Matchup::new(2, id("a"), id("c"), false));

        assert_eq!(schedule.remove_unplayed(&id("b"), 1), 1);
        assert!(schedule.is_team_free(&id("a"), 1));
        assert_eq!(schedule.game_count(&id("a")), 1);
        assert!(!schedule.has_pair(&id("a"), &id("b")));
        // ids stay stable after removal
        assert!(schedule.get(FixtureId(1)).is_ok());
    }

    #[test]
    fn test_serde_roundtrip_rebuilds_index() {
        let mut schedule = Schedule::new();
        schedule.insert(Matchup::new(4, id("x"), id("y"), true));
        let json = serde_json::to_string(&schedule).unwrap();
        let restored: Schedule = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.week(4).count(), 1);
        assert_eq!(restored.game_count(&id("y")), 1);
        let mut restored = restored;
        assert_eq!(restored.insert(Matchup::new(5, id("x"), id("z"), false)), FixtureId(1));
    }
}
