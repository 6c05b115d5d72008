use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::team::{Conference, Team, TeamId};
use crate::error::{LeagueError, Result};

/// Ordered set of every team in the league.
///
/// Order is significant: conference iteration during scheduling follows the
/// order in which conferences first appear.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "Vec<Team>", into = "Vec<Team>")]
pub struct League {
    teams: Vec<Team>,
    index: HashMap<TeamId, usize>,
}

impl League {
    pub fn new(teams: Vec<Team>) -> Result<Self> {
        if teams.is_empty() {
            return Err(LeagueError::InvalidLeague("league has no teams".to_string()));
        }

        let mut index = HashMap::with_capacity(teams.len());
        for (i, team) in teams.iter().enumerate() {
            if team.prestige > 100 {
                return Err(LeagueError::InvalidLeague(format!(
                    "team {} has prestige {} (expected 0-100)",
                    team.id, team.prestige
                )));
            }
            if index.insert(team.id.clone(), i).is_some() {
                return Err(LeagueError::InvalidLeague(format!("duplicate team id {}", team.id)));
            }
        }

        Ok(Self { teams, index })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let teams: Vec<Team> = serde_json::from_str(json)?;
        Self::new(teams)
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn teams_mut(&mut self) -> impl Iterator<Item = &mut Team> {
        self.teams.iter_mut()
    }

    pub fn contains(&self, id: &TeamId) -> bool {
        self.index.contains_key(id)
    }

    pub fn get(&self, id: &TeamId) -> Result<&Team> {
        self.index
            .get(id)
            .map(|&i| &self.teams[i])
            .ok_or_else(|| LeagueError::UnknownTeamReference(id.clone()))
    }

    pub fn get_mut(&mut self, id: &TeamId) -> Result<&mut Team> {
        match self.index.get(id) {
            Some(&i) => Ok(&mut self.teams[i]),
            None => Err(LeagueError::UnknownTeamReference(id.clone())),
        }
    }

    /// Conferences in order of first appearance.
    pub fn conferences(&self) -> Vec<Conference> {
        let mut seen = Vec::new();
        for team in &self.teams {
            if !seen.contains(&team.conference) {
                seen.push(team.conference);
            }
        }
        seen
    }

    pub fn conference_members(&self, conference: Conference) -> Vec<&Team> {
        self.teams.iter().filter(|t| t.conference == conference).collect()
    }

    pub fn reset_records(&mut self) {
        for team in &mut self.teams {
            team.reset_record();
        }
    }
}

impl TryFrom<Vec<Team>> for League {
    type Error = LeagueError;

    fn try_from(teams: Vec<Team>) -> Result<Self> {
        Self::new(teams)
    }
}

impl From<League> for Vec<Team> {
    fn from(league: League) -> Self {
        league.teams
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_league() -> League {
        League::new(vec![
            Team::new("1", "Alabama", Conference::Sec, 95),
            Team::new("17", "Ohio State", Conference::BigTen, 95),
            Team::new("2", "Georgia", Conference::Sec, 96),
            Team::new("133", "Notre Dame", Conference::Independent, 92),
        ])
        .unwrap()
    }

    #[test]
    fn test_lookup_unknown_team_fails_fast() {
        let league = sample_league();
        let err = league.get(&TeamId::from("999")).unwrap_err();
        assert!(matches!(err, LeagueError::UnknownTeamReference(ref id) if id.as_str() == "999"));
        assert!(err.is_contract_violation());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let result = League::new(vec![
            Team::new("1", "Alabama", Conference::Sec, 95),
            Team::new("1", "Alabama Again", Conference::Sec, 90),
        ]);
        assert!(matches!(result, Err(LeagueError::InvalidLeague(_))));
    }

    #[test]
    fn test_conferences_in_first_appearance_order() {
        let league = sample_league();
        assert_eq!(
            league.conferences(),
            vec![Conference::Sec, Conference::BigTen, Conference::Independent]
        );
        assert_eq!(league.conference_members(Conference::Sec).len(), 2);
    }

    #[test]
    fn test_json_roundtrip_keeps_order() {
        let league = sample_league();
        let json = serde_json::to_string(&league).unwrap();
        let restored = League::from_json(&json).unwrap();
        let ids: Vec<_> = restored.teams().iter().map(|t| t.id.as_str().to_string()).collect();
        assert_eq!(ids, vec!["1", "17", "2", "133"]);
    }
}
