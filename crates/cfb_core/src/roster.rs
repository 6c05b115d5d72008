//! Roster generation and year-over-year turnover.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::RosterConfig;
use crate::data::{random_hometown, random_player_name};
use crate::models::{ClassYear, DepartureStatus, League, Player, Position, Team, TeamId};

/// Random player at `position` rated within `min..=max`, any class year.
pub fn generate_player<R: Rng + ?Sized>(
    id: impl Into<String>,
    position: Position,
    min_rating: u8,
    max_rating: u8,
    rng: &mut R,
) -> Player {
    let rating = rng.gen_range(min_rating..=max_rating.max(min_rating));
    Player {
        id: id.into(),
        name: random_player_name(rng),
        position,
        year: *ClassYear::ALL.choose(rng).unwrap_or(&ClassYear::FR),
        rating,
        potential: rating.saturating_add(rng.gen_range(0..20)).min(99),
        hometown: random_hometown(rng),
        leaving_status: None,
    }
}

/// Full depth chart (QB3 RB5 WR8 OL10 DL8 LB6 DB8 K2) rated around `prestige`.
///
/// Ratings fall in `[max(50, p-10), min(99, p+5)]`; below prestige 45 that
/// window collapses to 50.
pub fn generate_balanced_roster<R: Rng + ?Sized>(team: &TeamId, prestige: u8, rng: &mut R) -> Vec<Player> {
    let min_rating = prestige.saturating_sub(10).max(50);
    let max_rating = prestige.saturating_add(5).min(99);

    let mut roster = Vec::with_capacity(50);
    for position in Position::ALL {
        for i in 0..position.roster_depth() {
            roster.push(generate_player(format!("{team}-{position:?}-{i}"), position, min_rating, max_rating, rng));
        }
    }
    roster
}

impl League {
    /// Gives every team a freshly generated balanced roster.
    pub fn with_generated_rosters<R: Rng + ?Sized>(mut self, rng: &mut R) -> Self {
        for team in self.teams_mut() {
            team.roster = generate_balanced_roster(&team.id, team.prestige, rng);
        }
        self
    }
}

/// Decides who leaves the controlled program after the season.
///
/// Seniors graduate. Highly rated sophomores and juniors may declare for the
/// draft; everyone else may enter the portal, more often when a low-rated
/// player sits on an elite roster.
pub fn mark_departures<R: Rng + ?Sized>(team: &mut Team, config: &RosterConfig, rng: &mut R) -> Vec<(String, DepartureStatus)> {
    let prestige = team.prestige;
    let mut departures = Vec::new();

    for player in &mut team.roster {
        player.leaving_status = if player.year == ClassYear::SR {
            Some(DepartureStatus::Graduating)
        } else if player.rating > config.nfl_rating_threshold && matches!(player.year, ClassYear::SO | ClassYear::JR) {
            rng.gen_bool(config.nfl_departure_chance).then_some(DepartureStatus::Nfl)
        } else {
            let chance = if player.rating < config.unhappy_rating_below && prestige > config.unhappy_prestige_above {
                config.unhappy_transfer_chance
            } else {
                config.transfer_chance
            };
            rng.gen_bool(chance).then_some(DepartureStatus::Transfer)
        };

        if let Some(status) = player.leaving_status {
            departures.push((player.id.clone(), status));
        }
    }

    debug!("{}: {} players leaving", team.name, departures.len());
    departures
}

/// Moves a roster to next year: departures leave, survivors age a class and
/// develop. Returns how many players left.
///
/// The controlled team loses exactly the players marked during retention.
/// CPU teams lose seniors, most stars, and a slice of random attrition.
pub fn roll_roster<R: Rng + ?Sized>(team: &mut Team, controlled: bool, config: &RosterConfig, rng: &mut R) -> usize {
    let before = team.roster.len();
    if controlled {
        team.roster.retain(|p| !p.is_leaving());
    } else {
        team.roster.retain(|p| {
            if p.year == ClassYear::SR {
                return false;
            }
            if p.rating > config.cpu_star_rating_threshold && rng.gen_bool(config.cpu_star_departure_chance) {
                return false;
            }
            !rng.gen_bool(config.cpu_attrition_chance)
        });
    }

    for player in &mut team.roster {
        player.year = player.year.next();
        let improvement = rng.gen_range(0..=config.max_yearly_improvement);
        player.rating = player.rating.saturating_add(improvement).min(99);
        player.leaving_status = None;
    }

    before - team.roster.len()
}

/// Fills a CPU roster up to the minimum size with walk-ons.
pub fn top_up_walk_ons<R: Rng + ?Sized>(team: &mut Team, season: u16, config: &RosterConfig, rng: &mut R) -> usize {
    let needed = config.min_roster_size.saturating_sub(team.roster.len());
    for i in 0..needed {
        let position = *Position::ALL.choose(rng).unwrap_or(&Position::OL);
        let id = format!("{}-walkon-{season}-{i}", team.id);
        team.roster.push(generate_player(id, position, config.walk_on_min_rating, config.walk_on_max_rating, rng));
    }
    needed
}

/// Roster changes produced outside the engine (signings, portal moves).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterDelta {
    pub team: TeamId,
    /// Appended as given; callers set the class year (FR for high-school signees).
    #[serde(default)]
    pub incoming: Vec<Player>,
    /// Player ids to remove, with the reason they left
    #[serde(default)]
    pub outgoing: Vec<(String, DepartureStatus)>,
}

impl RosterDelta {
    pub fn new(team: TeamId) -> Self {
        Self { team, incoming: Vec::new(), outgoing: Vec::new() }
    }

    pub fn sign(mut self, player: Player) -> Self {
        self.incoming.push(player);
        self
    }

    pub fn release(mut self, player_id: impl Into<String>, status: DepartureStatus) -> Self {
        self.outgoing.push((player_id.into(), status));
        self
    }

    /// Applies the delta to `team`. Unknown outgoing ids are ignored.
    pub fn apply(&self, team: &mut Team) -> (usize, usize) {
        let before = team.roster.len();
        team.roster.retain(|p| !self.outgoing.iter().any(|(id, _)| *id == p.id));
        let removed = before - team.roster.len();
        team.roster.extend(self.incoming.iter().cloned());
        (self.incoming.len(), removed)
    }
}

// ========== Tests ==========

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Conference;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn player(id: &str, year: ClassYear, rating: u8) -> Player {
        Player {
            id: id.to_string(),
            name: id.to_string(),
            position: Position::WR,
            year,
            rating,
            potential: rating,
            hometown: String::new(),
            leaving_status: None,
        }
    }

    fn team_with(prestige: u8, roster: Vec<Player>) -> Team {
        let mut team = Team::new("t", "Test U", Conference::Sec, prestige);
        team.roster = roster;
        team
    }

    #[test]
    fn test_balanced_roster_shape() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let roster = generate_balanced_roster(&TeamId::from("1"), 95, &mut rng);

        assert_eq!(roster.len(), 50);
        assert_eq!(roster.iter().filter(|p| p.position == Position::QB).count(), 3);
        assert_eq!(roster.iter().filter(|p| p.position == Position::OL).count(), 10);
        assert!(roster.iter().all(|p| (85..=99).contains(&p.rating)));
        assert!(roster.iter().all(|p| p.potential >= p.rating && p.potential <= 99));
    }

    #[test]
    fn test_low_prestige_rating_floor() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let roster = generate_balanced_roster(&TeamId::from("9"), 30, &mut rng);
        assert!(roster.iter().all(|p| (50..=50).contains(&p.rating)));
    }

    #[test]
    fn test_seniors_always_graduate() {
        let mut team = team_with(70, vec![player("sr", ClassYear::SR, 99), player("fr", ClassYear::FR, 60)]);
        let config = RosterConfig { transfer_chance: 0.0, ..Default::default() };
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        let departures = mark_departures(&mut team, &config, &mut rng);
        assert_eq!(departures, vec![("sr".to_string(), DepartureStatus::Graduating)]);
        assert!(team.roster[1].leaving_status.is_none());
    }

    #[test]
    fn test_stars_declare_and_unhappy_transfer() {
        let config = RosterConfig { nfl_departure_chance: 1.0, unhappy_transfer_chance: 1.0, ..Default::default() };
        let mut team = team_with(
            90,
            vec![player("star", ClassYear::JR, 95), player("frosh_star", ClassYear::FR, 95), player("bench", ClassYear::SO, 70)],
        );
        let mut rng = ChaCha8Rng::seed_from_u64(4);

        mark_departures(&mut team, &config, &mut rng);
        assert_eq!(team.roster[0].leaving_status, Some(DepartureStatus::Nfl));
        // freshmen can't declare, and 95 is not "unhappy"
        assert_eq!(team.roster[2].leaving_status, Some(DepartureStatus::Transfer));
    }

    #[test]
    fn test_controlled_roll_drops_only_marked_players() {
        let mut team = team_with(80, vec![player("stay", ClassYear::JR, 98), player("go", ClassYear::FR, 60)]);
        team.roster[1].leaving_status = Some(DepartureStatus::Transfer);
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        let departed = roll_roster(&mut team, true, &RosterConfig::default(), &mut rng);
        assert_eq!(departed, 1);
        assert_eq!(team.roster.len(), 1);
        assert_eq!(team.roster[0].year, ClassYear::SR);
        assert!(team.roster[0].rating >= 98);
    }

    #[test]
    fn test_cpu_roll_drops_seniors_and_tops_up() {
        let config = RosterConfig { cpu_attrition_chance: 0.0, cpu_star_departure_chance: 0.0, ..Default::default() };
        let mut team = team_with(60, vec![player("sr", ClassYear::SR, 70), player("so", ClassYear::SO, 70)]);
        let mut rng = ChaCha8Rng::seed_from_u64(6);

        assert_eq!(roll_roster(&mut team, false, &config, &mut rng), 1);
        assert_eq!(team.roster[0].year, ClassYear::JR);

        let added = top_up_walk_ons(&mut team, 2026, &config, &mut rng);
        assert_eq!(added, 44);
        assert_eq!(team.roster.len(), 45);
        assert!(team.roster[1..].iter().all(|p| (60..=75).contains(&p.rating)));
    }

    #[test]
    fn test_delta_apply() {
        let mut team = team_with(60, vec![player("a", ClassYear::SO, 70), player("b", ClassYear::JR, 72)]);
        let delta = RosterDelta::new(team.id.clone())
            .sign(player("new", ClassYear::FR, 80))
            .release("a", DepartureStatus::Transfer)
            .release("ghost", DepartureStatus::Transfer);

        assert_eq!(delta.apply(&mut team), (1, 1));
        let ids: Vec<_> = team.roster.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["b", "new"]);
    }

    #[test]
    fn test_league_rosters_generated() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let league = League::new(vec![Team::new("a", "A", Conference::Mac, 50), Team::new("b", "B", Conference::Mac, 90)])
            .unwrap()
            .with_generated_rosters(&mut rng);
        assert!(league.teams().iter().all(|t| t.roster.len() == 50));
    }
}
