pub mod fixture;
pub mod league;
pub mod player;
pub mod team;

pub use fixture::{Fixture, FixtureId};
pub use league::League;
pub use player::{ClassYear, DepartureStatus, Player, Position};
pub use team::{stars, Conference, Team, TeamId, TeamRecord};
