//! Conference championships and the College Football Playoff.

pub mod championship;
pub mod playoff;

pub use championship::generate_conference_championships;
pub use playoff::{generate_playoffs, Bracket, PLAYOFF_FIELD};
