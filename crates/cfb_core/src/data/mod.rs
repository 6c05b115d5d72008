//! Embedded league data
//!
//! The default 134-team FBS league ships inside the binary via `include_str!`,
//! so a season can start without any file I/O. Name and hometown pools used by
//! roster generation live here as well.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::Result;
use crate::models::League;

// ============================================================================
// Embedded JSON
// ============================================================================

/// Ten conferences plus two independents (~14KB)
pub const FBS_LEAGUE_JSON: &str = include_str!("../../data/fbs_league.json");

/// Parses the embedded FBS league. Records and rosters start empty.
pub fn default_league() -> Result<League> {
    League::from_json(FBS_LEAGUE_JSON)
}

impl League {
    /// The embedded FBS league; see [`default_league`].
    pub fn default_fbs() -> Result<Self> {
        default_league()
    }
}

// ============================================================================
// Name pools
// ============================================================================

pub const FIRST_NAMES: &[&str] = &[
    "James", "John", "Robert", "Michael", "William", "David", "Richard", "Joseph", "Thomas", "Charles",
    "Christopher", "Daniel", "Matthew", "Anthony", "Mark", "Donald", "Steven", "Paul", "Andrew", "Joshua",
    "Kevin", "Brian", "George", "Edward", "Ronald", "Timothy", "Jason", "Jeffrey", "Ryan", "Jacob",
    "Gary", "Nicholas", "Eric", "Jonathan", "Stephen", "Larry", "Justin", "Scott", "Brandon", "Benjamin",
];

pub const LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis", "Rodriguez", "Martinez",
    "Hernandez", "Lopez", "Gonzalez", "Wilson", "Anderson", "Thomas", "Taylor", "Moore", "Jackson", "Martin",
    "Lee", "Perez", "Thompson", "White", "Harris", "Sanchez", "Clark", "Ramirez", "Lewis", "Robinson",
    "Walker", "Young", "Allen", "King", "Wright", "Scott", "Torres", "Nguyen", "Hill", "Flores",
];

pub const HOMETOWNS: &[&str] = &[
    "Austin, TX", "Miami, FL", "Columbus, OH", "Los Angeles, CA", "Atlanta, GA", "Dallas, TX",
    "New Orleans, LA", "Chicago, IL", "Houston, TX", "Phoenix, AZ", "Orlando, FL", "Charlotte, NC",
    "Nashville, TN", "Seattle, WA", "Denver, CO", "Detroit, MI", "Philadelphia, PA", "San Antonio, TX",
    "San Diego, CA", "Las Vegas, NV", "Tampa, FL", "Jacksonville, FL", "Indianapolis, IN", "San Jose, CA",
    "Columbus, GA", "Mobile, AL", "Birmingham, AL", "Baton Rouge, LA",
];

/// "First Last" drawn from the pools.
pub fn random_player_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    let first = FIRST_NAMES.choose(rng).copied().unwrap_or("John");
    let last = LAST_NAMES.choose(rng).copied().unwrap_or("Smith");
    format!("{first} {last}")
}

pub fn random_hometown<R: Rng + ?Sized>(rng: &mut R) -> String {
    HOMETOWNS.choose(rng).copied().unwrap_or("Austin, TX").to_string()
}

// ============================================================================
// Tests
// ============================================================================
