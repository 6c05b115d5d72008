//! # cfb_core - Deterministic College Football Season Engine
//!
//! Runs the yearly cycle of a college football league: schedule generation,
//! weekly results, polls, conference championships, the playoff, and the
//! offseason stages that lead into the next year.
//!
//! ## Features
//! - Same seed, same season: one `ChaCha8Rng` drives every random choice
//! - Pure stage transitions (`season::transition`) with effects applied by `Season`
//! - Embedded 134-team FBS league
//! - Hooks for external score narration and roster changes
//!
//! ```rust
//! use cfb_core::{League, Season, SeasonConfig, SeasonStage, TeamId};
//!
//! let league = League::default_fbs()?;
//! let mut season = Season::new(league, TeamId::from("1"), SeasonConfig::default(), 7)?;
//! season.advance()?;
//! assert_eq!(season.stage(), SeasonStage::RegularSeason { week: 1 });
//! # Ok::<(), cfb_core::LeagueError>(())
//! ```

pub mod budget;
pub mod career;
pub mod config;
pub mod data;
pub mod error;
pub mod models;
pub mod narrator;
pub mod postseason;
pub mod ranking;
pub mod roster;
pub mod schedule;
pub mod season;
pub mod sim;

pub use config::SeasonConfig;
pub use error::{ConfigError, LeagueError, Result};
pub use models::{Conference, Fixture, FixtureId, League, Player, Team, TeamId, TeamRecord};
pub use schedule::{generate_season_schedule, Schedule, ScheduleReport};
pub use season::{Season, SeasonStage, StepReport};
pub use sim::{simulate_match, MatchScore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
