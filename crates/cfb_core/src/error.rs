use thiserror::Error;

use crate::models::{FixtureId, TeamId};
use crate::season::SeasonStage;

#[derive(Error, Debug)]
pub enum LeagueError {
    #[error("Unknown team reference: {0}")]
    UnknownTeamReference(TeamId),

    #[error("Unknown fixture reference: {0}")]
    UnknownFixtureReference(FixtureId),

    #[error("Fixture {0} has already been played")]
    FixtureAlreadyPlayed(FixtureId),

    #[error("Unhandled season state: {stage:?} ({reason})")]
    UnhandledSeasonState { stage: SeasonStage, reason: String },

    #[error("Unknown player reference: {0}")]
    UnknownPlayerReference(String),

    #[error("Player {0} is not leaving")]
    PlayerNotLeaving(String),

    #[error("Invalid schedule edit: {0}")]
    InvalidScheduleEdit(String),

    #[error("Invalid score override {home_score}-{away_score}: {reason}")]
    InvalidScoreOverride { home_score: u16, away_score: u16, reason: String },

    #[error("Invalid league: {0}")]
    InvalidLeague(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Deserialization error: {0}")]
    Deserialization(#[from] serde_json::Error),
}

impl LeagueError {
    /// Contract violations point at a caller bug rather than a bad input file.
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            LeagueError::UnknownTeamReference(_)
                | LeagueError::UnknownFixtureReference(_)
                | LeagueError::UnknownPlayerReference(_)
                | LeagueError::UnhandledSeasonState { .. }
        )
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config from {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

pub type Result<T> = std::result::Result<T, LeagueError>;
