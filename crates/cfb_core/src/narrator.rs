//! Seam for an external game narrator.
//!
//! A narrator (typically a text-generation service) may produce the final
//! score of the controlled team's game together with a write-up. The engine
//! never depends on one: any failure or unusable score falls back to the
//! built-in simulator.

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::config::MatchConfig;
use crate::models::Team;
use crate::sim::{simulate_match, MatchScore};

#[derive(Error, Debug)]
pub enum NarratorError {
    #[error("Narrator unavailable: {0}")]
    Unavailable(String),

    #[error("Narrator returned an unusable result: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarratedGame {
    pub home_score: u16,
    pub away_score: u16,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub highlights: Vec<String>,
}

pub trait GameNarrator {
    fn narrate(&self, home: &Team, away: &Team) -> Result<NarratedGame, NarratorError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreSource {
    Narrator,
    Simulator,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedGame {
    pub score: MatchScore,
    pub source: ScoreSource,
    pub summary: Option<String>,
}

/// Asks `narrator` for the game, falling back to [`simulate_match`].
pub fn resolve_controlled_game<R: Rng + ?Sized>(
    narrator: &dyn GameNarrator,
    home: &Team,
    away: &Team,
    config: &MatchConfig,
    rng: &mut R,
) -> ResolvedGame {
    let narrated = narrator.narrate(home, away).and_then(|game| {
        if game.home_score == game.away_score {
            Err(NarratorError::InvalidResponse(format!("tied score {}-{}", game.home_score, game.away_score)))
        } else {
            Ok(game)
        }
    });

    match narrated {
        Ok(game) => ResolvedGame {
            score: MatchScore::new(game.home_score, game.away_score),
            source: ScoreSource::Narrator,
            summary: Some(game.summary),
        },
        Err(err) => {
            warn!("{} vs {}: {err}; using simulator", home.name, away.name);
            ResolvedGame { score: simulate_match(home, away, config, rng), source: ScoreSource::Simulator, summary: None }
        }
    }
}
