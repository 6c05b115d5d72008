//! Match outcome simulator.
//!
//! Prestige is the only strength signal. The home side wins with probability
//! `0.5 + (diff + home_advantage) / 100`; the score is then shaped so the
//! chosen winner always finishes strictly ahead.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::MatchConfig;
use crate::models::Team;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchScore {
    pub home_score: u16,
    pub away_score: u16,
}

impl MatchScore {
    pub fn new(home_score: u16, away_score: u16) -> Self {
        Self { home_score, away_score }
    }

    pub fn home_won(&self) -> bool {
        self.home_score > self.away_score
    }

    pub fn is_draw(&self) -> bool {
        self.home_score == self.away_score
    }
}

/// Home win probability, clamped into [0, 1] for lopsided prestige gaps.
pub fn home_win_probability(home: &Team, away: &Team, config: &MatchConfig) -> f64 {
    let diff = f64::from(home.prestige) - f64::from(away.prestige);
    (0.5 + (diff + config.home_advantage) / 100.0).clamp(0.0, 1.0)
}

/// Resolves one game between `home` and `away`.
pub fn simulate_match<R: Rng + ?Sized>(home: &Team, away: &Team, config: &MatchConfig, rng: &mut R) -> MatchScore {
    let home_wins = rng.gen::<f64>() < home_win_probability(home, away, config);

    let diff = f64::from(home.prestige) - f64::from(away.prestige);
    let base = config.base_score + (rng.gen::<f64>() * 2.0 * config.score_spread - config.score_spread);
    let home_raw = (base + diff / 2.0).floor().max(0.0);
    let away_raw = (base - diff / 2.0).floor().max(0.0);

    let (mut winner, loser) = if home_wins { (home_raw, away_raw) } else { (away_raw, home_raw) };
    if winner <= loser {
        let margin = rng.gen_range(1..=config.max_forced_margin.max(1));
        winner = loser + f64::from(margin);
    }

    let (home_score, away_score) = if home_wins { (winner, loser) } else { (loser, winner) };
    MatchScore::new(to_score(home_score), to_score(away_score))
}

fn to_score(raw: f64) -> u16 {
    raw.clamp(0.0, f64::from(u16::MAX)) as u16
}

// ========== Tests ==========
