//! # Season Configuration
//!
//! Every tuning constant of the season engine lives here so presets and
//! experiments never have to touch the algorithms.
//!
//! ```rust
//! use cfb_core::config::SeasonConfig;
//!
//! let config = SeasonConfig::default();
//! let faithful = SeasonConfig::faithful();
//! assert!(config.validate().is_ok());
//! assert!(faithful.validate().is_ok());
//! ```

mod env;

pub use env::{load_from_env, load_from_path, SEASON_CONFIG_PATH_ENV};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Regular-season scheduling constraints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Target regular-season games per team (shortfalls tolerated)
    pub games_per_team: u8,
    /// Last regular-season week
    pub regular_season_weeks: u8,
    /// Conferences up to this size play a full round robin
    pub round_robin_max_teams: usize,
    /// Conference games for larger conferences (also the number of matching rounds)
    pub large_conference_games: u8,
    /// First week of the preferred conference window (window runs to the last week)
    pub conference_window_start: u8,
    /// Cross-conference filling passes before giving up
    pub fill_passes: u8,
    /// Passes before this index only pair teams from different conferences
    pub same_conference_fill_from_pass: u8,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            games_per_team: 12,
            regular_season_weeks: 14,
            round_robin_max_teams: 10,
            large_conference_games: 9,
            conference_window_start: 5,
            fill_passes: 5,
            same_conference_fill_from_pass: 2,
        }
    }
}

/// Match outcome model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Added to the prestige differential in favour of the home side
    pub home_advantage: f64,
    /// Centre of the base score draw
    pub base_score: f64,
    /// Base score is drawn from base_score ± score_spread
    pub score_spread: f64,
    /// Forced winning margin is drawn from 1..=max_forced_margin
    pub max_forced_margin: u16,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self { home_advantage: 3.0, base_score: 24.0, score_spread: 7.0, max_forced_margin: 7 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    pub poll_size: usize,
    /// From this week on the CFP ranking drives `rank`, before it the AP poll
    pub cfp_from_week: u8,
    pub cfp_win_weight: i64,
    pub cfp_loss_weight: i64,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self { poll_size: 25, cfp_from_week: 8, cfp_win_weight: 100, cfp_loss_weight: 120 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayoffFormat {
    /// Only the four first-round games are generated; seeds 1-4 never play.
    FirstRoundOnly,
    /// First round, quarterfinals (seeds 1-4 host), semifinals and a title game.
    FullBracket,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayoffConfig {
    pub format: PlayoffFormat,
    pub championship_week: u8,
    pub first_round_week: u8,
}

/// Latest week any fixture may land in.
pub const MAX_SEASON_WEEK: u8 = 52;

/// Rounds played after the first round in a full bracket.
const ROUNDS_AFTER_FIRST: u8 = 3;

// With the full bracket the title game lands in week 19, three weeks past the
// single-round postseason that ends in week 16.
impl Default for PlayoffConfig {
    fn default() -> Self {
        Self { format: PlayoffFormat::FullBracket, championship_week: 15, first_round_week: 16 }
    }
}

/// Recruiting budget and offseason pacing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionConfig {
    pub weekly_points_base: f64,
    pub weekly_points_per_prestige: f64,
    /// Unspent points carried into the next week, at most
    pub rollover_cap: u32,
    pub portal_open_bonus: u32,
    pub portal_week_bonus: u32,
    pub portal_weeks: u8,
    /// Calendar year of the first simulated season
    pub first_season: u16,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            weekly_points_base: 100.0,
            weekly_points_per_prestige: 1.5,
            rollover_cap: 20,
            portal_open_bonus: 200,
            portal_week_bonus: 100,
            portal_weeks: 2,
            first_season: 2025,
        }
    }
}

/// Roster turnover probabilities.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    pub nfl_rating_threshold: u8,
    pub nfl_departure_chance: f64,
    pub transfer_chance: f64,
    /// Transfer chance for low-rated players on elite programs
    pub unhappy_transfer_chance: f64,
    pub unhappy_rating_below: u8,
    pub unhappy_prestige_above: u8,
    pub cpu_star_rating_threshold: u8,
    pub cpu_star_departure_chance: f64,
    pub cpu_attrition_chance: f64,
    pub max_yearly_improvement: u8,
    pub min_roster_size: usize,
    pub walk_on_min_rating: u8,
    pub walk_on_max_rating: u8,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            nfl_rating_threshold: 92,
            nfl_departure_chance: 0.7,
            transfer_chance: 0.05,
            unhappy_transfer_chance: 0.15,
            unhappy_rating_below: 75,
            unhappy_prestige_above: 80,
            cpu_star_rating_threshold: 94,
            cpu_star_departure_chance: 0.8,
            cpu_attrition_chance: 0.1,
            max_yearly_improvement: 3,
            min_roster_size: 45,
            walk_on_min_rating: 60,
            walk_on_max_rating: 75,
        }
    }
}

/// Complete season engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SeasonConfig {
    pub schedule: ScheduleConfig,
    pub matches: MatchConfig,
    pub rankings: RankingConfig,
    pub playoffs: PlayoffConfig,
    pub progression: ProgressionConfig,
    pub roster: RosterConfig,
}

impl SeasonConfig {
    /// Single playoff round: only the four first-round games are played.
    pub fn faithful() -> Self {
        let mut cfg = Self::default();
        cfg.playoffs.format = PlayoffFormat::FirstRoundOnly;
        cfg
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SeasonConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let s = &self.schedule;
        if s.regular_season_weeks == 0 {
            return Err(invalid("schedule.regular_season_weeks", "must be at least 1"));
        }
        if s.conference_window_start == 0 || s.conference_window_start > s.regular_season_weeks {
            return Err(invalid(
                "schedule.conference_window_start",
                format!("must be within 1..={}", s.regular_season_weeks),
            ));
        }
        if s.games_per_team > s.regular_season_weeks {
            return Err(invalid(
                "schedule.games_per_team",
                format!("{} games cannot fit in {} weeks", s.games_per_team, s.regular_season_weeks),
            ));
        }

        let p = &self.playoffs;
        if p.championship_week <= s.regular_season_weeks {
            return Err(invalid("playoffs.championship_week", "must follow the regular season"));
        }
        if p.first_round_week <= p.championship_week {
            return Err(invalid("playoffs.first_round_week", "must follow championship week"));
        }
        if p.first_round_week > MAX_SEASON_WEEK - ROUNDS_AFTER_FIRST {
            return Err(invalid(
                "playoffs.first_round_week",
                format!("must be at most {}", MAX_SEASON_WEEK - ROUNDS_AFTER_FIRST),
            ));
        }

        let m = &self.matches;
        if m.max_forced_margin == 0 {
            return Err(invalid("matches.max_forced_margin", "must be at least 1"));
        }
        if m.score_spread < 0.0 {
            return Err(invalid("matches.score_spread", "must not be negative"));
        }

        if self.rankings.poll_size == 0 {
            return Err(invalid("rankings.poll_size", "must be at least 1"));
        }
        if self.progression.portal_weeks == 0 {
            return Err(invalid("progression.portal_weeks", "must be at least 1"));
        }

        let r = &self.roster;
        if r.walk_on_min_rating > r.walk_on_max_rating {
            return Err(invalid("roster.walk_on_min_rating", "must not exceed walk_on_max_rating"));
        }
        for (field, chance) in [
            ("roster.nfl_departure_chance", r.nfl_departure_chance),
            ("roster.transfer_chance", r.transfer_chance),
            ("roster.unhappy_transfer_chance", r.unhappy_transfer_chance),
            ("roster.cpu_star_departure_chance", r.cpu_star_departure_chance),
            ("roster.cpu_attrition_chance", r.cpu_attrition_chance),
        ] {
            if !(0.0..=1.0).contains(&chance) {
                return Err(invalid(field, format!("{chance} is not a probability")));
            }
        }

        Ok(())
    }

    /// Week of the last playoff round the configured bracket can produce.
    pub fn last_playoff_week(&self) -> u8 {
        match self.playoffs.format {
            PlayoffFormat::FirstRoundOnly => self.playoffs.first_round_week,
            PlayoffFormat::FullBracket => self.playoffs.first_round_week + ROUNDS_AFTER_FIRST,
        }
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue { field, reason: reason.into() }
}

// ========== Tests ==========

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let cfg = SeasonConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.schedule.games_per_team, 12);
        assert_eq!(cfg.playoffs.format, PlayoffFormat::FullBracket);
        assert_eq!(cfg.last_playoff_week(), 19);
    }

    #[test]
    fn test_faithful_preset_single_round() {
        let cfg = SeasonConfig::faithful();
        assert_eq!(cfg.playoffs.format, PlayoffFormat::FirstRoundOnly);
        assert_eq!(cfg.last_playoff_week(), 16);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let cfg = SeasonConfig::from_json(r#"{"matches": {"home_advantage": 5.0}}"#).unwrap();
        assert!((cfg.matches.home_advantage - 5.0).abs() < f64::EPSILON);
        assert!((cfg.matches.base_score - 24.0).abs() < f64::EPSILON);
        assert_eq!(cfg.rankings.poll_size, 25);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let err = SeasonConfig::from_json(r#"{"schedule": {"games_per_team": 20}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { field: "schedule.games_per_team", .. }));

        let err = SeasonConfig::from_json(r#"{"roster": {"transfer_chance": 1.5}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { field: "roster.transfer_chance", .. }));
    }

    #[test]
    fn test_playoff_weeks_bounded() {
        let err = SeasonConfig::from_json(r#"{"playoffs": {"first_round_week": 253}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { field: "playoffs.first_round_week", .. }));

        let cfg = SeasonConfig::from_json(r#"{"playoffs": {"first_round_week": 49}}"#).unwrap();
        assert_eq!(cfg.last_playoff_week(), MAX_SEASON_WEEK);
    }

    #[test]
    fn test_playoff_format_serde() {
        let cfg = SeasonConfig::from_json(r#"{"playoffs": {"format": "first_round_only"}}"#).unwrap();
        assert_eq!(cfg.playoffs.format, PlayoffFormat::FirstRoundOnly);
    }
}
