//! Weekly recruiting budget for the controlled program.
//!
//! The recruiting economy itself lives outside the engine; the engine only
//! decides how many points are available at each step.

use serde::{Deserialize, Serialize};

use crate::config::ProgressionConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecruitingBudget {
    points: u32,
}

/// `floor(base + per_prestige * prestige)`
pub fn weekly_points(prestige: u8, config: &ProgressionConfig) -> u32 {
    (config.weekly_points_base + config.weekly_points_per_prestige * f64::from(prestige)).floor().max(0.0) as u32
}

impl RecruitingBudget {
    /// Fresh season budget: one week of base points.
    pub fn new(prestige: u8, config: &ProgressionConfig) -> Self {
        Self { points: weekly_points(prestige, config) }
    }

    pub fn points(&self) -> u32 {
        self.points
    }

    /// After a scored week: new base plus up to `rollover_cap` unspent points.
    pub fn rollover(&mut self, prestige: u8, config: &ProgressionConfig) {
        self.points = weekly_points(prestige, config) + self.points.min(config.rollover_cap);
    }

    pub fn open_portal(&mut self, prestige: u8, config: &ProgressionConfig) {
        self.points = weekly_points(prestige, config) + config.portal_open_bonus;
    }

    pub fn portal_week(&mut self, prestige: u8, config: &ProgressionConfig) {
        self.points = weekly_points(prestige, config) + config.portal_week_bonus;
    }

    pub fn reset(&mut self, prestige: u8, config: &ProgressionConfig) {
        self.points = weekly_points(prestige, config);
    }

    /// Deducts `cost` if affordable.
    pub fn spend(&mut self, cost: u32) -> bool {
        match self.points.checked_sub(cost) {
            Some(left) => {
                self.points = left;
                true
            }
            None => false,
        }
    }
}
