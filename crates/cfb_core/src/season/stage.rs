//! Season stages and the pure transition table.
//!
//! `transition` only decides what happens; `Season` carries the effects out.
//! Keeping the table free of league state lets every edge be tested alone.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::SeasonConfig;
use crate::error::{LeagueError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum SeasonStage {
    PreSeason,
    RegularSeason { week: u8 },
    ConferenceChampionship { week: u8 },
    PostSeason { week: u8 },
    CoachingCarousel,
    Retention,
    TransferPortal { sub_week: u8 },
}

impl SeasonStage {
    /// Week whose games the next advance plays, if any.
    pub fn game_week(&self) -> Option<u8> {
        match *self {
            SeasonStage::RegularSeason { week }
            | SeasonStage::ConferenceChampionship { week }
            | SeasonStage::PostSeason { week } => Some(week),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SeasonStage::PreSeason => "Pre-Season",
            SeasonStage::RegularSeason { .. } => "Regular Season",
            SeasonStage::ConferenceChampionship { .. } => "Conference Championship",
            SeasonStage::PostSeason { .. } => "Post-Season",
            SeasonStage::CoachingCarousel => "Coaching Carousel",
            SeasonStage::Retention => "Retention",
            SeasonStage::TransferPortal { .. } => "Transfer Portal",
        }
    }
}

impl fmt::Display for SeasonStage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SeasonStage::TransferPortal { sub_week } => write!(f, "{} ({sub_week})", self.name()),
            _ => match self.game_week() {
                Some(week) => write!(f, "{} (week {week})", self.name()),
                None => f.write_str(self.name()),
            },
        }
    }
}

/// Calendar facts `transition` needs besides the stage itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepContext {
    pub regular_season_weeks: u8,
    pub championship_week: u8,
    pub first_round_week: u8,
    pub portal_weeks: u8,
    /// Another playoff round follows the current post-season week
    pub next_round_follows: bool,
}

impl StepContext {
    pub fn from_config(config: &SeasonConfig, next_round_follows: bool) -> Self {
        Self {
            regular_season_weeks: config.schedule.regular_season_weeks,
            championship_week: config.playoffs.championship_week,
            first_round_week: config.playoffs.first_round_week,
            portal_weeks: config.progression.portal_weeks,
            next_round_follows,
        }
    }
}

/// Work the orchestrator performs during one advance, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    PlayWeek(u8),
    RefreshRankings(u8),
    RolloverBudget,
    GenerateConferenceChampionships,
    GeneratePlayoffs,
    AdvanceBracket,
    /// Coach review and job offers
    ReviewSeason,
    MarkDepartures,
    ApplyRosterDeltas,
    OpenTransferPortal,
    BoostRecruitingBudget,
    RollRosters,
    /// Walk-ons, record reset, next year's schedule
    StartNewSeason,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub next: SeasonStage,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn to(next: SeasonStage, effects: Vec<Effect>) -> Self {
        Self { next, effects }
    }
}

fn game_week_effects(week: u8) -> Vec<Effect> {
    vec![Effect::PlayWeek(week), Effect::RefreshRankings(week), Effect::RolloverBudget]
}

fn unhandled(stage: SeasonStage, reason: impl Into<String>) -> LeagueError {
    LeagueError::UnhandledSeasonState { stage, reason: reason.into() }
}

/// Next stage and effects for one advance from `stage`.
pub fn transition(stage: SeasonStage, ctx: &StepContext) -> Result<Transition> {
    let transition = match stage {
        SeasonStage::PreSeason => Transition::to(SeasonStage::RegularSeason { week: 1 }, Vec::new()),

        SeasonStage::RegularSeason { week } if week == 0 || week > ctx.regular_season_weeks => {
            return Err(unhandled(stage, format!("regular season runs weeks 1-{}", ctx.regular_season_weeks)));
        }
        SeasonStage::RegularSeason { week } if week == ctx.regular_season_weeks => {
            let mut effects = game_week_effects(week);
            effects.push(Effect::GenerateConferenceChampionships);
            Transition::to(SeasonStage::ConferenceChampionship { week: ctx.championship_week }, effects)
        }
        SeasonStage::RegularSeason { week } => {
            Transition::to(SeasonStage::RegularSeason { week: week + 1 }, game_week_effects(week))
        }

        SeasonStage::ConferenceChampionship { week } => {
            if week != ctx.championship_week {
                return Err(unhandled(stage, format!("championships are played in week {}", ctx.championship_week)));
            }
            let mut effects = game_week_effects(week);
            effects.push(Effect::GeneratePlayoffs);
            Transition::to(SeasonStage::PostSeason { week: ctx.first_round_week }, effects)
        }

        SeasonStage::PostSeason { week } => {
            if week < ctx.first_round_week {
                return Err(unhandled(stage, format!("playoffs start in week {}", ctx.first_round_week)));
            }
            let mut effects = game_week_effects(week);
            if ctx.next_round_follows {
                effects.push(Effect::AdvanceBracket);
                Transition::to(SeasonStage::PostSeason { week: week + 1 }, effects)
            } else {
                effects.push(Effect::ReviewSeason);
                Transition::to(SeasonStage::CoachingCarousel, effects)
            }
        }

        SeasonStage::CoachingCarousel => {
            Transition::to(SeasonStage::Retention, vec![Effect::MarkDepartures, Effect::ApplyRosterDeltas])
        }

        SeasonStage::Retention => {
            Transition::to(SeasonStage::TransferPortal { sub_week: 1 }, vec![Effect::OpenTransferPortal])
        }

        SeasonStage::TransferPortal { sub_week } if sub_week == 0 || sub_week > ctx.portal_weeks => {
            return Err(unhandled(stage, format!("transfer portal runs {} sub-weeks", ctx.portal_weeks)));
        }
        SeasonStage::TransferPortal { sub_week } if sub_week < ctx.portal_weeks => Transition::to(
            SeasonStage::TransferPortal { sub_week: sub_week + 1 },
            vec![Effect::BoostRecruitingBudget],
        ),
        SeasonStage::TransferPortal { .. } => Transition::to(
            SeasonStage::PreSeason,
            vec![Effect::RollRosters, Effect::ApplyRosterDeltas, Effect::StartNewSeason],
        ),
    };

    Ok(transition)
}

// ========== Tests ==========
