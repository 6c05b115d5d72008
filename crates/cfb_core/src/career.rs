//! Coach career: end-of-season review, reputation and job offers.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::PlayoffConfig;
use crate::models::{Fixture, League, Team, TeamId};
use crate::postseason::playoff::title_week;
use crate::schedule::Schedule;

pub const MAX_JOB_OFFERS: usize = 5;

/// Outcome of one season for the controlled program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonReview {
    pub season: u16,
    pub team: TeamId,
    pub team_name: String,
    pub wins: u16,
    pub losses: u16,
    pub expected_wins: u16,
    pub won_conference: bool,
    pub playoff_wins: u16,
    pub won_title: bool,
    /// Change to the coach's reputation before clamping
    pub prestige_delta: f64,
}

impl SeasonReview {
    /// Scores a finished season.
    ///
    /// Expected wins are `max(1, round(prestige / 10))`. Each win above that is
    /// worth 2.5, each win short costs 1.5. A conference title adds 10, every
    /// playoff win 8 and the national title another 15.
    pub fn compute(team: &Team, schedule: &Schedule, season: u16, playoffs: &PlayoffConfig) -> Self {
        let wins = team.record.wins;
        let losses = team.record.losses;
        let expected_wins = ((f64::from(team.prestige) / 10.0).round() as u16).max(1);

        let victories: Vec<&Fixture> =
            schedule.team_fixtures(&team.id).filter(|f| f.played && f.won_by(&team.id)).collect();

        let won_conference = victories.iter().any(|f| f.week == playoffs.championship_week);
        let playoff_wins =
            victories.iter().filter(|f| f.is_playoff && f.week >= playoffs.first_round_week).count() as u16;
        let won_title = title_week(playoffs.format, playoffs.first_round_week)
            .is_some_and(|w| victories.iter().any(|f| f.is_playoff && f.week == w));

        let diff = f64::from(wins) - f64::from(expected_wins);
        let mut prestige_delta = if diff > 0.0 { diff * 2.5 } else { diff * 1.5 };
        if won_conference {
            prestige_delta += 10.0;
        }
        prestige_delta += 8.0 * f64::from(playoff_wins);
        if won_title {
            prestige_delta += 15.0;
        }

        Self {
            season,
            team: team.id.clone(),
            team_name: team.name.clone(),
            wins,
            losses,
            expected_wins,
            won_conference,
            playoff_wins,
            won_title,
            prestige_delta,
        }
    }
}

/// Long-running record of the coach across seasons and jobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoachCareer {
    pub name: String,
    #[serde(default)]
    pub alma_mater: String,
    /// 1 (high school) to 5 (legend)
    pub level: u8,
    /// Reputation, 5-99 once a season has been reviewed
    pub prestige: f64,
    pub wins: u32,
    pub losses: u32,
    pub conference_titles: u32,
    pub national_titles: u32,
    pub history: Vec<String>,
}

impl CoachCareer {
    /// New coach. Starting reputation depends on the level.
    pub fn new(name: impl Into<String>, alma_mater: impl Into<String>, level: u8) -> Self {
        let level = level.clamp(1, 5);
        Self {
            name: name.into(),
            alma_mater: alma_mater.into(),
            level,
            prestige: f64::from(starting_band(level).2),
            wins: 0,
            losses: 0,
            conference_titles: 0,
            national_titles: 0,
            history: Vec::new(),
        }
    }

    pub fn apply_review(&mut self, review: &SeasonReview) {
        self.prestige = (self.prestige + review.prestige_delta).clamp(5.0, 99.0);
        self.level = ((self.prestige / 20.0).floor() as u8 + 1).min(5);
        self.wins += u32::from(review.wins);
        self.losses += u32::from(review.losses);
        self.conference_titles += u32::from(review.won_conference);
        self.national_titles += u32::from(review.won_title);
        self.history.push(format!("{}: {} ({}-{})", review.season, review.team_name, review.wins, review.losses));

        info!(
            "Coach {} review {}: {:+.1} prestige -> {:.1} (level {})",
            self.name, review.season, review.prestige_delta, self.prestige, self.level
        );
    }

    pub fn record_hire(&mut self, team: &Team, season: u16) {
        self.history.push(format!("Hired by {} ({season})", team.name));
    }
}

/// (min team prestige, max team prestige, starting coach prestige) per level
fn starting_band(level: u8) -> (u8, u8, u8) {
    match level {
        1 => (45, 60, 15),
        2 => (50, 75, 30),
        3 => (65, 85, 50),
        4 => (75, 90, 70),
        5 => (85, 99, 90),
        _ => (40, 60, 10),
    }
}

/// End-of-season offers: programs within `[prestige - 15, prestige + 10]`,
/// never the current one, shuffled, at most five.
pub fn job_offers<R: Rng + ?Sized>(league: &League, prestige: f64, current: &TeamId, rng: &mut R) -> Vec<TeamId> {
    let mut offers: Vec<TeamId> = league
        .teams()
        .iter()
        .filter(|t| t.id != *current)
        .filter(|t| (prestige - 15.0..=prestige + 10.0).contains(&f64::from(t.prestige)))
        .map(|t| t.id.clone())
        .collect();
    offers.shuffle(rng);
    offers.truncate(MAX_JOB_OFFERS);
    offers
}

/// First job offers for a newly created coach, by level.
pub fn initial_job_offers<R: Rng + ?Sized>(league: &League, level: u8, rng: &mut R) -> Vec<TeamId> {
    let (min, max, _) = starting_band(level);
    let mut offers: Vec<TeamId> =
        league.teams().iter().filter(|t| (min..=max).contains(&t.prestige)).map(|t| t.id.clone()).collect();
    offers.shuffle(rng);
    offers.truncate(MAX_JOB_OFFERS);
    offers
}

// ========== Tests ==========
