//! Season progression.
//!
//! [`Season`] owns the league, the schedule and the RNG, and moves through the
//! stages one [`Season::advance`] at a time. Which effects run on each step is
//! decided by [`transition`]; this module only carries them out.

pub mod stage;

pub use stage::{transition, Effect, SeasonStage, StepContext, Transition};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::budget::RecruitingBudget;
use crate::career::{job_offers, CoachCareer, SeasonReview};
use crate::config::SeasonConfig;
use crate::error::{LeagueError, Result};
use crate::models::{Fixture, FixtureId, League, Team, TeamId};
use crate::narrator::{resolve_controlled_game, GameNarrator, ResolvedGame};
use crate::postseason::{generate_conference_championships, Bracket};
use crate::ranking::{apply_ranks, RankingSnapshot};
use crate::roster::{generate_balanced_roster, mark_departures, roll_roster, top_up_walk_ons, RosterDelta};
use crate::schedule::{generate_season_schedule, Matchup, Schedule};
use crate::sim::{simulate_match, MatchScore};

/// Points it costs to try talking a departing player into staying.
pub const PERSUADE_COST: u32 = 50;

/// What one `advance` did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepReport {
    pub from: SeasonStage,
    pub to: SeasonStage,
    /// Fixtures scored during this step
    pub played: Vec<FixtureId>,
    /// Fixtures added to the schedule (championships, playoff rounds)
    pub scheduled: Vec<FixtureId>,
    pub review: Option<SeasonReview>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PersuadeOutcome {
    Stays,
    StillLeaving,
    CannotAfford,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingOverride {
    fixture: FixtureId,
    score: MatchScore,
}

#[derive(Debug, Clone)]
pub struct Season {
    config: SeasonConfig,
    league: League,
    schedule: Schedule,
    stage: SeasonStage,
    year: u16,
    controlled: TeamId,
    coach: CoachCareer,
    budget: RecruitingBudget,
    bracket: Option<Bracket>,
    rankings: Option<RankingSnapshot>,
    pending_override: Option<PendingOverride>,
    pending_deltas: Vec<RosterDelta>,
    last_review: Option<SeasonReview>,
    job_offers: Vec<TeamId>,
    rng: ChaCha8Rng,
}

impl Season {
    /// Starts in the pre-season of `config.progression.first_season` with a
    /// freshly generated schedule.
    pub fn new(league: League, controlled: TeamId, config: SeasonConfig, seed: u64) -> Result<Self> {
        Self::with_rng(league, controlled, config, ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn with_rng(mut league: League, controlled: TeamId, config: SeasonConfig, mut rng: ChaCha8Rng) -> Result<Self> {
        config.validate()?;
        let prestige = league.get(&controlled)?.prestige;

        league.reset_records();
        let schedule = generate_season_schedule(&league, &config.schedule, &mut rng);
        let budget = RecruitingBudget::new(prestige, &config.progression);
        let year = config.progression.first_season;

        info!("Season {year} created: {} teams, {} fixtures, controlling {controlled}", league.len(), schedule.len());

        Ok(Self {
            league,
            schedule,
            stage: SeasonStage::PreSeason,
            year,
            controlled,
            coach: CoachCareer::new("Coach", "", 3),
            budget,
            bracket: None,
            rankings: None,
            pending_override: None,
            pending_deltas: Vec::new(),
            last_review: None,
            job_offers: Vec::new(),
            rng,
            config,
        })
    }

    pub fn with_coach(mut self, coach: CoachCareer) -> Self {
        self.coach = coach;
        self
    }

    // ========== Accessors ==========

    pub fn config(&self) -> &SeasonConfig {
        &self.config
    }

    pub fn league(&self) -> &League {
        &self.league
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn stage(&self) -> SeasonStage {
        self.stage
    }

    pub fn year(&self) -> u16 {
        self.year
    }

    pub fn controlled(&self) -> &TeamId {
        &self.controlled
    }

    pub fn controlled_team(&self) -> Result<&Team> {
        self.league.get(&self.controlled)
    }

    pub fn coach(&self) -> &CoachCareer {
        &self.coach
    }

    pub fn budget(&self) -> &RecruitingBudget {
        &self.budget
    }

    pub fn budget_mut(&mut self) -> &mut RecruitingBudget {
        &mut self.budget
    }

    pub fn bracket(&self) -> Option<&Bracket> {
        self.bracket.as_ref()
    }

    pub fn rankings(&self) -> Option<&RankingSnapshot> {
        self.rankings.as_ref()
    }

    pub fn last_review(&self) -> Option<&SeasonReview> {
        self.last_review.as_ref()
    }

    pub fn job_offers(&self) -> &[TeamId] {
        &self.job_offers
    }

    /// The controlled team's game in the week the next advance plays.
    pub fn controlled_fixture(&self) -> Option<&Fixture> {
        let week = self.stage.game_week()?;
        self.schedule.team_fixture_in_week(&self.controlled, week).filter(|f| !f.played)
    }

    // ========== Progression ==========

    /// Runs one step of the season.
    pub fn advance(&mut self) -> Result<StepReport> {
        let from = self.stage;
        let next_round_follows = match (from, &self.bracket) {
            (SeasonStage::PostSeason { week }, Some(bracket)) => bracket.has_round_after(week),
            _ => false,
        };

        let ctx = StepContext::from_config(&self.config, next_round_follows);
        let Transition { next, effects } = transition(from, &ctx)?;

        let mut report = StepReport { from, to: next, played: Vec::new(), scheduled: Vec::new(), review: None };
        for effect in effects {
            self.apply(effect, &mut report)?;
        }

        self.stage = next;
        info!("Season {}: {from} -> {next}", self.year);
        Ok(report)
    }

    fn apply(&mut self, effect: Effect, report: &mut StepReport) -> Result<()> {
        match effect {
            Effect::PlayWeek(week) => {
                report.played = self.play_week(week)?;
            }
            Effect::RefreshRankings(week) => {
                apply_ranks(&mut self.league, week, &self.config.rankings);
                self.rankings = Some(RankingSnapshot::capture(&self.league, week, &self.config.rankings));
            }
            Effect::RolloverBudget => {
                let prestige = self.controlled_team()?.prestige;
                self.budget.rollover(prestige, &self.config.progression);
            }
            Effect::GenerateConferenceChampionships => {
                let games = generate_conference_championships(&self.league, &self.config.playoffs);
                report.scheduled.extend(self.schedule.extend(games));
            }
            Effect::GeneratePlayoffs => {
                self.bracket = Bracket::seed(&self.league, &self.config.rankings, &self.config.playoffs);
                match &self.bracket {
                    Some(bracket) => {
                        let games = bracket.round_matchups();
                        report.scheduled.extend(self.schedule.extend(games));
                    }
                    None => info!("Not enough teams for a playoff field"),
                }
            }
            Effect::AdvanceBracket => {
                let Some(bracket) = self.bracket.as_mut() else {
                    return Err(LeagueError::UnhandledSeasonState {
                        stage: self.stage,
                        reason: "no playoff bracket to advance".to_string(),
                    });
                };
                let games = bracket.advance(&self.schedule)?;
                report.scheduled.extend(self.schedule.extend(games));
            }
            Effect::ReviewSeason => {
                let team = self.league.get(&self.controlled)?;
                let review = SeasonReview::compute(team, &self.schedule, self.year, &self.config.playoffs);
                self.coach.apply_review(&review);
                self.job_offers = job_offers(&self.league, self.coach.prestige, &self.controlled, &mut self.rng);
                report.review = Some(review.clone());
                self.last_review = Some(review);
            }
            Effect::MarkDepartures => {
                let team = self.league.get_mut(&self.controlled)?;
                mark_departures(team, &self.config.roster, &mut self.rng);
            }
            Effect::ApplyRosterDeltas => {
                for delta in std::mem::take(&mut self.pending_deltas) {
                    let team = self.league.get_mut(&delta.team)?;
                    let (signed, released) = delta.apply(team);
                    debug!("{}: {signed} signed, {released} released", delta.team);
                }
            }
            Effect::OpenTransferPortal => {
                let prestige = self.controlled_team()?.prestige;
                self.budget.open_portal(prestige, &self.config.progression);
            }
            Effect::BoostRecruitingBudget => {
                let prestige = self.controlled_team()?.prestige;
                self.budget.portal_week(prestige, &self.config.progression);
            }
            Effect::RollRosters => {
                for team in self.league.teams_mut() {
                    let controlled = team.id == self.controlled;
                    roll_roster(team, controlled, &self.config.roster, &mut self.rng);
                }
            }
            Effect::StartNewSeason => self.start_new_season()?,
        }
        Ok(())
    }

    fn play_week(&mut self, week: u8) -> Result<Vec<FixtureId>> {
        let pending = self.pending_override.take();
        let mut played = Vec::new();

        for id in self.schedule.week_ids(week) {
            let fixture = self.schedule.get(id)?;
            if fixture.played {
                continue;
            }
            let (home, away, conference) = (fixture.home.clone(), fixture.away.clone(), fixture.is_conference_game);

            let score = match pending {
                Some(o) if o.fixture == id => o.score,
                _ => simulate_match(self.league.get(&home)?, self.league.get(&away)?, &self.config.matches, &mut self.rng),
            };

            self.schedule.record_result(id, score.home_score, score.away_score)?;
            self.league.get_mut(&home)?.record.record_game(score.home_score, score.away_score, conference);
            self.league.get_mut(&away)?.record.record_game(score.away_score, score.home_score, conference);
            played.push(id);
        }

        debug!("Week {week}: {} games played", played.len());
        Ok(played)
    }

    fn start_new_season(&mut self) -> Result<()> {
        for team in self.league.teams_mut() {
            if team.id != self.controlled && !team.roster.is_empty() {
                top_up_walk_ons(team, self.year + 1, &self.config.roster, &mut self.rng);
            }
        }

        self.league.reset_records();
        self.year += 1;
        self.schedule = generate_season_schedule(&self.league, &self.config.schedule, &mut self.rng);
        self.bracket = None;
        self.rankings = None;
        self.pending_override = None;
        self.job_offers.clear();

        let prestige = self.controlled_team()?.prestige;
        self.budget.reset(prestige, &self.config.progression);
        info!("Season {} schedule ready: {} fixtures", self.year, self.schedule.len());
        Ok(())
    }

    // ========== External inputs ==========

    /// Supplies the final score of the controlled team's game this week.
    /// Used instead of the simulator when the week is played.
    pub fn set_score_override(&mut self, home_score: u16, away_score: u16) -> Result<()> {
        let invalid = |reason: &str| LeagueError::InvalidScoreOverride {
            home_score,
            away_score,
            reason: reason.to_string(),
        };

        if home_score == away_score {
            return Err(invalid("games cannot end level"));
        }
        let fixture = self.controlled_fixture().map(|f| f.id).ok_or_else(|| invalid("controlled team has no game to play"))?;

        self.pending_override = Some(PendingOverride { fixture, score: MatchScore::new(home_score, away_score) });
        Ok(())
    }

    /// Lets `narrator` decide the controlled team's game this week, falling
    /// back to the simulator. `None` on a bye.
    pub fn narrate_controlled_game(&mut self, narrator: &dyn GameNarrator) -> Result<Option<ResolvedGame>> {
        let Some(fixture) = self.controlled_fixture() else {
            return Ok(None);
        };
        let (home, away) = (fixture.home.clone(), fixture.away.clone());

        let resolved = resolve_controlled_game(
            narrator,
            self.league.get(&home)?,
            self.league.get(&away)?,
            &self.config.matches,
            &mut self.rng,
        );
        self.set_score_override(resolved.score.home_score, resolved.score.away_score)?;
        Ok(Some(resolved))
    }

    /// Queues signings and releases, applied when leaving the coaching
    /// carousel and when the transfer portal closes.
    pub fn queue_roster_delta(&mut self, delta: RosterDelta) -> Result<()> {
        if !self.league.contains(&delta.team) {
            return Err(LeagueError::UnknownTeamReference(delta.team));
        }
        self.pending_deltas.push(delta);
        Ok(())
    }

    /// Spends points to talk a departing player into staying. Retention only;
    /// players without a leaving status are rejected before anything is spent.
    pub fn persuade_player(&mut self, player_id: &str) -> Result<PersuadeOutcome> {
        if self.stage != SeasonStage::Retention {
            return Err(LeagueError::UnhandledSeasonState {
                stage: self.stage,
                reason: "players can only be persuaded during retention".to_string(),
            });
        }

        let team = self.league.get_mut(&self.controlled)?;
        let prestige = team.prestige;
        let player = team
            .roster
            .iter_mut()
            .find(|p| p.id == player_id)
            .ok_or_else(|| LeagueError::UnknownPlayerReference(player_id.to_string()))?;
        if !player.is_leaving() {
            return Err(LeagueError::PlayerNotLeaving(player_id.to_string()));
        }

        if !self.budget.spend(PERSUADE_COST) {
            return Ok(PersuadeOutcome::CannotAfford);
        }
        if self.rng.gen_bool(f64::from(prestige.min(100)) / 100.0) {
            player.leaving_status = None;
            Ok(PersuadeOutcome::Stays)
        } else {
            Ok(PersuadeOutcome::StillLeaving)
        }
    }

    /// Replaces the controlled team's game in `week` with a home game against
    /// `opponent`. Both teams lose whatever they had scheduled that week.
    pub fn swap_controlled_game(&mut self, week: u8, opponent: &TeamId) -> Result<FixtureId> {
        if self.stage != SeasonStage::PreSeason {
            return Err(LeagueError::UnhandledSeasonState {
                stage: self.stage,
                reason: "the schedule can only be edited in the pre-season".to_string(),
            });
        }
        if !self.league.contains(opponent) {
            return Err(LeagueError::UnknownTeamReference(opponent.clone()));
        }
        if *opponent == self.controlled {
            return Err(LeagueError::InvalidScheduleEdit("a team cannot play itself".to_string()));
        }
        if week == 0 || week > self.config.schedule.regular_season_weeks {
            return Err(LeagueError::InvalidScheduleEdit(format!("week {week} is not a regular-season week")));
        }

        let removed = self.schedule.remove_unplayed(&self.controlled, week) + self.schedule.remove_unplayed(opponent, week);
        let id = self.schedule.insert(Matchup::new(week, self.controlled.clone(), opponent.clone(), false));
        debug!("Week {week}: {} hosts {opponent} ({removed} fixtures replaced)", self.controlled);
        Ok(id)
    }

    /// Takes over another program (a job offer or a fresh start). A program
    /// without players gets a balanced roster; the season keeps its stage.
    pub fn switch_controlled_team(&mut self, team: TeamId) -> Result<()> {
        if !matches!(self.stage, SeasonStage::PreSeason | SeasonStage::CoachingCarousel) {
            return Err(LeagueError::UnhandledSeasonState {
                stage: self.stage,
                reason: "coaches change jobs in the pre-season or the coaching carousel".to_string(),
            });
        }

        let new_team = self.league.get_mut(&team)?;
        if new_team.roster.is_empty() {
            new_team.roster = generate_balanced_roster(&new_team.id, new_team.prestige, &mut self.rng);
            debug!("{}: generated {} players", new_team.name, new_team.roster.len());
        }
        self.coach.record_hire(new_team, self.year);
        info!("Coach {} takes over {}", self.coach.name, new_team.name);
        self.controlled = team;
        self.pending_override = None;
        Ok(())
    }
}

// ========== Tests ==========
