//! cfb CLI
//!
//! Runs dynasty seasons headless and prints what happened.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

use cfb_core::career::CoachCareer;
use cfb_core::config::{load_from_env, load_from_path, PlayoffFormat};
use cfb_core::ranking::{cfp_top25, conference_standings};
use cfb_core::schedule::ScheduleReport;
use cfb_core::{generate_season_schedule, League, Season, SeasonConfig, SeasonStage, StepReport, TeamId};

#[derive(Parser)]
#[command(name = "cfb")]
#[command(about = "Simulate college football dynasty seasons", long_about = None)]
#[command(version = cfb_core::VERSION)]
struct Cli {
    /// Season config JSON (falls back to CFB_SEASON_CONFIG_PATH, then defaults)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// League JSON replacing the bundled FBS teams
    #[arg(long, global = true)]
    league: Option<PathBuf>,

    /// Use the single-round playoff preset
    #[arg(long, global = true, default_value = "false")]
    faithful: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play whole seasons from pre-season to the next pre-season
    Simulate {
        /// Controlled team id
        #[arg(long, default_value = "1")]
        team: String,

        #[arg(long, default_value = "2025")]
        seed: u64,

        #[arg(long, default_value = "1")]
        seasons: u16,

        /// Coach level (1-5) used for the starting prestige
        #[arg(long, default_value = "3")]
        coach_level: u8,

        /// Write the coach career as JSON after the last season
        #[arg(long)]
        career_out: Option<PathBuf>,
    },

    /// Generate one regular-season schedule and report on it
    Schedule {
        #[arg(long, default_value = "2025")]
        seed: u64,

        /// Only print this team's games
        #[arg(long)]
        team: Option<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref(), cli.faithful)?;
    let league = load_league(cli.league.as_deref())?;

    match cli.command {
        Commands::Simulate { team, seed, seasons, coach_level, career_out } => {
            let coach = CoachCareer::new("Coach", "", coach_level);
            let mut season = Season::new(league, TeamId::new(team), config, seed)?.with_coach(coach);

            for _ in 0..seasons {
                play_season(&mut season)?;
            }

            if let Some(path) = career_out {
                let json = serde_json::to_string_pretty(season.coach())?;
                std::fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
                info!("Wrote coach career to {}", path.display());
                println!("\nCareer saved to: {}", path.display());
            }
        }

        Commands::Schedule { seed, team } => {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let schedule = generate_season_schedule(&league, &config.schedule, &mut rng);

            let filter = team.map(TeamId::new);
            for fixture in schedule.fixtures() {
                if filter.as_ref().is_some_and(|t| !fixture.involves(t)) {
                    continue;
                }
                let home = league.get(&fixture.home)?;
                let away = league.get(&fixture.away)?;
                let tag = if fixture.is_conference_game { " (conf)" } else { "" };
                println!("Week {:>2}: {} @ {}{}", fixture.week, away.name, home.name, tag);
            }

            let report = ScheduleReport::build(&league, &schedule, &config.schedule);
            println!("\n{} games, {} conference games", report.fixtures, report.conference_games);
            println!("Duplicate pairings: {}", report.duplicate_pairs);
            for (id, games) in &report.shortfalls {
                println!("  short: {} ({games} games)", league.get(id)?.name);
            }
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>, faithful: bool) -> Result<SeasonConfig> {
    let mut config = match path {
        Some(path) => {
            let config = load_from_path(path).with_context(|| format!("loading config {}", path.display()))?;
            info!("Loaded season config from {}", path.display());
            config
        }
        None => load_from_env()?.unwrap_or_default(),
    };
    if faithful {
        config.playoffs.format = PlayoffFormat::FirstRoundOnly;
    }
    Ok(config)
}

fn load_league(path: Option<&Path>) -> Result<League> {
    let Some(path) = path else {
        return Ok(League::default_fbs()?);
    };
    info!("Loading league from {}", path.display());
    let json = std::fs::read_to_string(path).with_context(|| format!("reading league {}", path.display()))?;
    League::from_json(&json).with_context(|| format!("parsing league {}", path.display()))
}

/// Advances from wherever the season is to the next pre-season.
fn play_season(season: &mut Season) -> Result<()> {
    let year = season.year();
    println!("\n===== {year} season =====");

    loop {
        let report = season.advance()?;
        print_postseason_results(season, &report)?;

        if report.to == SeasonStage::CoachingCarousel {
            print_final_tables(season)?;
        }
        if let Some(review) = &report.review {
            println!(
                "\n{}: {}-{} (expected {:.1} wins), prestige change {:+.1}",
                review.team_name, review.wins, review.losses, review.expected_wins, review.prestige_delta
            );
            let coach = season.coach();
            println!("Coach prestige {:.1}, level {}", coach.prestige, coach.level);
        }
        if report.to == SeasonStage::PreSeason {
            break;
        }
    }
    Ok(())
}

fn print_postseason_results(season: &Season, report: &StepReport) -> Result<()> {
    for id in &report.played {
        let fixture = season.schedule().get(*id)?;
        let Some(label) = &fixture.label else { continue };
        let (Some(home_score), Some(away_score)) = (fixture.home_score, fixture.away_score) else {
            continue;
        };
        let home = season.league().get(&fixture.home)?;
        let away = season.league().get(&fixture.away)?;
        println!("{label}: {} {home_score} - {away_score} {}", home.name, away.name);
    }
    Ok(())
}

fn print_final_tables(season: &Season) -> Result<()> {
    let league = season.league();

    println!("\nCFP Top 25");
    for (i, team) in cfp_top25(league, &season.config().rankings).iter().enumerate() {
        println!("{:>2}. {:<28} {}", i + 1, team.name, team.record.display());
    }

    let controlled = season.controlled_team()?;
    println!("\n{} standings", controlled.conference);
    for team in conference_standings(league, controlled.conference) {
        println!("  {:<28} {}", team.name, team.record.display());
    }
    Ok(())
}
