//! End-to-end season flow
//!
//! Drives whole seasons through `Season::advance` and checks the league-wide
//! invariants that only hold once every component has run.

use cfb_core::narrator::{GameNarrator, NarratedGame, NarratorError, ScoreSource};
use cfb_core::ranking::conference_standings;
use cfb_core::{Conference, League, LeagueError, Season, SeasonConfig, SeasonStage, Team, TeamId};

fn single_conference(size: u8) -> League {
    let teams = (0..size)
        .map(|i| Team::new(format!("sec{i}"), format!("SEC School {i}"), Conference::Sec, 40 + i * 3))
        .collect();
    League::new(teams).unwrap()
}

fn advance_until(season: &mut Season, stage: SeasonStage) {
    for _ in 0..60 {
        if season.stage() == stage {
            return;
        }
        season.advance().unwrap();
    }
    panic!("never reached {stage}");
}

#[test]
fn test_sixteen_team_conference_reaches_championship() {
    let mut season = Season::new(single_conference(16), TeamId::from("sec0"), SeasonConfig::default(), 2025).unwrap();
    advance_until(&mut season, SeasonStage::ConferenceChampionship { week: 15 });

    // every regular-season game has been played
    assert!(season.schedule().fixtures().iter().filter(|f| f.week <= 14).all(|f| f.played));

    let title_games: Vec<_> = season.schedule().week(15).collect();
    assert_eq!(title_games.len(), 1);
    let game = title_games[0];
    assert_eq!(game.label.as_deref(), Some("SEC Championship"));
    assert!(!game.played);

    let standings = conference_standings(season.league(), Conference::Sec);
    assert_eq!(game.home, standings[0].id);
    assert_eq!(game.away, standings[1].id);
}

#[test]
fn test_records_match_played_fixtures() {
    let league = League::default_fbs().unwrap();
    let mut season = Season::new(league, TeamId::from("12"), SeasonConfig::default(), 77).unwrap();
    advance_until(&mut season, SeasonStage::CoachingCarousel);

    let played = season.schedule().fixtures().iter().filter(|f| f.played).count();
    assert_eq!(played, season.schedule().len());

    let wins: usize = season.league().teams().iter().map(|t| t.record.wins as usize).sum();
    let losses: usize = season.league().teams().iter().map(|t| t.record.losses as usize).sum();
    assert_eq!(wins, played);
    assert_eq!(losses, played);
    assert!(season.schedule().double_booked().is_empty());

    for team in season.league().teams() {
        let scored: u32 = season
            .schedule()
            .team_fixtures(&team.id)
            .map(|f| {
                let score = if f.home == team.id { f.home_score } else { f.away_score };
                u32::from(score.unwrap_or(0))
            })
            .sum();
        assert_eq!(scored, team.record.points_for, "{}", team.name);
    }
}

#[test]
fn test_two_full_seasons() {
    let league = League::default_fbs().unwrap();
    let mut season = Season::new(league, TeamId::from("1"), SeasonConfig::default(), 3).unwrap();

    for year in [2025u16, 2026] {
        assert_eq!(season.year(), year);
        season.advance().unwrap();
        advance_until(&mut season, SeasonStage::PreSeason);
        assert_eq!(season.last_review().map(|r| r.season), Some(year));
    }

    assert_eq!(season.year(), 2027);
    assert_eq!(season.coach().history.len(), 2);
    assert!((5.0..=99.0).contains(&season.coach().prestige));
}

#[test]
fn test_advance_never_skips_a_stage() {
    let mut season = Season::new(single_conference(12), TeamId::from("sec3"), SeasonConfig::default(), 9).unwrap();
    let mut seen = Vec::new();
    loop {
        let report = season.advance().unwrap();
        seen.push(report.to);
        if report.to == SeasonStage::PreSeason {
            break;
        }
    }

    let expected_tail = [
        SeasonStage::CoachingCarousel,
        SeasonStage::Retention,
        SeasonStage::TransferPortal { sub_week: 1 },
        SeasonStage::TransferPortal { sub_week: 2 },
        SeasonStage::PreSeason,
    ];
    assert_eq!(&seen[seen.len() - expected_tail.len()..], &expected_tail);
    assert_eq!(seen[0], SeasonStage::RegularSeason { week: 1 });
    assert!(seen.contains(&SeasonStage::PostSeason { week: 19 }));
}

struct Blowout;

impl GameNarrator for Blowout {
    fn narrate(&self, _home: &Team, _away: &Team) -> Result<NarratedGame, NarratorError> {
        Ok(NarratedGame { home_score: 56, away_score: 0, summary: "Never close.".to_string(), highlights: Vec::new() })
    }
}

#[test]
fn test_narrated_game_lands_in_schedule() {
    let league = League::default_fbs().unwrap();
    let mut season = Season::new(league, TeamId::from("1"), SeasonConfig::default(), 21).unwrap();
    season.advance().unwrap();
    while season.controlled_fixture().is_none() {
        season.advance().unwrap();
    }

    let fixture_id = season.controlled_fixture().unwrap().id;
    let resolved = season.narrate_controlled_game(&Blowout).unwrap().unwrap();
    assert_eq!(resolved.source, ScoreSource::Narrator);

    season.advance().unwrap();
    let fixture = season.schedule().get(fixture_id).unwrap();
    assert_eq!((fixture.home_score, fixture.away_score), (Some(56), Some(0)));
}

#[test]
fn test_unknown_fixture_is_contract_violation() {
    let season =
        Season::new(League::default_fbs().unwrap(), TeamId::from("1"), SeasonConfig::default(), 1).unwrap();
    let err = season.schedule().get(cfb_core::FixtureId(99_999)).unwrap_err();
    assert!(matches!(err, LeagueError::UnknownFixtureReference(_)));
    assert!(err.is_contract_violation());
}
