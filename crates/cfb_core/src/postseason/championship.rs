use tracing::debug;

use crate::config::PlayoffConfig;
use crate::models::{Conference, League};
use crate::ranking::conference_standings;
use crate::schedule::Matchup;

/// One title game per conference with at least two members, top seed hosting.
///
/// Title games count toward conference records and are flagged as postseason
/// games; only games from the first playoff round on earn playoff credit.
pub fn generate_conference_championships(league: &League, config: &PlayoffConfig) -> Vec<Matchup> {
    let mut games = Vec::new();

    for conference in Conference::CHAMPIONSHIP_ORDER {
        let standings = conference_standings(league, conference);
        let [first, second, ..] = standings.as_slice() else {
            continue;
        };

        debug!("{conference} Championship: {} vs {}", first.name, second.name);
        games.push(Matchup {
            week: config.championship_week,
            home: first.id.clone(),
            away: second.id.clone(),
            is_conference_game: true,
            is_playoff: true,
            label: Some(format!("{conference} Championship")),
        });
    }

    games
}
