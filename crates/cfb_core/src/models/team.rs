use serde::{Deserialize, Serialize};
use std::fmt;

use super::player::Player;

/// Stable team identifier as it appears in league data ("1", "133", ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(pub String);

impl TeamId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TeamId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Conference {
    #[serde(rename = "SEC")]
    Sec,
    #[serde(rename = "Big Ten")]
    BigTen,
    #[serde(rename = "ACC")]
    Acc,
    #[serde(rename = "Big 12")]
    Big12,
    #[serde(rename = "Pac-12")]
    Pac12,
    #[serde(rename = "AAC")]
    Aac,
    #[serde(rename = "Mountain West")]
    MountainWest,
    #[serde(rename = "Sun Belt")]
    SunBelt,
    #[serde(rename = "MAC")]
    Mac,
    #[serde(rename = "CUSA")]
    Cusa,
    #[serde(rename = "Independent")]
    Independent,
}

impl Conference {
    /// Conferences that crown a champion, in championship-generation order.
    pub const CHAMPIONSHIP_ORDER: [Conference; 10] = [
        Conference::Sec,
        Conference::BigTen,
        Conference::Acc,
        Conference::Big12,
        Conference::Pac12,
        Conference::Aac,
        Conference::MountainWest,
        Conference::SunBelt,
        Conference::Mac,
        Conference::Cusa,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Conference::Sec => "SEC",
            Conference::BigTen => "Big Ten",
            Conference::Acc => "ACC",
            Conference::Big12 => "Big 12",
            Conference::Pac12 => "Pac-12",
            Conference::Aac => "AAC",
            Conference::MountainWest => "Mountain West",
            Conference::SunBelt => "Sun Belt",
            Conference::Mac => "MAC",
            Conference::Cusa => "CUSA",
            Conference::Independent => "Independent",
        }
    }

    pub fn is_independent(&self) -> bool {
        matches!(self, Conference::Independent)
    }
}

impl fmt::Display for Conference {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Season record. Reset at every season rollover.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRecord {
    pub wins: u16,
    pub losses: u16,
    pub conf_wins: u16,
    pub conf_losses: u16,
    pub points_for: u32,
    pub points_against: u32,
    /// 0 = unranked
    pub rank: u8,
}

impl TeamRecord {
    pub fn point_differential(&self) -> i64 {
        self.points_for as i64 - self.points_against as i64
    }

    /// Adds one finished game. `scored > allowed` counts as a win.
    pub fn record_game(&mut self, scored: u16, allowed: u16, conference: bool) {
        self.points_for += u32::from(scored);
        self.points_against += u32::from(allowed);
        if scored > allowed {
            self.wins += 1;
            if conference {
                self.conf_wins += 1;
            }
        } else {
            self.losses += 1;
            if conference {
                self.conf_losses += 1;
            }
        }
    }

    pub fn games_played(&self) -> u16 {
        self.wins + self.losses
    }

    pub fn display(&self) -> String {
        if self.conf_wins + self.conf_losses > 0 {
            format!("{}-{} ({}-{})", self.wins, self.losses, self.conf_wins, self.conf_losses)
        } else {
            format!("{}-{}", self.wins, self.losses)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub abbreviation: String,
    pub conference: Conference,
    /// 0-100, the only strength signal the engine uses
    pub prestige: u8,
    #[serde(default)]
    pub record: TeamRecord,
    #[serde(default)]
    pub roster: Vec<Player>,
}

impl Team {
    pub fn new(id: impl Into<String>, name: impl Into<String>, conference: Conference, prestige: u8) -> Self {
        let name = name.into();
        let abbreviation = name.chars().filter(|c| c.is_ascii_alphabetic()).take(4).collect::<String>().to_uppercase();
        Self {
            id: TeamId::new(id),
            name,
            nickname: String::new(),
            abbreviation,
            conference,
            prestige: prestige.min(100),
            record: TeamRecord::default(),
            roster: Vec::new(),
        }
    }

    pub fn stars(&self) -> u8 {
        stars(self.prestige)
    }

    pub fn reset_record(&mut self) {
        self.record = TeamRecord::default();
    }
}

/// Program star rating (1-6) shown next to prestige.
pub fn stars(prestige: u8) -> u8 {
    match prestige {
        90..=u8::MAX => 6,
        80..=89 => 5,
        65..=79 => 4,
        50..=64 => 3,
        35..=49 => 2,
        _ => 1,
    }
}
