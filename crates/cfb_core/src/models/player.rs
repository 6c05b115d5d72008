use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    QB,
    RB,
    WR,
    OL,
    DL,
    LB,
    DB,
    K,
}

impl Position {
    pub const ALL: [Position; 8] = [
        Position::QB,
        Position::RB,
        Position::WR,
        Position::OL,
        Position::DL,
        Position::LB,
        Position::DB,
        Position::K,
    ];

    /// Scholarship depth per position on a balanced roster (50 total).
    pub fn roster_depth(&self) -> usize {
        match self {
            Position::QB => 3,
            Position::RB => 5,
            Position::WR => 8,
            Position::OL => 10,
            Position::DL => 8,
            Position::LB => 6,
            Position::DB => 8,
            Position::K => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ClassYear {
    FR,
    SO,
    JR,
    SR,
}

impl ClassYear {
    pub const ALL: [ClassYear; 4] = [ClassYear::FR, ClassYear::SO, ClassYear::JR, ClassYear::SR];

    /// Next academic year; seniors stay seniors (they leave before this matters).
    pub fn next(&self) -> ClassYear {
        match self {
            ClassYear::FR => ClassYear::SO,
            ClassYear::SO => ClassYear::JR,
            ClassYear::JR | ClassYear::SR => ClassYear::SR,
        }
    }
}

/// Why a player is leaving the program at the end of the season.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DepartureStatus {
    Graduating,
    Nfl,
    Transfer,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub name: String,
    pub position: Position,
    pub year: ClassYear,
    /// 0-99
    pub rating: u8,
    #[serde(default)]
    pub potential: u8,
    #[serde(default)]
    pub hometown: String,
    #[serde(default)]
    pub leaving_status: Option<DepartureStatus>,
}

impl Player {
    pub fn is_leaving(&self) -> bool {
        self.leaving_status.is_some()
    }
}
