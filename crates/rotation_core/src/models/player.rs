use serde::{Deserialize, Serialize};

/// Basketball position.
///
/// `Unset` is the placeholder for roster slots the caller has not assigned;
/// the report aggregator skips players whose primary position is `Unset`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Position {
    PG,
    SG,
    SF,
    PF,
    C,
    #[default]
    Unset,
}

impl Position {
    pub fn is_set(&self) -> bool {
        !matches!(self, Position::Unset)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Position::PG => "PG",
            Position::SG => "SG",
            Position::SF => "SF",
            Position::PF => "PF",
            Position::C => "C",
            Position::Unset => "-",
        }
    }
}

/// Score and clock context captured at the instant an interval opens.
///
/// Stint and quintet plus-minus is computed lazily when the interval closes,
/// by diffing the then-current scores against this record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct StintStart {
    pub our_score: u16,
    pub rival_score: u16,
    /// Cumulative game clock seconds at the moment the interval opened.
    pub clock_seconds: u32,
}

/// One completed stint. Duration and plus-minus travel together so the two
/// can never fall out of alignment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct StintRecord {
    pub duration_secs: u32,
    pub plus_minus: i32,
}

/// Roster entry supplied by the session collaborator at game start.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerSeed {
    pub name: String,
    pub number: u8,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub secondary_positions: Vec<Position>,
}

/// One tracked player.
///
/// Ids are assigned from roster order when the game is created and are stable
/// for the duration of that game only; they are not a persistent identity
/// across games.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Player {
    pub id: u32,
    pub name: String,
    pub number: u8,
    pub position: Position,
    #[serde(default)]
    pub secondary_positions: Vec<Position>,
    pub on_court: bool,
    pub points: u16,
    pub fouls: u8,
    /// Non-`None` exactly while `on_court` is true.
    pub current_stint: Option<StintStart>,
    pub stints: Vec<StintRecord>,
}

impl Player {
    pub fn new(id: u32, seed: PlayerSeed) -> Self {
        Self {
            id,
            name: seed.name,
            number: seed.number,
            position: seed.position,
            secondary_positions: seed.secondary_positions,
            on_court: false,
            points: 0,
            fouls: 0,
            current_stint: None,
            stints: Vec::new(),
        }
    }

    /// Total seconds across completed stints (the open stint not included).
    pub fn total_seconds(&self) -> u32 {
        self.stints.iter().map(|s| s.duration_secs).sum()
    }

    /// Summed plus-minus across completed stints.
    pub fn total_plus_minus(&self) -> i32 {
        self.stints.iter().map(|s| s.plus_minus).sum()
    }

    /// Live elapsed seconds in the open stint, if any.
    pub fn current_stint_seconds(&self, clock_seconds: u32) -> Option<u32> {
        self.current_stint.map(|start| clock_seconds.saturating_sub(start.clock_seconds))
    }
}
