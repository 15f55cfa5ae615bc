use serde::{Deserialize, Serialize};

/// Engine tunables.
///
/// The config rides inside every [`crate::save::Snapshot`] so a rehydrated
/// engine enforces exactly the limits the original one did.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct EngineConfig {
    /// Regulation quarter length in seconds.
    pub quarter_length_secs: u32,

    /// Advancing past this quarter is rejected.
    pub max_quarters: u8,

    /// Foul count at which the engine raises the foul-out advisory.
    /// The engine never substitutes on its own; the caller decides.
    pub foul_limit: u8,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { quarter_length_secs: 600, max_quarters: 4, foul_limit: 5 }
    }
}
