//! Cross-cycle signal consistency state.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-symbol carry-forward record of qualifying scan cycles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConsistencyRecord {
    /// Score from the most recent qualifying cycle
    pub score: f64,
    /// Timestamp of that cycle (unix ms)
    pub timestamp: i64,
    /// Count of consecutive trending cycles; paused, never silently reset
    pub consecutive_scans: u32,
}

/// Map of symbol to its carry-forward record.
pub type ConsistencyMap = HashMap<String, ConsistencyRecord>;

/// Streak classification attached to a cycle's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsistencyStatus {
    /// First qualifying cycle for the symbol
    New,
    /// Score rose past the hysteresis band
    Strengthening,
    /// Score fell past the hysteresis band
    Weakening,
    /// Score within the hysteresis band
    Stable,
}

impl std::fmt::Display for ConsistencyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConsistencyStatus::New => write!(f, "NEW"),
            ConsistencyStatus::Strengthening => write!(f, "STRENGTHENING"),
            ConsistencyStatus::Weakening => write!(f, "WEAKENING"),
            ConsistencyStatus::Stable => write!(f, "STABLE"),
        }
    }
}
