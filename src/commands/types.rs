//! Type definitions for command output.

use crate::network::processing::{TrafficPlan, TrafficReport};
use crate::network::stats::StatsSnapshot;
use serde::{Deserialize, Serialize};

/// Result of a `run` command.
#[derive(Debug, Serialize)]
pub struct RunStatus {
    /// Path of the control attribute
    pub attribute: String,
    /// Packets requested per chain (zero in continuous mode)
    pub plan: TrafficPlan,
    /// Verdicts seen by the sender
    pub sent: TrafficReport,
    /// Counters as read back through the control attribute
    pub stats: StatsSnapshot,
    /// Raw attribute text
    pub display: String,
    /// Attribute text after a reset, if one was requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after_reset: Option<String>,
}

impl RunStatus {
    /// Text printed when JSON output was not requested.
    pub fn to_text(&self) -> String {
        match &self.after_reset {
            Some(after) => format!("{}{}", self.display, after),
            None => self.display.clone(),
        }
    }
}

/// Parsed form of the attribute text `"<accepted>,<dropped>\n"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeReading {
    pub accepted: u32,
    pub dropped: u32,
}

impl AttributeReading {
    pub fn parse(text: &str) -> Option<Self> {
        let (accepted, dropped) = text.trim_end_matches('\n').split_once(',')?;
        Some(Self {
            accepted: accepted.parse().ok()?,
            dropped: dropped.parse().ok()?,
        })
    }
}

impl From<AttributeReading> for StatsSnapshot {
    fn from(reading: AttributeReading) -> Self {
        StatsSnapshot {
            accepted: reading.accepted,
            dropped: reading.dropped,
        }
    }
}
