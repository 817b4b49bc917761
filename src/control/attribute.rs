use crate::network::stats::{StatsCounters, StatsSnapshot};
use log::{debug, info};
use std::fmt;
use std::sync::Arc;

/// First byte that triggers a counter reset.
pub const RESET_TRIGGER: u8 = b'0';

/// Owner read/write, everyone else read-only.
pub const DEFAULT_MODE: u16 = 0o644;

/// Why a control write was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Nothing was written
    Empty,
    /// The first byte is not the reset trigger
    UnrecognizedCommand(u8),
}

/// Intent of a control write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    /// Zero both counters
    Reset,
    /// Leave the counters alone
    Ignored(IgnoreReason),
}

/// Interprets a control write. Only the first byte matters.
pub fn parse_command(payload: &[u8]) -> ControlCommand {
    match payload.first() {
        None => ControlCommand::Ignored(IgnoreReason::Empty),
        Some(&RESET_TRIGGER) => ControlCommand::Reset,
        Some(&other) => ControlCommand::Ignored(IgnoreReason::UnrecognizedCommand(other)),
    }
}

/// Who is accessing the attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Principal {
    /// The privilege level that owns the attribute
    Owner,
    /// Any other caller
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read,
    Write,
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Access::Read => f.write_str("read"),
            Access::Write => f.write_str("write"),
        }
    }
}

/// The stats attribute bound to a set of counters.
#[derive(Debug)]
pub struct ControlAttribute {
    name: String,
    mode: u16,
    stats: Arc<StatsCounters>,
}

impl ControlAttribute {
    pub fn new(name: impl Into<String>, stats: Arc<StatsCounters>) -> Self {
        Self {
            name: name.into(),
            mode: DEFAULT_MODE,
            stats,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unix-style permission bits.
    pub fn mode(&self) -> u16 {
        self.mode
    }

    /// Whether `principal` may perform `access` under the attribute mode.
    pub fn allows(&self, principal: Principal, access: Access) -> bool {
        let bits = match principal {
            Principal::Owner => (self.mode >> 6) & 0o7,
            Principal::Other => self.mode & 0o7,
        };
        match access {
            Access::Read => bits & 0o4 != 0,
            Access::Write => bits & 0o2 != 0,
        }
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Renders the counters as `"<accepted>,<dropped>\n"`.
    pub fn display(&self) -> String {
        let snapshot = self.stats.snapshot();
        format!("{},{}\n", snapshot.accepted, snapshot.dropped)
    }

    /// Applies a control write and returns how many bytes were consumed.
    ///
    /// A reset consumes the whole payload; anything else consumes nothing
    /// and is not an error.
    pub fn modify(&self, payload: &[u8]) -> usize {
        match parse_command(payload) {
            ControlCommand::Reset => {
                self.stats.reset();
                let snapshot = self.stats.snapshot();
                info!(
                    "zero_counters, accepted={} dropped={}",
                    snapshot.accepted, snapshot.dropped
                );
                payload.len()
            }
            ControlCommand::Ignored(reason) => {
                debug!("Ignoring write to {}: {:?}", self.name, reason);
                0
            }
        }
    }
}
