//! Hook points, their fixed verdicts, and the registration set.
//!
//! Every packet reaching a given chain gets the same verdict. The mapping
//! lives in [`VERDICT_TABLE`] so the policy is data rather than one callback
//! per chain.

pub mod dispatcher;
pub mod registry;

pub use dispatcher::HookDispatcher;
pub use registry::{HookRegistration, RegistrationManager};

use serde::{Deserialize, Serialize};
use std::fmt;

/// A location in the host packet pipeline where a hook can be installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HookPoint {
    /// Packets destined to this host
    Input,
    /// Packets originated by this host
    Output,
    /// Packets neither destined to nor originated by this host
    Forward,
}

impl HookPoint {
    /// All hook points, in registration order.
    pub const ALL: [HookPoint; 3] = [HookPoint::Input, HookPoint::Output, HookPoint::Forward];

    /// Position of this hook point in [`HookPoint::ALL`] and [`VERDICT_TABLE`].
    pub const fn index(self) -> usize {
        match self {
            HookPoint::Input => 0,
            HookPoint::Output => 1,
            HookPoint::Forward => 2,
        }
    }

    /// Returns the verdict every packet on this chain receives.
    pub fn verdict(self) -> Verdict {
        VERDICT_TABLE[self.index()].1
    }

    pub fn name(self) -> &'static str {
        match self {
            HookPoint::Input => "input",
            HookPoint::Output => "output",
            HookPoint::Forward => "forward",
        }
    }
}

impl fmt::Display for HookPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The decision a hook returns to the host for one packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    /// Let the packet continue through the stack
    Accept,
    /// Discard the packet
    Drop,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Accept => f.write_str("accept"),
            Verdict::Drop => f.write_str("drop"),
        }
    }
}

/// Chain to verdict policy. Fixed for the lifetime of the process.
pub const VERDICT_TABLE: [(HookPoint, Verdict); 3] = [
    (HookPoint::Input, Verdict::Accept),
    (HookPoint::Output, Verdict::Accept),
    (HookPoint::Forward, Verdict::Drop),
];

/// Protocol family a hook applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ProtocolFamily {
    #[default]
    Ipv4,
}

/// Position of a hook among others on the same chain (lower runs earlier).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HookPriority(pub i32);

impl HookPriority {
    /// Runs before every other hook on the chain.
    pub const FIRST: HookPriority = HookPriority(i32::MIN);
}

impl Default for HookPriority {
    fn default() -> Self {
        Self::FIRST
    }
}
