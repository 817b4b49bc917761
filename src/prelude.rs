//! Prelude module for convenient imports.
//!
//! This module re-exports commonly used types and traits from the crate,
//! allowing users to import everything they need with a single use statement:
//!
//! ```rust
//! use secws::prelude::*;
//! ```

// Error handling
pub use crate::error::{FirewallError, Result};

// Lifecycle
pub use crate::lifecycle::Firewall;

// Host pipeline boundary
pub use crate::network::core::{HostStatus, PacketData, PacketPipeline, SimulatedPipeline};

// Hooks
pub use crate::network::hooks::{
    HookDispatcher, HookPoint, HookPriority, HookRegistration, ProtocolFamily,
    RegistrationManager, Verdict,
};

// Statistics
pub use crate::network::stats::{StatsCounters, StatsSnapshot};

// Control surface
pub use crate::control::{
    parse_command, AttributeHost, AttributePath, AttributeRegistry, ControlAttribute,
    ControlCommand, ControlDevice, IgnoreReason, Principal,
};

// Settings
pub use crate::settings::{FirewallSettings, SettingsBuilder};
