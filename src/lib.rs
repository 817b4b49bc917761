//! # secws - A minimal in-path packet filter
//!
//! secws hooks three chains of a host packet pipeline and gives every packet
//! a fixed verdict, while counting accepted and dropped packets behind a
//! resettable control attribute.
//!
//! ## Policy
//!
//! * Input (destined to this host) - accept
//! * Output (sent by this host) - accept
//! * Forward (neither) - drop
//!
//! Packet contents are never inspected and the policy cannot be changed at
//! runtime.
//!
//! ## Control attribute
//!
//! Reading the attribute yields `"<accepted>,<dropped>\n"`. Writing a
//! payload whose first byte is `'0'` zeroes both counters; any other write
//! is ignored.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use secws::prelude::*;
//!
//! let pipeline = Arc::new(SimulatedPipeline::new());
//! let host = Arc::new(AttributeRegistry::new());
//! let firewall = Firewall::init(FirewallSettings::default(), pipeline.clone(), host).unwrap();
//!
//! let packet = PacketData::from(vec![0u8; 20]);
//! assert_eq!(pipeline.inject(HookPoint::Forward, &packet), Verdict::Drop);
//! assert_eq!(firewall.control().display(), "0,1\n");
//! ```

/// Command-line commands
pub mod commands;
/// Control attribute and its host
pub mod control;
/// Centralized error handling
pub mod error;
/// Startup and shutdown of a filter instance
pub mod lifecycle;
/// Hooks, counters and the host pipeline boundary
pub mod network;
/// Prelude for convenient imports
pub mod prelude;
/// Filter settings and stored configurations
pub mod settings;
/// Shared utility functions
pub mod utils;

// Re-export commonly used types
pub use error::{FirewallError, Result};
