//! Core network functionality.
//!
//! This module contains the host pipeline boundary that hooks are
//! registered against, and the packet handle it passes to them.

pub mod packet_data;
pub mod pipeline;

// Re-export commonly used types
pub use packet_data::PacketData;
pub use pipeline::{HostStatus, PacketPipeline, SimulatedPipeline};
