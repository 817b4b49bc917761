//! Control surface for the packet counters.
//!
//! A single attribute, readable by anyone and writable by its owner, that
//! shows `"<accepted>,<dropped>\n"` and resets both counters when written a
//! payload starting with `'0'`.

pub mod attribute;
pub mod device;

pub use attribute::{parse_command, Access, ControlAttribute, ControlCommand, IgnoreReason, Principal};
pub use device::{AttributeHost, AttributePath, AttributeRegistry, ControlDevice, SetupStep};
