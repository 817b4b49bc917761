//! Accept/drop statistics shared between the hook dispatcher and the
//! control surface.

pub mod counters;

pub use counters::{StatsCounters, StatsSnapshot};
