//! Network module for packet interception and statistics.
//!
//! This module contains the hook points and their fixed verdicts, the
//! counters they update, the host pipeline boundary, and a synthetic
//! traffic generator for driving the pipeline.

pub mod core;
pub mod hooks;
pub mod processing;
pub mod stats;
