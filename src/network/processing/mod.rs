pub mod generator;

pub use generator::{generate_traffic, run_continuous, TrafficPlan, TrafficReport};
