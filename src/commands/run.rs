//! The `run` command.
//!
//! Starts a filter on an in-process host, sends traffic, reads the counters
//! back through the control attribute as an unprivileged reader would, and
//! tears the filter down again.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use log::{info, warn};

use crate::commands::types::{AttributeReading, RunStatus};
use crate::commands::RunArgs;
use crate::control::{AttributeRegistry, Principal};
use crate::error::Result;
use crate::lifecycle::Firewall;
use crate::network::core::SimulatedPipeline;
use crate::network::processing::{generate_traffic, run_continuous, TrafficPlan};
use crate::settings::store::ConfigStore;
use crate::settings::FirewallSettings;

/// Picks the stored configuration when one is named, the flags otherwise.
pub fn resolve_settings(args: &RunArgs) -> Result<FirewallSettings> {
    match &args.config {
        Some(name) => ConfigStore::open_default()?.load(name),
        None => Ok(args.settings.clone()),
    }
}

/// Per-chain packet counts to send. Continuous runs send random traffic
/// instead, so their plan is empty.
fn traffic_plan(args: &RunArgs) -> TrafficPlan {
    if args.continuous {
        return TrafficPlan::default();
    }

    TrafficPlan {
        input: args.input,
        output: args.output,
        forward: args.forward,
    }
}

/// Runs the filter with `settings` according to `args`.
pub fn run(args: &RunArgs, settings: FirewallSettings) -> Result<RunStatus> {
    let pipeline = Arc::new(SimulatedPipeline::new());
    let host = Arc::new(AttributeRegistry::new());
    let interval = Duration::from_millis(settings.stats_interval_ms);

    let mut firewall = Firewall::init(settings, Arc::clone(&pipeline), Arc::clone(&host))?;
    let path = firewall.attribute_path().to_string();

    let plan = traffic_plan(args);

    let sent = if args.continuous {
        let running = Arc::new(AtomicBool::new(true));
        let handler_flag = Arc::clone(&running);
        ctrlc::set_handler(move || {
            info!("Interrupted, stopping traffic");
            handler_flag.store(false, Ordering::SeqCst);
        })?;
        run_continuous(
            Arc::clone(&pipeline),
            Arc::clone(firewall.stats()),
            running,
            args.threads,
            interval,
        )
    } else {
        generate_traffic(&pipeline, &plan, args.threads)
    };

    let display = host.read(&path, Principal::Other)?;
    let stats = match AttributeReading::parse(&display) {
        Some(reading) => reading.into(),
        None => {
            warn!("Unexpected attribute text {:?}, using direct snapshot", display);
            firewall.stats().snapshot()
        }
    };

    let after_reset = if args.reset {
        host.write(&path, Principal::Owner, b"0")?;
        Some(host.read(&path, Principal::Other)?)
    } else {
        None
    };

    firewall.teardown();

    Ok(RunStatus {
        attribute: path,
        plan,
        sent,
        stats,
        display,
        after_reset,
    })
}
