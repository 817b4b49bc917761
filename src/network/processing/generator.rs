//! Synthetic traffic for the simulated pipeline.

use crate::network::core::{PacketData, SimulatedPipeline};
use crate::network::hooks::{HookPoint, Verdict};
use crate::network::stats::StatsCounters;
use crate::utils::log_statistics;
use log::{debug, error, info};
use rand::{rng, Rng};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::panic;
use std::thread::{self, ScopedJoinHandle};
use std::time::{Duration, Instant};

/// Smallest and largest synthetic IPv4 packet.
const MIN_PACKET_SIZE: usize = 20;
const MAX_PACKET_SIZE: usize = 1500;

/// Number of packets to send through each chain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TrafficPlan {
    pub input: usize,
    pub output: usize,
    pub forward: usize,
}

impl TrafficPlan {
    pub fn count(&self, hook: HookPoint) -> usize {
        match hook {
            HookPoint::Input => self.input,
            HookPoint::Output => self.output,
            HookPoint::Forward => self.forward,
        }
    }

    pub fn total(&self) -> usize {
        self.input + self.output + self.forward
    }
}

/// Verdicts as observed by the sender.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TrafficReport {
    pub accepted: usize,
    pub dropped: usize,
}

impl TrafficReport {
    fn add(&mut self, verdict: Verdict) {
        match verdict {
            Verdict::Accept => self.accepted += 1,
            Verdict::Drop => self.dropped += 1,
        }
    }

    fn merge(&mut self, other: TrafficReport) {
        self.accepted += other.accepted;
        self.dropped += other.dropped;
    }
}

/// Joins every worker and sums their reports. A panicking worker is
/// re-raised once the others have finished, never counted as zero.
fn join_workers(workers: Vec<ScopedJoinHandle<'_, TrafficReport>>) -> TrafficReport {
    let mut report = TrafficReport::default();
    let mut failure = None;

    for worker in workers {
        match worker.join() {
            Ok(local) => report.merge(local),
            Err(payload) => {
                error!("Traffic worker panicked, report is incomplete");
                failure.get_or_insert(payload);
            }
        }
    }

    if let Some(payload) = failure {
        panic::resume_unwind(payload);
    }
    report
}

fn random_packet() -> PacketData<'static> {
    let mut rng = rng();
    let size = rng.random_range(MIN_PACKET_SIZE..=MAX_PACKET_SIZE);
    let mut data = vec![0u8; size];
    rng.fill(&mut data[..]);
    PacketData::from(data)
}

/// Sends the packets in `plan` through `pipeline` from `threads` workers.
///
/// Each chain's packets are split as evenly as possible across the workers,
/// so every chain sees concurrent traffic.
pub fn generate_traffic(pipeline: &SimulatedPipeline, plan: &TrafficPlan, threads: usize) -> TrafficReport {
    let threads = threads.max(1);

    let report = thread::scope(|scope| {
        let workers: Vec<_> = (0..threads)
            .map(|worker| {
                scope.spawn(move || {
                    let mut local = TrafficReport::default();
                    for hook in HookPoint::ALL {
                        let count = plan.count(hook);
                        let share = count / threads + usize::from(worker < count % threads);
                        for _ in 0..share {
                            local.add(pipeline.inject(hook, &random_packet()));
                        }
                    }
                    local
                })
            })
            .collect();

        join_workers(workers)
    });

    debug!("Sent {} packets: {:?}", plan.total(), report);
    report
}

/// Sends random traffic across all chains until `running` is cleared,
/// logging the counters every `interval`.
pub fn run_continuous(
    pipeline: Arc<SimulatedPipeline>,
    stats: Arc<StatsCounters>,
    running: Arc<AtomicBool>,
    threads: usize,
    interval: Duration,
) -> TrafficReport {
    info!("Generating traffic on {} threads, press Ctrl-C to stop", threads.max(1));

    thread::scope(|scope| {
        let workers: Vec<_> = (0..threads.max(1))
            .map(|_| {
                let pipeline = &pipeline;
                let running = &running;
                scope.spawn(move || {
                    let mut local = TrafficReport::default();
                    let mut rng = rng();
                    while running.load(Ordering::SeqCst) {
                        let hook = HookPoint::ALL[rng.random_range(0..HookPoint::ALL.len())];
                        local.add(pipeline.inject(hook, &random_packet()));
                        thread::sleep(Duration::from_micros(rng.random_range(50..500)));
                    }
                    local
                })
            })
            .collect();

        let mut last_log_time = Instant::now();
        while running.load(Ordering::SeqCst) {
            thread::sleep(Duration::from_millis(50));
            if last_log_time.elapsed() >= interval {
                let snapshot = stats.snapshot();
                log_statistics(snapshot.accepted as usize, snapshot.dropped as usize);
                last_log_time = Instant::now();
            }
        }

        join_workers(workers)
    })
}
