use crate::network::core::PacketData;
use crate::network::hooks::{HookPoint, Verdict};
use crate::network::stats::StatsCounters;
use log::trace;
use std::sync::Arc;

/// Verdict function shared by all three hook points.
///
/// Runs in the host's packet-processing context: it never inspects the
/// packet, never allocates and never takes a lock. The only side effect is
/// one atomic increment on the counter matching the verdict.
#[derive(Debug, Clone)]
pub struct HookDispatcher {
    stats: Arc<StatsCounters>,
    log_packets: bool,
}

impl HookDispatcher {
    /// Creates a dispatcher that counts into `stats`.
    pub fn new(stats: Arc<StatsCounters>) -> Self {
        Self {
            stats,
            log_packets: false,
        }
    }

    /// Enables a trace line per packet.
    pub fn with_packet_logging(mut self, enabled: bool) -> Self {
        self.log_packets = enabled;
        self
    }

    /// Returns the verdict for a packet arriving at `hook`.
    ///
    /// The counter is updated before returning, so a stats read issued after
    /// this call observes the packet.
    pub fn dispatch(&self, hook: HookPoint, _packet: &PacketData<'_>) -> Verdict {
        let verdict = hook.verdict();
        self.stats.record(verdict);

        if self.log_packets {
            match verdict {
                Verdict::Accept => trace!("*** Packet Accepted *** ({})", hook),
                Verdict::Drop => trace!("*** Packet Dropped *** ({})", hook),
            }
        }

        verdict
    }

    pub fn stats(&self) -> &Arc<StatsCounters> {
        &self.stats
    }
}
