//! Registration of the three hook points as one all-or-nothing set.

use crate::error::{FirewallError, Result};
use crate::network::core::pipeline::PacketPipeline;
use crate::network::core::PacketData;
use crate::network::hooks::{HookDispatcher, HookPoint, HookPriority, ProtocolFamily, Verdict};
use log::{debug, info, warn};
use std::sync::Arc;

/// One hook point as handed to the host pipeline.
#[derive(Debug, Clone)]
pub struct HookRegistration {
    /// Chain this hook is installed on
    pub hook: HookPoint,
    /// Verdict every packet on the chain receives
    pub verdict: Verdict,
    /// Position among other hooks on the same chain
    pub priority: HookPriority,
    /// Protocol family the hook applies to
    pub family: ProtocolFamily,
    dispatcher: Arc<HookDispatcher>,
}

impl HookRegistration {
    pub fn new(hook: HookPoint, priority: HookPriority, dispatcher: Arc<HookDispatcher>) -> Self {
        Self {
            hook,
            verdict: hook.verdict(),
            priority,
            family: ProtocolFamily::Ipv4,
            dispatcher,
        }
    }

    /// Whether `other` is this very registration rather than another
    /// instance's hook on the same chain.
    pub fn is_same(&self, other: &HookRegistration) -> bool {
        self.hook == other.hook && Arc::ptr_eq(&self.dispatcher, &other.dispatcher)
    }

    /// Called by the host once per packet traversing `self.hook`.
    pub fn invoke(&self, packet: &PacketData<'_>) -> Verdict {
        self.dispatcher.dispatch(self.hook, packet)
    }
}

/// Owns the hook registrations and installs/removes them as a set.
///
/// Not meant to be driven from several threads at once: registration and
/// unregistration only happen at startup and shutdown.
pub struct RegistrationManager<P: PacketPipeline> {
    pipeline: Arc<P>,
    dispatcher: Arc<HookDispatcher>,
    registrations: Vec<HookRegistration>,
}

impl<P: PacketPipeline> RegistrationManager<P> {
    /// Builds one registration per hook point, in registration order.
    ///
    /// Every hook runs first on its chain; the priority is not configurable.
    pub fn new(pipeline: Arc<P>, dispatcher: Arc<HookDispatcher>) -> Self {
        let registrations = HookPoint::ALL
            .iter()
            .map(|hook| HookRegistration::new(*hook, HookPriority::FIRST, Arc::clone(&dispatcher)))
            .collect();

        Self {
            pipeline,
            dispatcher,
            registrations,
        }
    }

    pub fn registrations(&self) -> &[HookRegistration] {
        &self.registrations
    }

    /// Zeroes the counters, then installs Input, Output and Forward in order.
    ///
    /// On the first failure every hook point is removed again before the
    /// error is returned, so the call ends either fully registered or fully
    /// unregistered.
    pub fn register_all(&self) -> Result<()> {
        self.dispatcher.stats().reset();

        for registration in &self.registrations {
            if let Err(status) = self.pipeline.register_hook(registration) {
                warn!(
                    "Registering {} hook failed with status {}, rolling back",
                    registration.hook, status
                );
                self.unregister_all();
                return Err(FirewallError::Registration {
                    hook: registration.hook,
                    status,
                });
            }
            debug!(
                "Registered {} hook ({} all packets, priority {})",
                registration.hook, registration.verdict, registration.priority.0
            );
        }

        info!("All {} hooks registered", self.registrations.len());
        Ok(())
    }

    /// Removes every hook point. Hook points that are not registered are
    /// skipped by the host, so this is safe after a partial failure.
    pub fn unregister_all(&self) {
        for registration in &self.registrations {
            self.pipeline.unregister_hook(registration);
        }
        debug!("Unregistered all hooks");
    }

    /// Hook points currently installed in the host, in chain order.
    pub fn active_hooks(&self) -> Vec<HookPoint> {
        self.registrations
            .iter()
            .filter(|registration| self.pipeline.is_registered(registration))
            .map(|registration| registration.hook)
            .collect()
    }

    pub fn is_fully_registered(&self) -> bool {
        self.active_hooks().len() == HookPoint::ALL.len()
    }
}
