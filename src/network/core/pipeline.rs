//! Host packet pipeline boundary.
//!
//! The filter registers one callback per chain through [`PacketPipeline`].
//! [`SimulatedPipeline`] is an in-process host with the same contract, used
//! by the CLI and by tests.

use crate::network::core::PacketData;
use crate::network::hooks::{HookPoint, HookRegistration, Verdict};
use log::debug;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, PoisonError, RwLock};

/// Status code returned by the host when it refuses an operation.
///
/// Negative errno-style values, passed through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostStatus(pub i32);

impl HostStatus {
    /// No such entry
    pub const NOT_FOUND: HostStatus = HostStatus(-2);
    /// Out of memory
    pub const NO_MEMORY: HostStatus = HostStatus(-12);
    /// Resource already in use
    pub const BUSY: HostStatus = HostStatus(-16);
}

impl fmt::Display for HostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A packet-processing pipeline that accepts hook registrations.
pub trait PacketPipeline: Send + Sync {
    /// Installs a hook. Fails with a host-defined status.
    fn register_hook(&self, registration: &HookRegistration) -> Result<(), HostStatus>;

    /// Removes a previously installed hook. Silent no-op when `registration`
    /// is not installed.
    fn unregister_hook(&self, registration: &HookRegistration);

    /// Whether `registration` is currently installed.
    fn is_registered(&self, registration: &HookRegistration) -> bool;
}

/// In-process host pipeline with failure injection.
#[derive(Debug, Default)]
pub struct SimulatedPipeline {
    hooks: RwLock<HashMap<HookPoint, HookRegistration>>,
    failures: Mutex<HashMap<HookPoint, HostStatus>>,
}

impl SimulatedPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next registration on `hook` fail with `status`.
    pub fn fail_registration(&self, hook: HookPoint, status: HostStatus) {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(hook, status);
    }

    /// Pushes one packet through `hook`.
    ///
    /// With no hook installed the host lets the packet through and no
    /// counter moves.
    pub fn inject(&self, hook: HookPoint, packet: &PacketData<'_>) -> Verdict {
        let hooks = self.hooks.read().unwrap_or_else(PoisonError::into_inner);
        match hooks.get(&hook) {
            Some(registration) => registration.invoke(packet),
            None => Verdict::Accept,
        }
    }

    /// Hook points with an installed hook, in chain order.
    pub fn active_hooks(&self) -> Vec<HookPoint> {
        let hooks = self.hooks.read().unwrap_or_else(PoisonError::into_inner);
        HookPoint::ALL
            .into_iter()
            .filter(|hook| hooks.contains_key(hook))
            .collect()
    }
}

impl PacketPipeline for SimulatedPipeline {
    fn register_hook(&self, registration: &HookRegistration) -> Result<(), HostStatus> {
        let injected = self
            .failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&registration.hook);
        if let Some(status) = injected {
            return Err(status);
        }

        let mut hooks = self.hooks.write().unwrap_or_else(PoisonError::into_inner);
        if hooks.contains_key(&registration.hook) {
            return Err(HostStatus::BUSY);
        }
        hooks.insert(registration.hook, registration.clone());
        Ok(())
    }

    fn unregister_hook(&self, registration: &HookRegistration) {
        let mut hooks = self.hooks.write().unwrap_or_else(PoisonError::into_inner);
        let installed = hooks
            .get(&registration.hook)
            .is_some_and(|installed| installed.is_same(registration));
        if installed {
            hooks.remove(&registration.hook);
        } else {
            debug!("{} hook not installed, nothing to unregister", registration.hook);
        }
    }

    fn is_registered(&self, registration: &HookRegistration) -> bool {
        self.hooks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&registration.hook)
            .is_some_and(|installed| installed.is_same(registration))
    }
}
