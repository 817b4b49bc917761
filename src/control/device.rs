//! Publishing the stats attribute through the host's device interface.
//!
//! Setup creates a device node `<class>_<device>` and then the attribute
//! file under it. Either step can fail; teardown undoes whatever was done.

use crate::control::attribute::{Access, ControlAttribute, Principal};
use crate::error::{FirewallError, Result};
use crate::network::core::pipeline::HostStatus;
use log::{debug, info, warn};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

/// Location of the control attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttributePath {
    pub class_name: String,
    pub device_name: String,
    pub attribute_name: String,
}

impl AttributePath {
    pub fn new(
        class_name: impl Into<String>,
        device_name: impl Into<String>,
        attribute_name: impl Into<String>,
    ) -> Self {
        Self {
            class_name: class_name.into(),
            device_name: device_name.into(),
            attribute_name: attribute_name.into(),
        }
    }

    /// Name of the device node, `<class>_<device>`.
    pub fn device_node(&self) -> String {
        format!("{}_{}", self.class_name, self.device_name)
    }
}

impl fmt::Display for AttributePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "/sys/class/{}/{}/{}",
            self.class_name,
            self.device_node(),
            self.attribute_name
        )
    }
}

/// Host side of the control surface: device nodes and attribute files.
pub trait AttributeHost: Send + Sync {
    fn create_device(&self, path: &AttributePath) -> std::result::Result<(), HostStatus>;

    /// Removes the device node. No-op when absent.
    fn destroy_device(&self, path: &AttributePath);

    fn publish(
        &self,
        path: &AttributePath,
        attribute: Arc<ControlAttribute>,
    ) -> std::result::Result<(), HostStatus>;

    /// Removes the attribute file. No-op when absent.
    fn withdraw(&self, path: &AttributePath);
}

/// The control surface as one activatable unit.
pub struct ControlDevice<A: AttributeHost> {
    host: Arc<A>,
    path: AttributePath,
    attribute: Arc<ControlAttribute>,
    has_device: bool,
    has_attribute: bool,
}

impl<A: AttributeHost> ControlDevice<A> {
    pub fn new(host: Arc<A>, path: AttributePath, attribute: Arc<ControlAttribute>) -> Self {
        Self {
            host,
            path,
            attribute,
            has_device: false,
            has_attribute: false,
        }
    }

    pub fn path(&self) -> &AttributePath {
        &self.path
    }

    pub fn attribute(&self) -> &Arc<ControlAttribute> {
        &self.attribute
    }

    pub fn is_active(&self) -> bool {
        self.has_attribute
    }

    /// Creates the device node and publishes the attribute.
    ///
    /// On failure anything already created is removed again.
    pub fn activate(&mut self) -> Result<()> {
        if self.has_attribute {
            return Ok(());
        }

        if !self.has_device {
            self.host
                .create_device(&self.path)
                .map_err(|status| self.setup_failed(status))?;
            self.has_device = true;
            debug!("Created device {}", self.path.device_node());
        }

        if let Err(status) = self.host.publish(&self.path, Arc::clone(&self.attribute)) {
            let err = self.setup_failed(status);
            self.deactivate();
            return Err(err);
        }
        self.has_attribute = true;

        info!("Control attribute available at {}", self.path);
        Ok(())
    }

    /// Withdraws the attribute and destroys the device node, skipping
    /// whichever of the two does not exist.
    pub fn deactivate(&mut self) {
        if self.has_attribute {
            self.host.withdraw(&self.path);
            self.has_attribute = false;
        }
        if self.has_device {
            self.host.destroy_device(&self.path);
            self.has_device = false;
            debug!("Destroyed device {}", self.path.device_node());
        }
    }

    fn setup_failed(&self, status: HostStatus) -> FirewallError {
        warn!("Control device setup failed for {}: status {}", self.path, status);
        FirewallError::DeviceSetup {
            path: self.path.to_string(),
            status,
        }
    }
}

/// Step of the device setup, for failure injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SetupStep {
    Device,
    Attribute,
}

/// In-process attribute host that also serves reads and writes with
/// permission checks.
#[derive(Debug, Default)]
pub struct AttributeRegistry {
    devices: RwLock<HashSet<String>>,
    attributes: RwLock<HashMap<String, Arc<ControlAttribute>>>,
    failures: Mutex<HashMap<SetupStep, HostStatus>>,
}

impl AttributeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next attempt at `step` fail with `status`.
    pub fn fail_step(&self, step: SetupStep, status: HostStatus) {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(step, status);
    }

    fn take_failure(&self, step: SetupStep) -> Option<HostStatus> {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&step)
    }

    fn lookup(&self, path: &str) -> Result<Arc<ControlAttribute>> {
        self.attributes
            .read()
            .map_err(|_| FirewallError::lock_poisoned("attribute table"))?
            .get(path)
            .cloned()
            .ok_or_else(|| FirewallError::AttributeNotFound(path.to_string()))
    }

    fn check(&self, path: &str, attr: &ControlAttribute, principal: Principal, access: Access) -> Result<()> {
        if attr.allows(principal, access) {
            Ok(())
        } else {
            Err(FirewallError::PermissionDenied {
                path: path.to_string(),
                access,
            })
        }
    }

    /// Reads the attribute published at `path`.
    pub fn read(&self, path: &str, principal: Principal) -> Result<String> {
        let attr = self.lookup(path)?;
        self.check(path, &attr, principal, Access::Read)?;
        Ok(attr.display())
    }

    /// Writes `payload` to the attribute published at `path`.
    pub fn write(&self, path: &str, principal: Principal, payload: &[u8]) -> Result<usize> {
        let attr = self.lookup(path)?;
        self.check(path, &attr, principal, Access::Write)?;
        Ok(attr.modify(payload))
    }

    /// Paths of all published attributes, sorted.
    pub fn published(&self) -> Vec<String> {
        let mut paths: Vec<String> = self
            .attributes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        paths.sort();
        paths
    }

    pub fn has_device(&self, node: &str) -> bool {
        self.devices
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(node)
    }
}

impl AttributeHost for AttributeRegistry {
    fn create_device(&self, path: &AttributePath) -> std::result::Result<(), HostStatus> {
        if let Some(status) = self.take_failure(SetupStep::Device) {
            return Err(status);
        }
        let mut devices = self.devices.write().unwrap_or_else(PoisonError::into_inner);
        if !devices.insert(path.device_node()) {
            return Err(HostStatus::BUSY);
        }
        Ok(())
    }

    fn destroy_device(&self, path: &AttributePath) {
        self.devices
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&path.device_node());
    }

    fn publish(
        &self,
        path: &AttributePath,
        attribute: Arc<ControlAttribute>,
    ) -> std::result::Result<(), HostStatus> {
        if let Some(status) = self.take_failure(SetupStep::Attribute) {
            return Err(status);
        }
        if !self.has_device(&path.device_node()) {
            return Err(HostStatus::NOT_FOUND);
        }
        let mut attributes = self.attributes.write().unwrap_or_else(PoisonError::into_inner);
        let key = path.to_string();
        if attributes.contains_key(&key) {
            return Err(HostStatus::BUSY);
        }
        attributes.insert(key, attribute);
        Ok(())
    }

    fn withdraw(&self, path: &AttributePath) {
        self.attributes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&path.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::hooks::Verdict;
    use crate::network::stats::StatsCounters;

    fn path() -> AttributePath {
        AttributePath::new("secws_class", "secws_char_device", "stats_accepted_dropped")
    }

    fn device(stats: &Arc<StatsCounters>) -> (Arc<AttributeRegistry>, ControlDevice<AttributeRegistry>) {
        let host = Arc::new(AttributeRegistry::new());
        let attribute = Arc::new(ControlAttribute::new("stats_accepted_dropped", Arc::clone(stats)));
        let device = ControlDevice::new(Arc::clone(&host), path(), attribute);
        (host, device)
    }

    #[test]
    fn test_path_layout() {
        let path = path();
        assert_eq!(path.device_node(), "secws_class_secws_char_device");
        assert_eq!(
            path.to_string(),
            "/sys/class/secws_class/secws_class_secws_char_device/stats_accepted_dropped"
        );
    }

    #[test]
    fn test_activate_publishes_attribute() {
        let stats = Arc::new(StatsCounters::new());
        let (host, mut device) = device(&stats);

        device.activate().unwrap();
        assert!(device.is_active());
        assert_eq!(host.published(), vec![path().to_string()]);

        stats.record(Verdict::Accept);
        assert_eq!(host.read(&path().to_string(), Principal::Other).unwrap(), "1,0\n");
    }

    #[test]
    fn test_attribute_failure_removes_device() {
        let stats = Arc::new(StatsCounters::new());
        let (host, mut device) = device(&stats);
        host.fail_step(SetupStep::Attribute, HostStatus::NO_MEMORY);

        let err = device.activate().unwrap_err();
        assert!(matches!(err, FirewallError::DeviceSetup { status: HostStatus::NO_MEMORY, .. }));
        assert!(!device.is_active());
        assert!(!host.has_device(&path().device_node()));
        assert!(host.published().is_empty());
    }

    #[test]
    fn test_deactivate_is_idempotent() {
        let stats = Arc::new(StatsCounters::new());
        let (host, mut device) = device(&stats);

        device.deactivate();
        device.activate().unwrap();
        device.deactivate();
        device.deactivate();
        assert!(host.published().is_empty());
        assert!(!host.has_device(&path().device_node()));
    }

    #[test]
    fn test_write_requires_owner() {
        let stats = Arc::new(StatsCounters::new());
        let (host, mut device) = device(&stats);
        device.activate().unwrap();
        stats.record(Verdict::Drop);
        let key = path().to_string();

        let err = host.write(&key, Principal::Other, b"0").unwrap_err();
        assert!(matches!(err, FirewallError::PermissionDenied { access: Access::Write, .. }));
        assert_eq!(host.read(&key, Principal::Other).unwrap(), "0,1\n");

        assert_eq!(host.write(&key, Principal::Owner, b"0").unwrap(), 1);
        assert_eq!(host.read(&key, Principal::Owner).unwrap(), "0,0\n");
    }

    #[test]
    fn test_missing_attribute() {
        let host = AttributeRegistry::new();
        assert!(matches!(
            host.read("/sys/class/nope", Principal::Owner),
            Err(FirewallError::AttributeNotFound(_))
        ));
    }
}
