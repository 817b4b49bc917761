//! Startup and shutdown of a filter instance.
//!
//! A [`Firewall`] owns the counters, the hook registrations and the control
//! device. It is either fully started or not at all: any startup failure
//! unwinds both halves before the error is returned.

use crate::control::{AttributeHost, AttributePath, ControlAttribute, ControlDevice};
use crate::error::Result;
use crate::network::core::pipeline::PacketPipeline;
use crate::network::hooks::{HookDispatcher, HookPoint, RegistrationManager};
use crate::network::stats::StatsCounters;
use crate::settings::FirewallSettings;
use log::{error, info};
use std::sync::Arc;

/// A running filter instance.
pub struct Firewall<P: PacketPipeline, A: AttributeHost> {
    settings: FirewallSettings,
    stats: Arc<StatsCounters>,
    registrations: RegistrationManager<P>,
    control: ControlDevice<A>,
    running: bool,
}

impl<P: PacketPipeline, A: AttributeHost> Firewall<P, A> {
    /// Registers the hooks, then activates the control surface.
    pub fn init(settings: FirewallSettings, pipeline: Arc<P>, host: Arc<A>) -> Result<Self> {
        let stats = Arc::new(StatsCounters::new());
        let dispatcher = Arc::new(
            HookDispatcher::new(Arc::clone(&stats)).with_packet_logging(settings.log_packets),
        );
        let registrations = RegistrationManager::new(pipeline, dispatcher);
        let attribute = Arc::new(ControlAttribute::new(
            settings.attribute_name.clone(),
            Arc::clone(&stats),
        ));
        let control = ControlDevice::new(host, settings.attribute_path(), attribute);

        let mut firewall = Self {
            settings,
            stats,
            registrations,
            control,
            running: false,
        };

        if let Err(e) = firewall.start() {
            error!("Firewall startup failed: {}", e);
            firewall.unwind();
            return Err(e);
        }

        info!("Firewall started");
        Ok(firewall)
    }

    fn start(&mut self) -> Result<()> {
        self.registrations.register_all()?;
        self.control.activate()?;
        self.running = true;
        Ok(())
    }

    fn unwind(&mut self) {
        self.control.deactivate();
        self.registrations.unregister_all();
    }

    /// Deactivates the control surface, then removes the hooks.
    ///
    /// Safe to call more than once and after a failed start.
    pub fn teardown(&mut self) {
        self.unwind();
        if self.running {
            self.running = false;
            info!("Firewall stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn settings(&self) -> &FirewallSettings {
        &self.settings
    }

    pub fn stats(&self) -> &Arc<StatsCounters> {
        &self.stats
    }

    /// The control attribute bound to this instance's counters.
    pub fn control(&self) -> &Arc<ControlAttribute> {
        self.control.attribute()
    }

    pub fn attribute_path(&self) -> &AttributePath {
        self.control.path()
    }

    pub fn active_hooks(&self) -> Vec<HookPoint> {
        self.registrations.active_hooks()
    }
}

impl<P: PacketPipeline, A: AttributeHost> Drop for Firewall<P, A> {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::device::SetupStep;
    use crate::control::{AttributeRegistry, Principal};
    use crate::error::FirewallError;
    use crate::network::core::pipeline::{HostStatus, SimulatedPipeline};
    use crate::network::core::PacketData;
    use crate::network::hooks::{HookPriority, Verdict};

    type TestFirewall = Firewall<SimulatedPipeline, AttributeRegistry>;

    fn hosts() -> (Arc<SimulatedPipeline>, Arc<AttributeRegistry>) {
        (Arc::new(SimulatedPipeline::new()), Arc::new(AttributeRegistry::new()))
    }

    fn start(pipeline: &Arc<SimulatedPipeline>, host: &Arc<AttributeRegistry>) -> Result<TestFirewall> {
        Firewall::init(FirewallSettings::default(), Arc::clone(pipeline), Arc::clone(host))
    }

    fn send(pipeline: &SimulatedPipeline, hook: HookPoint, count: usize) {
        let packet = PacketData::from(vec![0x45u8; 28]);
        for _ in 0..count {
            pipeline.inject(hook, &packet);
        }
    }

    #[test]
    fn test_end_to_end() {
        let (pipeline, host) = hosts();
        let firewall = start(&pipeline, &host).unwrap();
        let path = firewall.attribute_path().to_string();

        send(&pipeline, HookPoint::Input, 3);
        send(&pipeline, HookPoint::Output, 2);
        send(&pipeline, HookPoint::Forward, 1);

        assert_eq!(firewall.control().display(), "5,1\n");
        assert_eq!(host.read(&path, Principal::Other).unwrap(), "5,1\n");

        assert_eq!(host.write(&path, Principal::Owner, b"0").unwrap(), 1);
        assert_eq!(firewall.control().display(), "0,0\n");
    }

    #[test]
    fn test_verdicts_through_pipeline() {
        let (pipeline, host) = hosts();
        let _firewall = start(&pipeline, &host).unwrap();
        let packet = PacketData::from(vec![0u8; 20]);

        assert_eq!(pipeline.inject(HookPoint::Input, &packet), Verdict::Accept);
        assert_eq!(pipeline.inject(HookPoint::Output, &packet), Verdict::Accept);
        assert_eq!(pipeline.inject(HookPoint::Forward, &packet), Verdict::Drop);
    }

    #[test]
    fn test_forward_registration_failure() {
        let (pipeline, host) = hosts();
        pipeline.fail_registration(HookPoint::Forward, HostStatus::NO_MEMORY);

        let err = start(&pipeline, &host).err().unwrap();
        assert!(matches!(
            err,
            FirewallError::Registration {
                hook: HookPoint::Forward,
                ..
            }
        ));
        assert!(pipeline.active_hooks().is_empty());
        assert!(host.published().is_empty());
    }

    #[test]
    fn test_device_failure_unregisters_hooks() {
        let (pipeline, host) = hosts();
        host.fail_step(SetupStep::Device, HostStatus::BUSY);

        let err = start(&pipeline, &host).err().unwrap();
        assert_eq!(err.host_status(), Some(HostStatus::BUSY));
        assert!(pipeline.active_hooks().is_empty());
        assert!(host.published().is_empty());
    }

    #[test]
    fn test_attribute_failure_unwinds_everything() {
        let (pipeline, host) = hosts();
        host.fail_step(SetupStep::Attribute, HostStatus::NO_MEMORY);

        assert!(start(&pipeline, &host).is_err());
        assert!(pipeline.active_hooks().is_empty());
        assert!(!host.has_device("secws_class_secws_char_device"));
    }

    #[test]
    fn test_teardown_is_idempotent() {
        let (pipeline, host) = hosts();
        let mut firewall = start(&pipeline, &host).unwrap();
        assert!(firewall.is_running());
        assert_eq!(firewall.active_hooks(), HookPoint::ALL.to_vec());

        firewall.teardown();
        firewall.teardown();
        assert!(!firewall.is_running());
        assert!(firewall.active_hooks().is_empty());
        assert!(host.published().is_empty());

        // Unhooked chains fall back to the host default and count nothing.
        send(&pipeline, HookPoint::Forward, 4);
        assert_eq!(firewall.control().display(), "0,0\n");
    }

    #[test]
    fn test_drop_tears_down() {
        let (pipeline, host) = hosts();
        {
            let _firewall = start(&pipeline, &host).unwrap();
            assert_eq!(pipeline.active_hooks().len(), 3);
        }
        assert!(pipeline.active_hooks().is_empty());
        assert!(host.published().is_empty());
    }

    #[test]
    fn test_instances_are_independent() {
        let (pipeline_a, host_a) = hosts();
        let (pipeline_b, host_b) = hosts();
        let a = start(&pipeline_a, &host_a).unwrap();
        let b = start(&pipeline_b, &host_b).unwrap();

        send(&pipeline_a, HookPoint::Input, 2);
        send(&pipeline_b, HookPoint::Forward, 3);

        assert_eq!(a.control().display(), "2,0\n");
        assert_eq!(b.control().display(), "0,3\n");
    }

    #[test]
    fn test_hooks_always_run_first() {
        let (pipeline, host) = hosts();
        let settings = crate::settings::SettingsBuilder::new()
            .device_name("other")
            .log_packets(true)
            .build();
        let firewall = Firewall::init(settings, Arc::clone(&pipeline), Arc::clone(&host)).unwrap();

        let registrations = firewall.registrations.registrations();
        assert_eq!(registrations.len(), 3);
        assert!(registrations.iter().all(|r| r.priority == HookPriority::FIRST));
    }

    #[test]
    fn test_second_instance_on_same_host_fails_cleanly() {
        let (pipeline, host) = hosts();
        let first = start(&pipeline, &host).unwrap();

        let err = start(&pipeline, &host).err().unwrap();
        assert!(matches!(
            err,
            FirewallError::Registration {
                hook: HookPoint::Input,
                status: HostStatus::BUSY
            }
        ));
        // The failed instance's rollback must not touch the running one.
        assert_eq!(first.active_hooks(), HookPoint::ALL.to_vec());
        assert_eq!(host.published().len(), 1);

        drop(first);
        assert!(pipeline.active_hooks().is_empty());
    }
}
