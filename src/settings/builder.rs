//! Fluent builder for `FirewallSettings`.

use crate::settings::firewall::FirewallSettings;

/// Builder for constructing `FirewallSettings`.
#[derive(Debug, Default)]
pub struct SettingsBuilder {
    settings: FirewallSettings,
}

impl SettingsBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn class_name(mut self, name: impl Into<String>) -> Self {
        self.settings.class_name = name.into();
        self
    }

    pub fn device_name(mut self, name: impl Into<String>) -> Self {
        self.settings.device_name = name.into();
        self
    }

    pub fn attribute_name(mut self, name: impl Into<String>) -> Self {
        self.settings.attribute_name = name.into();
        self
    }

    pub fn log_packets(mut self, enabled: bool) -> Self {
        self.settings.log_packets = enabled;
        self
    }

    /// Sets the statistics log interval.
    ///
    /// # Arguments
    ///
    /// * `interval_ms` - Interval in milliseconds
    pub fn stats_interval(mut self, interval_ms: u64) -> Self {
        self.settings.stats_interval_ms = interval_ms;
        self
    }

    pub fn build(self) -> FirewallSettings {
        self.settings
    }
}
