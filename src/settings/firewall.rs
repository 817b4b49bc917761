use crate::control::AttributePath;
use clap::Args;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CLASS_NAME: &str = "secws_class";
pub const DEFAULT_DEVICE_NAME: &str = "secws_char_device";
pub const DEFAULT_ATTRIBUTE_NAME: &str = "stats_accepted_dropped";

/// Settings for one filter instance.
#[derive(Args, Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct FirewallSettings {
    /// Device class the control device is created under
    #[arg(long = "class-name", default_value = DEFAULT_CLASS_NAME)]
    pub class_name: String,

    /// Name of the control character device
    #[arg(long = "device-name", default_value = DEFAULT_DEVICE_NAME)]
    pub device_name: String,

    /// Name of the stats attribute file
    #[arg(long = "attribute-name", default_value = DEFAULT_ATTRIBUTE_NAME)]
    pub attribute_name: String,

    /// Emit a trace line for every packet
    #[arg(long = "log-packets", default_value_t = false)]
    pub log_packets: bool,

    /// Interval between statistics log lines in milliseconds
    #[arg(long = "stats-interval", default_value_t = 2000)]
    pub stats_interval_ms: u64,
}

impl Default for FirewallSettings {
    fn default() -> Self {
        Self {
            class_name: DEFAULT_CLASS_NAME.to_string(),
            device_name: DEFAULT_DEVICE_NAME.to_string(),
            attribute_name: DEFAULT_ATTRIBUTE_NAME.to_string(),
            log_packets: false,
            stats_interval_ms: 2000,
        }
    }
}

impl FirewallSettings {
    pub fn attribute_path(&self) -> AttributePath {
        AttributePath::new(&self.class_name, &self.device_name, &self.attribute_name)
    }
}
