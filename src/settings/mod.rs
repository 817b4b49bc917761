//! Settings for the packet filter.
//!
//! Names of the control attribute and the logging knobs. Settings
//! can be given on the command line, built in code, or stored as TOML.
//!
//! # Example
//!
//! ```rust
//! use secws::settings::SettingsBuilder;
//!
//! let settings = SettingsBuilder::new()
//!     .class_name("fw_class")
//!     .log_packets(true)
//!     .build();
//! assert_eq!(settings.class_name, "fw_class");
//! ```

pub mod builder;
pub mod firewall;
pub mod store;

// Re-export commonly used types
pub use builder::SettingsBuilder;
pub use firewall::FirewallSettings;
