use thiserror::Error;

use crate::control::attribute::Access;
use crate::network::core::pipeline::HostStatus;
use crate::network::hooks::HookPoint;

#[derive(Debug, Error)]
pub enum FirewallError {
    /// The host pipeline refused to install a hook point
    #[error("Failed to register {hook} hook: host status {status}")]
    Registration { hook: HookPoint, status: HostStatus },

    /// The control surface endpoint could not be created
    #[error("Failed to set up control device {path}: host status {status}")]
    DeviceSetup { path: String, status: HostStatus },

    /// A control attribute access was refused by its mode bits
    #[error("Permission denied: {access} on {path}")]
    PermissionDenied { path: String, access: Access },

    /// No attribute is published at the requested path
    #[error("No such attribute: {0}")]
    AttributeNotFound(String),

    /// Configuration name that is not a plain file name
    #[error("Invalid configuration name: {0:?}")]
    InvalidConfigName(String),

    /// Error when a mutex/rwlock is poisoned
    #[error("Lock poisoned: {0}")]
    LockPoisoned(String),

    /// I/O errors from file operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed configuration file
    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Settings could not be rendered as TOML
    #[error("Failed to serialize config: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// Installing the Ctrl-C handler failed
    #[error("Failed to install signal handler: {0}")]
    Signal(#[from] ctrlc::Error),

    /// Status could not be rendered as JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A convenient Result type alias using `FirewallError`.
pub type Result<T> = std::result::Result<T, FirewallError>;

impl FirewallError {
    /// Creates a new lock poisoned error with a descriptive message.
    pub fn lock_poisoned(resource: &str) -> Self {
        Self::LockPoisoned(format!("Failed to acquire lock on {}", resource))
    }

    /// Returns the host status carried by startup failures, if any.
    pub fn host_status(&self) -> Option<HostStatus> {
        match self {
            Self::Registration { status, .. } | Self::DeviceSetup { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_error_message() {
        let err = FirewallError::Registration {
            hook: HookPoint::Forward,
            status: HostStatus(-12),
        };
        assert_eq!(err.to_string(), "Failed to register forward hook: host status -12");
        assert_eq!(err.host_status(), Some(HostStatus(-12)));
    }

    #[test]
    fn test_lock_poisoned_has_no_status() {
        let err = FirewallError::lock_poisoned("hook table");
        assert!(err.to_string().contains("hook table"));
        assert_eq!(err.host_status(), None);
    }
}
