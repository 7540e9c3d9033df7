//! # Message Allocation Configuration
//!
//! Process-wide default capacity for [`NlMsg::alloc`](crate::NlMsg::alloc).
//!
//! The default starts at the system page size. It can be replaced at runtime
//! with [`set_default_size`], loaded from `NETLINK_*` environment variables
//! with [`MsgConfig::from_env`], or bypassed entirely by handing a
//! [`MsgConfig`] to [`NlMsg::alloc_with`](crate::NlMsg::alloc_with).

use std::sync::atomic::{AtomicUsize, Ordering};

use config_crate::{Config, ConfigError, Environment};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::layout::total_size;

/// Fallback when the page size cannot be queried
const FALLBACK_PAGE_SIZE: usize = 4096;

static DEFAULT_MSG_SIZE: Lazy<AtomicUsize> =
    Lazy::new(|| AtomicUsize::new(MsgConfig::default().default_size));

/// Allocation settings for netlink messages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MsgConfig {
    /// Capacity in bytes of messages allocated without an explicit size
    pub default_size: usize,
}

impl Default for MsgConfig {
    fn default() -> Self {
        Self {
            default_size: page_size(),
        }
    }
}

impl MsgConfig {
    pub fn new(default_size: usize) -> Self {
        Self { default_size }.clamped()
    }

    /// Load settings from `NETLINK_` prefixed environment variables
    ///
    /// `NETLINK_DEFAULT_SIZE=8192` sets [`MsgConfig::default_size`]; unset
    /// variables keep their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(Environment::with_prefix("NETLINK").try_parsing(true))
            .build()?;

        let loaded: MsgConfig = config.try_deserialize()?;
        Ok(loaded.clamped())
    }

    /// Raise `default_size` to at least an empty message
    pub fn clamped(mut self) -> Self {
        self.default_size = self.default_size.max(total_size(0));
        self
    }

    /// Make these settings the process-wide default
    pub fn install(&self) {
        set_default_size(self.default_size);
    }
}

/// Current process-wide default capacity
pub fn default_size() -> usize {
    DEFAULT_MSG_SIZE.load(Ordering::Relaxed)
}

/// Set the default capacity of future [`NlMsg::alloc`](crate::NlMsg::alloc) calls
///
/// Values below the size of an empty message are raised to it.
pub fn set_default_size(max: usize) {
    let size = max.max(total_size(0));
    DEFAULT_MSG_SIZE.store(size, Ordering::Relaxed);
    debug!("Default message size set to {} bytes (requested {})", size, max);
}

/// System page size in bytes
pub fn page_size() -> usize {
    use nix::unistd::{sysconf, SysconfVar};

    match sysconf(SysconfVar::PAGE_SIZE) {
        Ok(Some(size)) if size > 0 => size as usize,
        _ => FALLBACK_PAGE_SIZE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_page_size() {
        let config = MsgConfig::default();
        assert_eq!(config.default_size, page_size());
        assert!(config.default_size >= total_size(0));
        assert!(config.default_size.is_power_of_two());
    }

    #[test]
    fn test_new_clamps_small_sizes() {
        assert_eq!(MsgConfig::new(0).default_size, 16);
        assert_eq!(MsgConfig::new(3).default_size, 16);
        assert_eq!(MsgConfig::new(100).default_size, 100);
    }

    #[test]
    fn test_deserialize_with_missing_fields() {
        let config: MsgConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, MsgConfig::default());

        let config: MsgConfig = serde_json::from_str(r#"{"default_size": 512}"#).unwrap();
        assert_eq!(config.default_size, 512);
    }

    #[test]
    fn test_from_env() {
        std::env::set_var("NETLINK_DEFAULT_SIZE", "8");
        let config = MsgConfig::from_env().unwrap();
        std::env::remove_var("NETLINK_DEFAULT_SIZE");

        // 8 is below an empty message and gets clamped
        assert_eq!(config.default_size, 16);
    }
}
