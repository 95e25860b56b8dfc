//! Multicast membership configuration and validation
//!
//! # Example
//!
//! ```rust
//! use bloom_multicast::MulticastConfigBuilder;
//!
//! let config = MulticastConfigBuilder::new()
//!     .retention_cycles(2)
//!     .maintenance_interval_ms(500)
//!     .build()
//!     .expect("Valid config");
//! assert_eq!(config.retention_cycles, 2);
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Upper bound on the anti-flap retention window.
pub const MAX_RETENTION_CYCLES: u32 = 16;

/// Membership subsystem configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MulticastConfig {
    /// Maintenance passes a no-longer-needed one bit is kept (0 = never).
    pub retention_cycles: u32,
    /// Period of the actor's maintenance timer (0 = on demand only).
    pub maintenance_interval_ms: u64,
    /// Capacity of the actor's command queue.
    pub command_queue_capacity: usize,
    /// Stop the actor after an invariant violation.
    pub halt_on_invariant_violation: bool,
}

impl Default for MulticastConfig {
    fn default() -> Self {
        Self {
            retention_cycles: 1,
            maintenance_interval_ms: 1_000,
            command_queue_capacity: 1_024,
            halt_on_invariant_violation: true,
        }
    }
}

impl MulticastConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.retention_cycles > MAX_RETENTION_CYCLES {
            return Err(ConfigError::RetentionTooLarge {
                cycles: self.retention_cycles,
                max: MAX_RETENTION_CYCLES,
            });
        }

        if self.command_queue_capacity == 0 {
            return Err(ConfigError::ZeroQueueCapacity);
        }

        Ok(())
    }

    /// Parse and validate a TOML document. Missing keys take defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Maintenance period, or `None` when the timer is disabled.
    pub fn maintenance_interval(&self) -> Option<Duration> {
        (self.maintenance_interval_ms > 0).then(|| Duration::from_millis(self.maintenance_interval_ms))
    }
}

/// Fluent builder for [`MulticastConfig`].
#[derive(Default)]
pub struct MulticastConfigBuilder {
    retention_cycles: Option<u32>,
    maintenance_interval_ms: Option<u64>,
    command_queue_capacity: Option<usize>,
    halt_on_invariant_violation: Option<bool>,
}

impl MulticastConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn retention_cycles(mut self, cycles: u32) -> Self {
        self.retention_cycles = Some(cycles);
        self
    }

    pub fn maintenance_interval_ms(mut self, ms: u64) -> Self {
        self.maintenance_interval_ms = Some(ms);
        self
    }

    pub fn command_queue_capacity(mut self, capacity: usize) -> Self {
        self.command_queue_capacity = Some(capacity);
        self
    }

    pub fn halt_on_invariant_violation(mut self, halt: bool) -> Self {
        self.halt_on_invariant_violation = Some(halt);
        self
    }

    /// Build and validate.
    pub fn build(self) -> Result<MulticastConfig, ConfigError> {
        let config = self.build_unchecked();
        config.validate()?;
        Ok(config)
    }

    /// Build without validation (tests only).
    pub fn build_unchecked(self) -> MulticastConfig {
        let defaults = MulticastConfig::default();

        MulticastConfig {
            retention_cycles: self.retention_cycles.unwrap_or(defaults.retention_cycles),
            maintenance_interval_ms: self
                .maintenance_interval_ms
                .unwrap_or(defaults.maintenance_interval_ms),
            command_queue_capacity: self
                .command_queue_capacity
                .unwrap_or(defaults.command_queue_capacity),
            halt_on_invariant_violation: self
                .halt_on_invariant_violation
                .unwrap_or(defaults.halt_on_invariant_violation),
        }
    }
}
