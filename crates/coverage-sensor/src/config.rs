//! Sensor configuration
//!
//! Loaded from YAML or built in code. Every knob has a default that works for
//! a typical instrumented service, so an empty file is a valid configuration.
//!
//! ```yaml
//! shard_count: 64
//! initial_capacity: 65536
//! recorder_capacity: 16384
//! reference_floor: 0.0
//! telemetry:
//!   level: info
//!   json: false
//! ```

use crate::recorder::BufferedRecorder;
use crate::result::{SensorError, SensorResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Upper bound on `shard_count`
pub const MAX_SHARD_COUNT: usize = 4096;

/// Upper bound on `initial_capacity`
pub const MAX_INITIAL_CAPACITY: usize = 1 << 24;

/// Upper bound on `recorder_capacity`
pub const MAX_RECORDER_CAPACITY: usize = 1 << 24;

/// Logging configuration for the instrumented process
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Default filter directive when `RUST_LOG` is not set
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Coverage sensor configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// Number of independently locked map shards (power of two, at most
    /// [`MAX_SHARD_COUNT`])
    pub shard_count: usize,
    /// Expected number of objectives, spread across shards (at most
    /// [`MAX_INITIAL_CAPACITY`])
    pub initial_capacity: usize,
    /// Pending updates the queue built by [`SensorConfig::buffered_recorder`]
    /// can hold (at most [`MAX_RECORDER_CAPACITY`])
    pub recorder_capacity: usize,
    /// Score of the non-taken side of reference comparisons, in [0,1)
    pub reference_floor: f64,
    /// Logging
    pub telemetry: TelemetryConfig,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            shard_count: 64,
            initial_capacity: 65_536,
            recorder_capacity: 16_384,
            reference_floor: 0.0,
            telemetry: TelemetryConfig::default(),
        }
    }
}

impl SensorConfig {
    /// Create a builder for sensor config
    #[must_use]
    pub fn builder() -> SensorConfigBuilder {
        SensorConfigBuilder::default()
    }

    /// Parse and validate a YAML document
    pub fn from_yaml_str(yaml: &str) -> SensorResult<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a YAML file
    pub fn from_path(path: impl AsRef<Path>) -> SensorResult<Self> {
        let path = path.as_ref();
        let yaml = fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&yaml)?;
        tracing::debug!(path = %path.display(), ?config, "loaded sensor config");
        Ok(config)
    }

    /// Serialize to YAML
    pub fn to_yaml(&self) -> SensorResult<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Check invariants that serde cannot express
    pub fn validate(&self) -> SensorResult<()> {
        if self.shard_count == 0 || !self.shard_count.is_power_of_two() {
            return Err(SensorError::config(format!(
                "shard_count must be a power of two, got {}",
                self.shard_count
            )));
        }
        if self.shard_count > MAX_SHARD_COUNT {
            return Err(SensorError::config(format!(
                "shard_count must be at most {MAX_SHARD_COUNT}, got {}",
                self.shard_count
            )));
        }
        if self.initial_capacity > MAX_INITIAL_CAPACITY {
            return Err(SensorError::config(format!(
                "initial_capacity must be at most {MAX_INITIAL_CAPACITY}, got {}",
                self.initial_capacity
            )));
        }
        if self.recorder_capacity == 0 || self.recorder_capacity > MAX_RECORDER_CAPACITY {
            return Err(SensorError::config(format!(
                "recorder_capacity must be in 1..={MAX_RECORDER_CAPACITY}, got {}",
                self.recorder_capacity
            )));
        }
        if !(0.0..1.0).contains(&self.reference_floor) {
            return Err(SensorError::config(format!(
                "reference_floor must be in [0,1), got {}",
                self.reference_floor
            )));
        }
        Ok(())
    }

    /// Initial capacity of each shard
    #[must_use]
    pub fn shard_capacity(&self) -> usize {
        self.initial_capacity.div_ceil(self.shard_count.max(1))
    }

    /// Session recorder queue sized by `recorder_capacity`
    #[must_use]
    pub fn buffered_recorder(&self) -> Arc<BufferedRecorder> {
        Arc::new(BufferedRecorder::new(self.recorder_capacity))
    }
}

/// Builder for sensor configuration
#[derive(Debug, Default)]
pub struct SensorConfigBuilder {
    config: SensorConfig,
}

impl SensorConfigBuilder {
    /// Set the number of shards
    #[must_use]
    pub fn shard_count(mut self, shards: usize) -> Self {
        self.config.shard_count = shards;
        self
    }

    /// Set the expected number of objectives
    #[must_use]
    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.config.initial_capacity = capacity;
        self
    }

    /// Set the recorder queue capacity
    #[must_use]
    pub fn recorder_capacity(mut self, capacity: usize) -> Self {
        self.config.recorder_capacity = capacity;
        self
    }

    /// Set the reference floor
    #[must_use]
    pub fn reference_floor(mut self, floor: f64) -> Self {
        self.config.reference_floor = floor;
        self
    }

    /// Set the telemetry configuration
    #[must_use]
    pub fn telemetry(mut self, telemetry: TelemetryConfig) -> Self {
        self.config.telemetry = telemetry;
        self
    }

    /// Validate and build the configuration
    pub fn build(self) -> SensorResult<SensorConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
