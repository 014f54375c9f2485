// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::buffer::ReadPolicy;
use crate::config::consts::DEFAULT_THREAD_NAME_PREFIX;
use crate::errors::ConfigError;
use crate::worker::WorkerOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Pipeline-wide execution settings.
///
/// Workers are wired in code; this file only tunes how they run. Every
/// field is optional.
///
/// # Fields
/// * `executor_options` - Thread naming and stack size
/// * `read_policy` - Default input read policy for every worker
/// * `idle_timeout_ms` - Default idle timeout for every consuming worker
/// * `workers` - Per-worker overrides, matched by worker index
///
/// # Example
/// ```yaml
/// executor_options:
///   thread_name_prefix: stage
///   stack_size: 262144
/// read_policy: fresh
/// idle_timeout_ms: 5000
/// workers:
///   - index: 0
///     iterations: 100
///     init: "220"
///     pacing_ms: 5
///   - index: 3
///     read_policy: latest
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub executor_options: ExecutorOptions,
    #[serde(default)]
    pub read_policy: Option<ReadPolicy>,
    #[serde(default)]
    pub idle_timeout_ms: Option<u64>,
    #[serde(default)]
    pub workers: Vec<WorkerConfig>,
}

impl PipelineConfig {
    /// Override entry for `index`, if any.
    pub fn worker(&self, index: usize) -> Option<&WorkerConfig> {
        self.workers.iter().find(|w| w.index == index)
    }

    /// Iteration limit configured for `index`.
    pub fn iterations(&self, index: usize) -> Option<u64> {
        self.worker(index).and_then(|w| w.iterations)
    }

    /// Apply pipeline-wide defaults, then the entry for `index`, to `options`.
    ///
    /// Only fields present in the configuration are touched.
    pub fn apply_to(&self, index: usize, options: &mut WorkerOptions) {
        if let Some(policy) = self.read_policy {
            options.read_policy = policy;
        }
        if let Some(ms) = self.idle_timeout_ms {
            options.idle_timeout = Some(Duration::from_millis(ms));
        }

        if let Some(worker) = self.worker(index) {
            if let Some(policy) = worker.read_policy {
                options.read_policy = policy;
            }
            if let Some(ms) = worker.pacing_ms {
                options.pacing = Some(Duration::from_millis(ms));
            }
            if let Some(init) = &worker.init {
                options.init_args = init.clone();
            }
        }
    }
}

/// Thread settings for the execution driver.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ExecutorOptions {
    pub thread_name_prefix: Option<String>,
    pub stack_size: Option<usize>,
}

impl ExecutorOptions {
    /// Configured prefix, or `"worker"`.
    pub fn thread_name_prefix(&self) -> &str {
        self.thread_name_prefix
            .as_deref()
            .unwrap_or(DEFAULT_THREAD_NAME_PREFIX)
    }
}

/// Overrides for one worker, matched by `index`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct WorkerConfig {
    pub index: usize,
    #[serde(default)]
    pub iterations: Option<u64>,
    /// Init argument string passed to the processor.
    #[serde(default)]
    pub init: Option<String>,
    #[serde(default)]
    pub pacing_ms: Option<u64>,
    #[serde(default)]
    pub read_policy: Option<ReadPolicy>,
}

/// Load a config from a YAML file, or TOML when the extension is `.toml`.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<PipelineConfig, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;

    let is_toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
    let cfg = if is_toml {
        toml::from_str(&content)?
    } else {
        serde_yaml::from_str(&content)?
    };
    Ok(cfg)
}

/// Load a config and reject values the driver cannot use.
pub fn load_and_validate_config<P: AsRef<Path>>(path: P) -> Result<PipelineConfig, ConfigError> {
    let cfg = load_config(path)?;

    crate::config::validate_config(&cfg).map_err(ConfigError::Invalid)?;

    Ok(cfg)
}
