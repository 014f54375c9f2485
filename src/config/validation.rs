// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Validation of loaded pipeline configuration.
//!
//! Configuration only tunes execution, so the checks here are about values
//! the driver cannot use: duplicate worker entries (which entry would win?),
//! zero-length timeouts and stacks, and an empty thread name prefix. Topology
//! problems are caught later, against the wired workers, by
//! [`crate::engine::topology::validate_topology`].
//!
//! Errors are accumulated so every problem is reported at once.
//!
//! # Example
//!
//! ```rust
//! use the_pipeworks::config::{validate_config, PipelineConfig, WorkerConfig};
//! use the_pipeworks::errors::ValidationError;
//!
//! let config = PipelineConfig {
//!     idle_timeout_ms: Some(0),
//!     workers: vec![
//!         WorkerConfig { index: 1, ..Default::default() },
//!         WorkerConfig { index: 1, ..Default::default() },
//!     ],
//!     ..Default::default()
//! };
//!
//! let errors = validate_config(&config).unwrap_err();
//! assert_eq!(errors.len(), 2);
//! assert!(errors
//!     .iter()
//!     .any(|e| matches!(e, ValidationError::DuplicateWorkerIndex { worker_index: 1 })));
//! ```

use std::collections::HashSet;

use crate::config::PipelineConfig;
use crate::errors::ValidationError;

/// Validate every configured value.
pub fn validate_config(config: &PipelineConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(duplicate_errors) = validate_unique_worker_indices(config) {
        errors.extend(duplicate_errors);
    }

    if let Err(option_errors) = validate_options(config) {
        errors.extend(option_errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_unique_worker_indices(config: &PipelineConfig) -> Result<(), Vec<ValidationError>> {
    let mut seen = HashSet::new();
    let mut errors = Vec::new();

    for worker in &config.workers {
        if !seen.insert(worker.index) {
            errors.push(ValidationError::DuplicateWorkerIndex {
                worker_index: worker.index,
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_options(config: &PipelineConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.idle_timeout_ms == Some(0) {
        errors.push(invalid("idle_timeout_ms", "must be greater than zero"));
    }

    let executor = &config.executor_options;
    if executor.stack_size == Some(0) {
        errors.push(invalid("executor_options.stack_size", "must be greater than zero"));
    }
    if executor
        .thread_name_prefix
        .as_deref()
        .is_some_and(|prefix| prefix.trim().is_empty())
    {
        errors.push(invalid("executor_options.thread_name_prefix", "must not be empty"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn invalid(field: &str, reason: &str) -> ValidationError {
    ValidationError::InvalidOption {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}
