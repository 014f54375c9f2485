// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;

/// Errors that can occur during pipeline topology and configuration validation
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A circular dependency was detected between workers
    CyclicDependency {
        /// The cycle path, as worker indices, showing the circular dependency
        cycle: Vec<usize>,
    },
    /// A worker reads a buffer with a writer outside the pipeline, or none at all
    UnresolvedProducer {
        /// The worker whose input cannot be satisfied
        worker_index: usize,
        /// The buffer it reads from
        buffer_id: u64,
    },
    /// Two workers share the same index
    DuplicateWorkerIndex {
        /// The duplicate worker index
        worker_index: usize,
    },
    /// A configuration option holds a value that cannot be used
    InvalidOption {
        /// Dotted path of the offending option
        field: String,
        /// Why the value was rejected
        reason: String,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::CyclicDependency { cycle } => {
                let path: Vec<String> = cycle.iter().map(|index| index.to_string()).collect();
                write!(f, "Cyclic dependency detected: {}", path.join(" -> "))
            }
            ValidationError::UnresolvedProducer {
                worker_index,
                buffer_id,
            } => {
                write!(
                    f,
                    "Worker {} reads buffer {} whose writers are not all in the pipeline",
                    worker_index, buffer_id
                )
            }
            ValidationError::DuplicateWorkerIndex { worker_index } => {
                write!(f, "Duplicate worker index: {}", worker_index)
            }
            ValidationError::InvalidOption { field, reason } => {
                write!(f, "Invalid option '{}': {}", field, reason)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Errors raised while loading a pipeline configuration file.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to parse TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration validation failed:\n{}", format_errors(.0))]
    Invalid(Vec<ValidationError>),
}

fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
