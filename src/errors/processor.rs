// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors raised by processor bodies.
//!
//! Processors are user code, so this type stays deliberately open: a plain
//! message, a rejected init argument, an I/O failure, or any boxed error.

use thiserror::Error;

/// Failure reported by a processor's `init`, `process`, or `close`.
#[derive(Error, Debug)]
pub enum ProcessorError {
    /// Generic failure with a human-readable message.
    #[error("{0}")]
    Failed(String),

    /// The init argument string could not be interpreted.
    #[error("Invalid argument '{argument}': {reason}")]
    InvalidArgument { argument: String, reason: String },

    /// I/O failure, typically from a diagnostic sink.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Any other error raised by user code.
    #[error(transparent)]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

impl ProcessorError {
    /// Create a failure from any message.
    pub fn failed(message: impl Into<String>) -> Self {
        ProcessorError::Failed(message.into())
    }

    /// Wrap an arbitrary error raised by user code.
    pub fn other<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        ProcessorError::Other(Box::new(error))
    }
}
