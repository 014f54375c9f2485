// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors raised while running workers and the pipeline driver.

use std::time::Duration;
use thiserror::Error;

use super::{ProcessorError, ValidationError};

/// Failure of a single worker's run.
///
/// These stay local to the worker's thread: the driver records them in the
/// `PipelineReport` at join time instead of re-throwing them.
#[derive(Error, Debug)]
pub enum WorkerError {
    /// `run` was called on a worker that has already run.
    #[error("Worker {worker_index} ({processor}) has already been run")]
    AlreadyRun {
        worker_index: usize,
        processor: String,
    },

    /// A consuming worker was started without an input buffer.
    #[error("Worker {worker_index} ({processor}) has no bound input buffer")]
    InputNotBound {
        worker_index: usize,
        processor: String,
    },

    /// The processor's `init` failed.
    #[error("Worker {worker_index} ({processor}) failed to initialize: {source}")]
    Init {
        worker_index: usize,
        processor: String,
        #[source]
        source: ProcessorError,
    },

    /// The processor's `process` failed.
    #[error("Worker {worker_index} ({processor}) failed on iteration {iteration}: {source}")]
    Processing {
        worker_index: usize,
        processor: String,
        iteration: u64,
        #[source]
        source: ProcessorError,
    },

    /// The processor's `close` failed after an otherwise clean run.
    #[error("Worker {worker_index} ({processor}) failed to close: {source}")]
    Close {
        worker_index: usize,
        processor: String,
        #[source]
        source: ProcessorError,
    },

    /// No new input arrived within the configured idle timeout.
    #[error("Worker {worker_index} ({processor}) received no input within {timeout:?}")]
    InputTimedOut {
        worker_index: usize,
        processor: String,
        timeout: Duration,
    },

    /// The processor panicked.
    #[error("Worker {worker_index} ({processor}) panicked: {message}")]
    Panicked {
        worker_index: usize,
        processor: String,
        message: String,
    },
}

impl WorkerError {
    /// Index of the worker that failed.
    pub fn worker_index(&self) -> usize {
        match self {
            WorkerError::AlreadyRun { worker_index, .. }
            | WorkerError::InputNotBound { worker_index, .. }
            | WorkerError::Init { worker_index, .. }
            | WorkerError::Processing { worker_index, .. }
            | WorkerError::Close { worker_index, .. }
            | WorkerError::InputTimedOut { worker_index, .. }
            | WorkerError::Panicked { worker_index, .. } => *worker_index,
        }
    }

    /// Render a panic payload as text.
    pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
        if let Some(message) = payload.downcast_ref::<&str>() {
            (*message).to_string()
        } else if let Some(message) = payload.downcast_ref::<String>() {
            message.clone()
        } else {
            "non-string panic payload".to_string()
        }
    }
}

/// Failure of the execution driver as a whole.
#[derive(Error, Debug)]
pub enum ExecutionError {
    /// The wired topology was rejected before any thread started.
    #[error("Pipeline topology is invalid: {}", format_validation_errors(.0))]
    InvalidTopology(Vec<ValidationError>),

    /// The operating system refused to start a worker thread.
    #[error("Failed to spawn thread for worker {worker_index}: {source}")]
    Spawn {
        worker_index: usize,
        #[source]
        source: std::io::Error,
    },

    /// One or more workers failed; details are in the pipeline report.
    #[error("{failed} of {total} workers failed")]
    WorkersFailed { failed: usize, total: usize },
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
