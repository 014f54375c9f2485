// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for pipeline driver lifecycle events.
//!
//! This module contains message types for logging events related to:
//! * Pipeline start and completion
//! * Worker thread spawn failures
//! * Worker threads that could not be joined

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Pipeline execution started.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use the_pipeworks::observability::messages::engine::PipelineStarted;
///
/// let msg = PipelineStarted {
///     worker_count: 4,
///     thread_name_prefix: "worker",
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct PipelineStarted<'a> {
    pub worker_count: usize,
    pub thread_name_prefix: &'a str,
}

impl Display for PipelineStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Starting pipeline: {} workers, thread prefix '{}'",
            self.worker_count, self.thread_name_prefix
        )
    }
}

impl StructuredLog for PipelineStarted<'_> {
    fn log(&self) {
        tracing::info!(
            worker_count = self.worker_count,
            thread_name_prefix = self.thread_name_prefix,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "pipeline",
            span_name = name,
            worker_count = self.worker_count,
        )
    }
}

/// Every worker thread has been joined.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use the_pipeworks::observability::messages::engine::PipelineCompleted;
/// use std::time::Duration;
///
/// let msg = PipelineCompleted {
///     worker_count: 4,
///     failed_count: 0,
///     duration: Duration::from_millis(120),
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct PipelineCompleted {
    pub worker_count: usize,
    pub failed_count: usize,
    pub duration: std::time::Duration,
}

impl Display for PipelineCompleted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Pipeline completed: {} workers, {} failed, duration={:?}",
            self.worker_count, self.failed_count, self.duration
        )
    }
}

impl StructuredLog for PipelineCompleted {
    fn log(&self) {
        if self.failed_count == 0 {
            tracing::info!(
                worker_count = self.worker_count,
                failed_count = self.failed_count,
                duration_ms = self.duration.as_millis() as u64,
                "{}", self
            );
        } else {
            tracing::warn!(
                worker_count = self.worker_count,
                failed_count = self.failed_count,
                duration_ms = self.duration.as_millis() as u64,
                "{}", self
            );
        }
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "pipeline",
            span_name = name,
            worker_count = self.worker_count,
            failed_count = self.failed_count,
        )
    }
}

/// The operating system refused to start a worker thread.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use the_pipeworks::observability::messages::engine::ThreadSpawnFailed;
///
/// let error = std::io::Error::new(std::io::ErrorKind::OutOfMemory, "no stack");
/// let msg = ThreadSpawnFailed {
///     worker_index: 2,
///     thread_name: "worker-2",
///     error: &error,
/// };
///
/// tracing::error!("{}", msg);
/// ```
pub struct ThreadSpawnFailed<'a> {
    pub worker_index: usize,
    pub thread_name: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for ThreadSpawnFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Failed to spawn thread '{}' for worker {}: {}",
            self.thread_name, self.worker_index, self.error
        )
    }
}

impl StructuredLog for ThreadSpawnFailed<'_> {
    fn log(&self) {
        tracing::error!(
            worker_index = self.worker_index,
            thread_name = self.thread_name,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "pipeline",
            span_name = name,
            worker_index = self.worker_index,
            thread_name = self.thread_name,
        )
    }
}

/// A worker thread terminated without handing back its result.
///
/// Workers catch processor panics themselves, so this only fires when the
/// worker machinery itself panicked.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use the_pipeworks::observability::messages::engine::WorkerJoinFailed;
///
/// let msg = WorkerJoinFailed {
///     worker_index: 1,
///     message: "thread panicked",
/// };
///
/// tracing::error!("{}", msg);
/// ```
pub struct WorkerJoinFailed<'a> {
    pub worker_index: usize,
    pub message: &'a str,
}

impl Display for WorkerJoinFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Failed to join worker {}: {}",
            self.worker_index, self.message
        )
    }
}

impl StructuredLog for WorkerJoinFailed<'_> {
    fn log(&self) {
        tracing::error!(
            worker_index = self.worker_index,
            message = self.message,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "pipeline",
            span_name = name,
            worker_index = self.worker_index,
        )
    }
}
