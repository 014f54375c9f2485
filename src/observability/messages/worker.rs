// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for worker run lifecycle events.
//!
//! This module contains message types for logging events related to:
//! * Worker start (role, processor, iteration limit)
//! * Clean stop and the reason for it
//! * Worker failure as observed by the driver at join time
//! * `close` failures that would otherwise be masked by an earlier error

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Worker entered its run loop.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use the_pipeworks::observability::messages::worker::WorkerStarted;
///
/// let msg = WorkerStarted {
///     worker_index: 1,
///     processor: "offset_formatter",
///     role: "in_out",
///     limit: None,
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct WorkerStarted<'a> {
    pub worker_index: usize,
    pub processor: &'a str,
    pub role: &'a str,
    pub limit: Option<u64>,
}

impl Display for WorkerStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self.limit {
            Some(limit) => write!(
                f,
                "Worker {} ({}, {}) started: limit={} iterations",
                self.worker_index, self.processor, self.role, limit
            ),
            None => write!(
                f,
                "Worker {} ({}, {}) started: unbounded",
                self.worker_index, self.processor, self.role
            ),
        }
    }
}

impl StructuredLog for WorkerStarted<'_> {
    fn log(&self) {
        tracing::info!(
            worker_index = self.worker_index,
            processor = self.processor,
            role = self.role,
            limit = ?self.limit,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "worker",
            span_name = name,
            worker_index = self.worker_index,
            processor = self.processor,
            role = self.role,
        )
    }
}

/// Worker left its run loop cleanly.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use the_pipeworks::observability::messages::worker::WorkerStopped;
///
/// let msg = WorkerStopped {
///     worker_index: 3,
///     processor: "console_sink",
///     iterations: 42,
///     stop_reason: "upstream_closed",
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct WorkerStopped<'a> {
    pub worker_index: usize,
    pub processor: &'a str,
    pub iterations: u64,
    pub stop_reason: &'a str,
}

impl Display for WorkerStopped<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Worker {} ({}) stopped after {} iterations: {}",
            self.worker_index, self.processor, self.iterations, self.stop_reason
        )
    }
}

impl StructuredLog for WorkerStopped<'_> {
    fn log(&self) {
        tracing::info!(
            worker_index = self.worker_index,
            processor = self.processor,
            iterations = self.iterations,
            stop_reason = self.stop_reason,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "worker",
            span_name = name,
            worker_index = self.worker_index,
            processor = self.processor,
        )
    }
}

/// Worker failed.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use the_pipeworks::observability::messages::worker::WorkerFailed;
///
/// let error = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
/// let msg = WorkerFailed {
///     worker_index: 2,
///     error: &error,
/// };
///
/// tracing::error!("{}", msg);
/// ```
pub struct WorkerFailed<'a> {
    pub worker_index: usize,
    pub error: &'a dyn std::error::Error,
}

impl Display for WorkerFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Worker {} failed: {}", self.worker_index, self.error)
    }
}

impl StructuredLog for WorkerFailed<'_> {
    fn log(&self) {
        tracing::error!(
            worker_index = self.worker_index,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "worker",
            span_name = name,
            worker_index = self.worker_index,
        )
    }
}

/// `close` failed after the worker had already failed for another reason.
///
/// # Log Level
/// `warn!` - The original failure is the one reported
///
/// # Example
/// ```
/// use the_pipeworks::observability::messages::worker::ProcessorCloseFailed;
///
/// let error = std::io::Error::new(std::io::ErrorKind::Other, "flush failed");
/// let msg = ProcessorCloseFailed {
///     worker_index: 1,
///     processor: "console_sink",
///     error: &error,
/// };
///
/// tracing::warn!("{}", msg);
/// ```
pub struct ProcessorCloseFailed<'a> {
    pub worker_index: usize,
    pub processor: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for ProcessorCloseFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Worker {} ({}) close failed after an earlier error: {}",
            self.worker_index, self.processor, self.error
        )
    }
}

impl StructuredLog for ProcessorCloseFailed<'_> {
    fn log(&self) {
        tracing::warn!(
            worker_index = self.worker_index,
            processor = self.processor,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "worker",
            span_name = name,
            worker_index = self.worker_index,
            processor = self.processor,
        )
    }
}
