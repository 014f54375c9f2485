// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for topology validation errors.
//!
//! This module contains message types for logging events related to:
//! * Cyclic dependency detection
//! * Workers reading buffers nobody writes
//! * Duplicate worker index detection
//! * Validation summary

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

fn render_cycle(cycle: &[usize]) -> String {
    cycle
        .iter()
        .map(|index| index.to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Cyclic dependency detected between workers.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use the_pipeworks::observability::messages::validation::CyclicDependencyDetected;
///
/// let cycle = vec![1, 2, 3, 1];
/// let msg = CyclicDependencyDetected {
///     cycle: &cycle,
/// };
///
/// tracing::error!("{}", msg);
/// ```
pub struct CyclicDependencyDetected<'a> {
    pub cycle: &'a [usize],
}

impl Display for CyclicDependencyDetected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Cyclic dependency detected between workers: {}",
            render_cycle(self.cycle)
        )
    }
}

impl StructuredLog for CyclicDependencyDetected<'_> {
    fn log(&self) {
        tracing::error!(
            cycle = render_cycle(self.cycle),
            cycle_length = self.cycle.len(),
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::ERROR,
            "span_name",
            name = name,
            cycle = render_cycle(self.cycle),
            cycle_length = self.cycle.len(),
        )
    }
}

/// A worker reads a buffer whose writers are not all in the pipeline.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use the_pipeworks::observability::messages::validation::UnresolvedProducer;
///
/// let msg = UnresolvedProducer {
///     worker_index: 3,
///     buffer_id: 17,
/// };
///
/// tracing::error!("{}", msg);
/// ```
pub struct UnresolvedProducer {
    pub worker_index: usize,
    pub buffer_id: u64,
}

impl Display for UnresolvedProducer {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Worker {} reads buffer #{} whose writers are not all in the pipeline",
            self.worker_index, self.buffer_id
        )
    }
}

impl StructuredLog for UnresolvedProducer {
    fn log(&self) {
        tracing::error!(
            worker_index = self.worker_index,
            buffer_id = self.buffer_id,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::ERROR,
            "span_name",
            name = name,
            worker_index = self.worker_index,
            buffer_id = self.buffer_id,
        )
    }
}

/// Two workers share an index.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use the_pipeworks::observability::messages::validation::DuplicateWorkerIndex;
///
/// let msg = DuplicateWorkerIndex { worker_index: 2 };
///
/// tracing::error!("{}", msg);
/// ```
pub struct DuplicateWorkerIndex {
    pub worker_index: usize,
}

impl Display for DuplicateWorkerIndex {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Duplicate worker index: {}", self.worker_index)
    }
}

impl StructuredLog for DuplicateWorkerIndex {
    fn log(&self) {
        tracing::error!(worker_index = self.worker_index, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::ERROR,
            "span_name",
            name = name,
            worker_index = self.worker_index,
        )
    }
}

/// Topology validation finished with errors.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use the_pipeworks::observability::messages::validation::ValidationFailed;
///
/// let msg = ValidationFailed {
///     worker_count: 4,
///     error_count: 2,
/// };
///
/// tracing::error!("{}", msg);
/// ```
pub struct ValidationFailed {
    pub worker_count: usize,
    pub error_count: usize,
}

impl Display for ValidationFailed {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Topology validation failed: {} errors across {} workers",
            self.error_count, self.worker_count
        )
    }
}

impl StructuredLog for ValidationFailed {
    fn log(&self) {
        tracing::error!(
            worker_count = self.worker_count,
            error_count = self.error_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::ERROR,
            "span_name",
            name = name,
            worker_count = self.worker_count,
            error_count = self.error_count,
        )
    }
}
