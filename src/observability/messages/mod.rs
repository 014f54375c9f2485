// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each message type implements `Display` for human-readable output and
//! [`StructuredLog`] to emit itself as a `tracing` event with typed fields.
//!
//! # Organization
//!
//! * `engine` - Pipeline driver lifecycle and thread management
//! * `validation` - Topology validation errors
//! * `wiring` - Buffer connections
//! * `worker` - Worker run lifecycle
//!
//! # Usage Pattern
//!
//! ```rust
//! use the_pipeworks::observability::messages::engine::PipelineStarted;
//! use the_pipeworks::observability::messages::StructuredLog;
//!
//! let msg = PipelineStarted {
//!     worker_count: 4,
//!     thread_name_prefix: "worker",
//! };
//!
//! let span = msg.span("pipeline_run");
//! let _guard = span.enter();
//! msg.log();
//! ```

use tracing::Span;

pub mod engine;
pub mod validation;
pub mod wiring;
pub mod worker;

/// A message that knows its own log level and structured fields.
pub trait StructuredLog {
    /// Emit the message as a `tracing` event at its documented level.
    fn log(&self);

    /// Build a span carrying the message's fields.
    fn span(&self, name: &str) -> Span;
}
