// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and diagnostic output.
//!
//! This module provides centralized message types for all diagnostic and
//! operational logging in the pipeline framework. Message types follow a
//! struct-based pattern with a `Display` implementation so that log text lives
//! in one place instead of being scattered through the workers and driver.
//!
//! # Architecture
//!
//! Messages are organized by subsystem:
//! * `messages::worker` - Worker run lifecycle (start, stop, failure, close)
//! * `messages::engine` - Pipeline driver lifecycle and thread management
//! * `messages::validation` - Topology validation errors
//! * `messages::wiring` - Buffer connections made before execution
//!
//! Console output produced by processors goes through [`sink::DiagnosticSink`],
//! a shared handle that serializes whole lines across worker threads.
//!
//! # Usage
//!
//! ```rust
//! use the_pipeworks::observability::messages::worker::WorkerStarted;
//!
//! let msg = WorkerStarted {
//!     worker_index: 0,
//!     processor: "sequence_source",
//!     role: "input",
//!     limit: Some(100),
//! };
//!
//! tracing::info!("{}", msg);
//! ```

pub mod messages;
pub mod sink;

pub use sink::DiagnosticSink;
