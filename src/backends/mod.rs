// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Processor implementations shipped with the framework.
//!
//! # Available Backends
//!
//! ## Local Backend
//! In-process processors used by the demonstration pipeline:
//! - **SequenceSource**: counts up from a base value (`i32`)
//! - **OffsetFormatter**: subtracts an offset and renders text (`i32` → `String`)
//! - **ConsoleSink**: prints `output: <value>` through a [`DiagnosticSink`](crate::observability::DiagnosticSink)
//!
//! ## Stub Backend (Test-Only)
//! Processors with observable lifecycles for exercising workers and the
//! driver (only available in test builds):
//! - **StubSource / FailingSource**: bounded, stopping and failing producers
//! - **Collector**: records everything it receives, optionally slowly
//! - **PanickingSink**: panics inside `process`
//!
//! # Examples
//!
//! ```rust
//! use the_pipeworks::backends::local::OffsetFormatter;
//! use the_pipeworks::traits::InOutProcessor;
//!
//! let mut formatter = OffsetFormatter::new(120);
//! let mut out = String::new();
//! formatter.process(&223, &mut out).unwrap();
//! assert_eq!(out, "103");
//! ```

pub mod local;
#[cfg(test)]
pub mod stub;
