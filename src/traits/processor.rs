// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Processor roles.
//!
//! Every processor implements the [`Processor`] base trait (name and
//! lifecycle hooks) plus exactly one role trait describing what it exchanges
//! with the pipeline:
//!
//! ```text
//! InputProcessor   ──Output──►                  pipeline input stage
//! InOutProcessor   ──Input──► [ ] ──Output──►   intermediate stage
//! OutputProcessor  ──Input──►                   pipeline output stage
//! ```
//!
//! `process` returns `Ok(true)` to keep going and `Ok(false)` to request a
//! clean stop. Output-capable roles write into a slot owned by their worker;
//! the slot keeps its value between calls and is published after every
//! successful call.
//!
//! Processors know nothing about threads or buffers, so they can be driven
//! directly in tests:
//!
//! ```rust
//! use the_pipeworks::errors::ProcessorError;
//! use the_pipeworks::traits::{InOutProcessor, Processor};
//!
//! struct Halve;
//!
//! impl Processor for Halve {
//!     fn name(&self) -> &str {
//!         "halve"
//!     }
//! }
//!
//! impl InOutProcessor for Halve {
//!     type Input = i32;
//!     type Output = i32;
//!
//!     fn process(&mut self, input: &i32, output: &mut i32) -> Result<bool, ProcessorError> {
//!         *output = input / 2;
//!         Ok(true)
//!     }
//! }
//!
//! let mut halve = Halve;
//! let mut out = 0;
//! assert!(halve.process(&10, &mut out).unwrap());
//! assert_eq!(out, 5);
//! ```

use crate::errors::ProcessorError;

/// Lifecycle shared by every processor role.
///
/// `init` runs once before the first `process` call and `close` runs once
/// after the last one, on every exit path.
pub trait Processor: Send {
    /// Diagnostic identifier.
    fn name(&self) -> &str;

    /// Receives the worker's init argument string (empty when not configured).
    fn init(&mut self, _args: &str) -> Result<(), ProcessorError> {
        Ok(())
    }

    fn close(&mut self) -> Result<(), ProcessorError> {
        Ok(())
    }
}

/// Produces one typed stream; reads nothing from the pipeline.
pub trait InputProcessor: Processor {
    type Output: Clone + Default + Send + 'static;

    fn process(&mut self, output: &mut Self::Output) -> Result<bool, ProcessorError>;
}

/// Consumes one typed stream and produces another, possibly of a different type.
pub trait InOutProcessor: Processor {
    type Input: Clone + Send + 'static;
    type Output: Clone + Default + Send + 'static;

    fn process(
        &mut self,
        input: &Self::Input,
        output: &mut Self::Output,
    ) -> Result<bool, ProcessorError>;
}

/// Consumes one typed stream; publishes nothing.
pub trait OutputProcessor: Processor {
    type Input: Clone + Send + 'static;

    fn process(&mut self, input: &Self::Input) -> Result<bool, ProcessorError>;
}
