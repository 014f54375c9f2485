// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Wiring capabilities.
//!
//! A worker that publishes values of type `T` is a `Producer<T>`; a worker that
//! reads them is a `Consumer<T>`. The wiring functions only accept peers that
//! agree on `T`, which is what makes a type mismatch a compile error.

use crate::buffer::{InputPort, OutputPort};
use crate::errors::WiringError;

pub trait Producer<T> {
    fn worker_index(&self) -> usize;

    fn processor_name(&self) -> &str;

    /// Output port, or `AlreadyStarted` once the worker has run.
    fn output_port(&mut self) -> Result<&mut OutputPort<T>, WiringError>;
}

pub trait Consumer<T> {
    fn worker_index(&self) -> usize;

    fn processor_name(&self) -> &str;

    /// Input port, or `AlreadyStarted` once the worker has run.
    fn input_port(&mut self) -> Result<&mut InputPort<T>, WiringError>;
}
