// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Configuration errors surfaced synchronously by the wiring functions.

use thiserror::Error;

/// Errors returned while binding buffers between workers.
///
/// Type mismatches never reach this enum: `Producer<T>` and `Consumer<T>` must
/// agree on `T` for the wiring call to compile at all.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WiringError {
    /// The consumer already reads from a different buffer.
    #[error("Worker {worker_index} ({processor}) already has a bound input buffer")]
    InputAlreadyBound {
        worker_index: usize,
        processor: String,
    },

    /// The worker has already been run; its topology is frozen.
    #[error("Worker {worker_index} ({processor}) has already started and can no longer be wired")]
    AlreadyStarted {
        worker_index: usize,
        processor: String,
    },

    /// Fan-out was requested with an empty consumer list.
    #[error("Worker {worker_index} has no consumers to connect to")]
    NoConsumers { worker_index: usize },

    /// Fan-in was requested with an empty producer list.
    #[error("Worker {worker_index} has no producers to connect to")]
    NoProducers { worker_index: usize },
}
