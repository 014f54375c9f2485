// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Workers: the thread-bound drivers of processors.

pub mod options;
pub mod role;
pub mod runner;

pub use options::WorkerOptions;
pub use role::{InOutRole, InputRole, OutputRole, Role, RoleKind, Step};
pub use runner::{
    InOutWorker, InputWorker, OutputWorker, StopReason, Worker, WorkerReport, WorkerState,
};
