// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod config;
mod execution;
mod processor;
mod wiring;

pub use config::{ConfigError, ValidationError};
pub use execution::{ExecutionError, WorkerError};
pub use processor::ProcessorError;
pub use wiring::WiringError;
