// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Wiring, topology validation and the threaded execution driver.

pub mod pipeline;
pub mod report;
pub mod topology;
pub mod wiring;


pub use pipeline::Pipeline;
pub use report::{PipelineReport, WorkerOutcome, WorkerSummary};
pub use topology::{validate_topology, DependencyGraph, EntryPoints, WorkerNode};
pub use wiring::{connect_consumer_to_producers, connect_output_to_consumers};
