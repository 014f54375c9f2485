// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The execution driver: one OS thread per worker.
//!
//! # Execution Flow
//!
//! 1. **Validation**: derive the topology from the wired buffers and reject
//!    duplicates, readers without writers, and cycles
//! 2. **Spawn**: move each worker into a named thread (`{prefix}-{index}`)
//! 3. **Join**: wait for every thread and record its outcome
//!
//! Nothing is re-thrown at join time. A failed worker releases its output
//! writers like any other, so downstream workers see their input close and
//! stop on their own; the failure itself ends up in the [`PipelineReport`].
//!
//! # Example
//!
//! ```rust
//! use the_pipeworks::backends::local::processors::{ConsoleSink, OffsetFormatter, SequenceSource};
//! use the_pipeworks::engine::{connect_consumer_to_producers, connect_output_to_consumers, Pipeline};
//! use the_pipeworks::observability::DiagnosticSink;
//! use the_pipeworks::worker::Worker;
//!
//! let console = DiagnosticSink::in_memory();
//! let mut w0 = Worker::input(0, SequenceSource::new(220));
//! let mut w1 = Worker::in_out(1, OffsetFormatter::new(120));
//! let mut w2 = Worker::in_out(2, OffsetFormatter::new(120));
//! let mut w3 = Worker::output(3, ConsoleSink::new(console.clone()));
//!
//! connect_output_to_consumers(&mut w0, &mut [&mut w1, &mut w2]).unwrap();
//! connect_consumer_to_producers(&mut w3, &mut [&mut w1, &mut w2]).unwrap();
//!
//! let mut pipeline = Pipeline::new();
//! pipeline.add(w0, Some(3)).add(w1, None).add(w2, None).add(w3, None);
//!
//! let report = pipeline.run().unwrap();
//! assert!(report.is_success());
//! assert_eq!(console.lines().last().map(String::as_str), Some("output: 103"));
//! ```

use std::thread;
use std::time::Instant;

use crate::config::PipelineConfig;
use crate::engine::report::{PipelineReport, WorkerOutcome};
use crate::engine::topology::{validate_topology, EntryPoints, WorkerNode};
use crate::errors::{ExecutionError, ValidationError, WorkerError};
use crate::observability::messages::engine::{
    PipelineCompleted, PipelineStarted, ThreadSpawnFailed, WorkerJoinFailed,
};
use crate::observability::messages::worker::WorkerFailed;
use crate::observability::messages::StructuredLog;
use crate::worker::{Role, Worker, WorkerReport};

/// Type-erased worker the driver can move into a thread.
trait Runnable: Send {
    fn index(&self) -> usize;

    fn processor_name(&self) -> String;

    fn node(&self) -> WorkerNode;

    fn execute(&mut self, limit: Option<u64>) -> Result<WorkerReport, WorkerError>;
}

impl<R: Role + 'static> Runnable for Worker<R> {
    fn index(&self) -> usize {
        Worker::index(self)
    }

    fn processor_name(&self) -> String {
        Worker::processor_name(self).to_string()
    }

    fn node(&self) -> WorkerNode {
        WorkerNode::new(Worker::index(self), self.reads(), self.writes())
            .with_upstream_writers(self.upstream_writers())
    }

    fn execute(&mut self, limit: Option<u64>) -> Result<WorkerReport, WorkerError> {
        self.run(limit)
    }
}

struct Scheduled {
    worker: Box<dyn Runnable>,
    limit: Option<u64>,
}

/// A set of wired workers and the settings to run them with.
#[derive(Default)]
pub struct Pipeline {
    config: PipelineConfig,
    scheduled: Vec<Scheduled>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pipeline whose workers pick up settings from `config` as they are added.
    pub fn from_config(config: PipelineConfig) -> Self {
        Self {
            config,
            scheduled: Vec::new(),
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Schedule `worker` to run for at most `limit` iterations.
    ///
    /// Configuration matching the worker's index is applied to its options
    /// here. An explicit `limit` wins over a configured `iterations`; with
    /// neither, the worker runs until it stops on its own.
    pub fn add<R: Role + 'static>(
        &mut self,
        mut worker: Worker<R>,
        limit: Option<u64>,
    ) -> &mut Self {
        let index = worker.index();
        self.config.apply_to(index, worker.options_mut());
        let limit = limit.or_else(|| self.config.iterations(index));
        self.scheduled.push(Scheduled {
            worker: Box::new(worker),
            limit,
        });
        self
    }

    pub fn len(&self) -> usize {
        self.scheduled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scheduled.is_empty()
    }

    fn nodes(&self) -> Vec<WorkerNode> {
        self.scheduled.iter().map(|s| s.worker.node()).collect()
    }

    /// Check the wired topology without running anything.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        validate_topology(&self.nodes())
    }

    /// Workers with no input.
    pub fn entry_points(&self) -> EntryPoints {
        EntryPoints::from_nodes(&self.nodes())
    }

    /// Validate, spawn one thread per worker, and join them all.
    ///
    /// Returns `Err` only when nothing could run (invalid topology) or a
    /// thread could not be spawned. Worker failures are in the report.
    pub fn run(self) -> Result<PipelineReport, ExecutionError> {
        self.validate().map_err(ExecutionError::InvalidTopology)?;

        let executor = &self.config.executor_options;
        let prefix = executor.thread_name_prefix().to_string();
        let stack_size = executor.stack_size;
        let worker_count = self.scheduled.len();

        let started = PipelineStarted {
            worker_count,
            thread_name_prefix: &prefix,
        };
        let span = started.span("pipeline_run");
        let _guard = span.enter();
        started.log();
        let started_at = Instant::now();

        let mut handles = Vec::with_capacity(worker_count);
        let mut spawn_error = None;

        for Scheduled { mut worker, limit } in self.scheduled {
            if spawn_error.is_some() {
                // Dropping an unstarted worker releases its writers, so
                // anything already running downstream of it can finish.
                drop(worker);
                continue;
            }

            let index = worker.index();
            let processor = worker.processor_name();
            let thread_name = format!("{}-{}", prefix, index);
            let mut builder = thread::Builder::new().name(thread_name.clone());
            if let Some(size) = stack_size {
                builder = builder.stack_size(size);
            }

            let parent = span.clone();
            match builder.spawn(move || parent.in_scope(|| worker.execute(limit))) {
                Ok(handle) => handles.push((index, processor, handle)),
                Err(source) => {
                    ThreadSpawnFailed {
                        worker_index: index,
                        thread_name: &thread_name,
                        error: &source,
                    }
                    .log();
                    spawn_error = Some(ExecutionError::Spawn {
                        worker_index: index,
                        source,
                    });
                }
            }
        }

        let mut outcomes = Vec::with_capacity(handles.len());
        for (index, processor, handle) in handles {
            let result = match handle.join() {
                Ok(result) => result,
                Err(payload) => {
                    let message = WorkerError::panic_message(payload.as_ref());
                    WorkerJoinFailed {
                        worker_index: index,
                        message: &message,
                    }
                    .log();
                    Err(WorkerError::Panicked {
                        worker_index: index,
                        processor: processor.clone(),
                        message,
                    })
                }
            };

            if let Err(error) = &result {
                WorkerFailed {
                    worker_index: index,
                    error,
                }
                .log();
            }

            outcomes.push(WorkerOutcome {
                index,
                processor,
                result,
            });
        }

        if let Some(error) = spawn_error {
            return Err(error);
        }

        let report = PipelineReport::new(outcomes, started_at.elapsed());
        PipelineCompleted {
            worker_count,
            failed_count: report.failures().len(),
            duration: report.duration(),
        }
        .log();
        Ok(report)
    }
}
