// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The worker run loop.
//!
//! A [`Worker`] drives one processor through `init`, a bounded or unbounded
//! series of `process` calls, and `close`. Whatever happens inside the loop,
//! `close` runs exactly once and the worker's output writers are released
//! afterwards, which is how downstream workers learn that this one is done.

use std::panic::{self, AssertUnwindSafe};
use std::thread;

use serde::Serialize;

use super::options::WorkerOptions;
use super::role::{InOutRole, InputRole, OutputRole, Role, Step};
use crate::buffer::{BufferId, InputPort, OutputPort};
use crate::errors::{ProcessorError, WiringError, WorkerError};
use crate::observability::messages::worker::{ProcessorCloseFailed, WorkerStarted, WorkerStopped};
use crate::observability::messages::StructuredLog;
use crate::traits::{Consumer, InOutProcessor, InputProcessor, OutputProcessor, Producer};

/// Lifecycle state of a worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    /// Constructed; may still be wired.
    Created,
    /// Inside `run`.
    Running,
    /// `run` returned. The worker cannot be wired or run again.
    Finished,
}

/// Why a worker left its run loop cleanly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The iteration limit was reached.
    IterationLimit,
    /// `process` returned `false`.
    ProcessorRequested,
    /// The input buffer closed after its last value was consumed.
    UpstreamClosed,
}

impl StopReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            StopReason::IterationLimit => "iteration_limit",
            StopReason::ProcessorRequested => "processor_requested",
            StopReason::UpstreamClosed => "upstream_closed",
        }
    }
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Summary of a clean run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkerReport {
    pub index: usize,
    pub processor: String,
    /// Number of `process` calls.
    pub iterations: u64,
    pub stop_reason: StopReason,
}

/// Drives one processor on behalf of the pipeline.
///
/// Construct one with [`Worker::input`], [`Worker::in_out`] or
/// [`Worker::output`] to match the processor's role. The role decides which
/// wiring calls the worker can take part in.
pub struct Worker<R> {
    index: usize,
    role: R,
    options: WorkerOptions,
    state: WorkerState,
}

pub type InputWorker<P> = Worker<InputRole<P>>;
pub type InOutWorker<P> = Worker<InOutRole<P>>;
pub type OutputWorker<P> = Worker<OutputRole<P>>;

impl<P: InputProcessor> Worker<InputRole<P>> {
    pub fn input(index: usize, processor: P) -> Self {
        Self::with_role(index, InputRole::new(processor))
    }

    pub fn processor(&self) -> &P {
        self.role.processor()
    }
}

impl<P: InOutProcessor> Worker<InOutRole<P>> {
    pub fn in_out(index: usize, processor: P) -> Self {
        Self::with_role(index, InOutRole::new(processor))
    }

    pub fn processor(&self) -> &P {
        self.role.processor()
    }
}

impl<P: OutputProcessor> Worker<OutputRole<P>> {
    pub fn output(index: usize, processor: P) -> Self {
        Self::with_role(index, OutputRole::new(processor))
    }

    pub fn processor(&self) -> &P {
        self.role.processor()
    }
}

impl<R> Worker<R> {
    fn with_role(index: usize, role: R) -> Self {
        Self {
            index,
            role,
            options: WorkerOptions::default(),
            state: WorkerState::Created,
        }
    }

    pub fn with_options(mut self, options: WorkerOptions) -> Self {
        self.options = options;
        self
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn state(&self) -> WorkerState {
        self.state
    }

    pub fn options(&self) -> &WorkerOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut WorkerOptions {
        &mut self.options
    }
}

impl<R: Role> Worker<R> {
    pub fn processor_name(&self) -> &str {
        self.role.processor_name()
    }

    /// Buffer this worker reads from, if any.
    pub fn reads(&self) -> Option<BufferId> {
        self.role.reads()
    }

    /// Buffers this worker publishes to.
    pub fn writes(&self) -> Vec<BufferId> {
        self.role.writes()
    }

    /// Writers currently holding this worker's input buffer open.
    pub fn upstream_writers(&self) -> usize {
        self.role.upstream_writers()
    }

    /// Run the processor until `limit` iterations, a stop request, upstream
    /// close, or an error.
    ///
    /// `limit` of `None` runs until one of the other conditions. `close` is
    /// called exactly once whenever `init` was reached, and output writers are
    /// released on every path.
    pub fn run(&mut self, limit: Option<u64>) -> Result<WorkerReport, WorkerError> {
        if self.state != WorkerState::Created {
            return Err(WorkerError::AlreadyRun {
                worker_index: self.index,
                processor: self.role.processor_name().to_string(),
            });
        }
        self.state = WorkerState::Running;

        let processor = self.role.processor_name().to_string();
        let started = WorkerStarted {
            worker_index: self.index,
            processor: &processor,
            role: self.role.kind().as_str(),
            limit,
        };
        let span = started.span("worker_run");
        let _guard = span.enter();
        started.log();

        if self.role.missing_input() {
            self.finish();
            return Err(WorkerError::InputNotBound {
                worker_index: self.index,
                processor,
            });
        }

        let outcome = self.drive(limit, &processor);
        let closed = self.close_processor(&processor);
        self.finish();

        match (outcome, closed) {
            (Ok((iterations, stop_reason)), Ok(())) => {
                WorkerStopped {
                    worker_index: self.index,
                    processor: &processor,
                    iterations,
                    stop_reason: stop_reason.as_str(),
                }
                .log();
                Ok(WorkerReport {
                    index: self.index,
                    processor,
                    iterations,
                    stop_reason,
                })
            }
            (Ok(_), Err(close_error)) => Err(close_error),
            (Err(error), Ok(())) => Err(error),
            (Err(error), Err(close_error)) => {
                ProcessorCloseFailed {
                    worker_index: self.index,
                    processor: &processor,
                    error: &close_error,
                }
                .log();
                Err(error)
            }
        }
    }

    fn drive(
        &mut self,
        limit: Option<u64>,
        processor: &str,
    ) -> Result<(u64, StopReason), WorkerError> {
        let init_args = self.options.init_args.clone();
        let role = &mut self.role;
        match panic::catch_unwind(AssertUnwindSafe(|| role.init(&init_args))) {
            Ok(Ok(())) => {}
            Ok(Err(source)) => {
                return Err(WorkerError::Init {
                    worker_index: self.index,
                    processor: processor.to_string(),
                    source,
                })
            }
            Err(payload) => return Err(self.panicked(processor, payload.as_ref())),
        }

        let policy = self.options.read_policy;
        let idle_timeout = self.options.idle_timeout;
        let pacing = self.options.pacing;
        let mut iterations: u64 = 0;

        loop {
            if limit.is_some_and(|limit| iterations >= limit) {
                return Ok((iterations, StopReason::IterationLimit));
            }

            let role = &mut self.role;
            let step = panic::catch_unwind(AssertUnwindSafe(|| role.step(policy, idle_timeout)));

            match step {
                Ok(Ok(Step::Processed { keep_going })) => {
                    iterations += 1;
                    if !keep_going {
                        return Ok((iterations, StopReason::ProcessorRequested));
                    }
                    let more_to_do = limit.map_or(true, |limit| iterations < limit);
                    if let (Some(delay), true) = (pacing, more_to_do) {
                        thread::sleep(delay);
                    }
                }
                Ok(Ok(Step::EndOfInput)) => return Ok((iterations, StopReason::UpstreamClosed)),
                Ok(Ok(Step::TimedOut)) => {
                    return Err(WorkerError::InputTimedOut {
                        worker_index: self.index,
                        processor: processor.to_string(),
                        timeout: idle_timeout.unwrap_or_default(),
                    })
                }
                Ok(Err(source)) => {
                    return Err(WorkerError::Processing {
                        worker_index: self.index,
                        processor: processor.to_string(),
                        iteration: iterations + 1,
                        source,
                    })
                }
                Err(payload) => return Err(self.panicked(processor, payload.as_ref())),
            }
        }
    }

    fn close_processor(&mut self, processor: &str) -> Result<(), WorkerError> {
        let role = &mut self.role;
        let closed: Result<(), ProcessorError> =
            match panic::catch_unwind(AssertUnwindSafe(|| role.close())) {
                Ok(result) => result,
                Err(payload) => Err(ProcessorError::failed(format!(
                    "close panicked: {}",
                    WorkerError::panic_message(payload.as_ref())
                ))),
            };

        closed.map_err(|source| WorkerError::Close {
            worker_index: self.index,
            processor: processor.to_string(),
            source,
        })
    }

    fn panicked(&self, processor: &str, payload: &(dyn std::any::Any + Send)) -> WorkerError {
        WorkerError::Panicked {
            worker_index: self.index,
            processor: processor.to_string(),
            message: WorkerError::panic_message(payload),
        }
    }

    fn finish(&mut self) {
        self.role.release();
        self.state = WorkerState::Finished;
    }

    fn ensure_wirable(&self) -> Result<(), WiringError> {
        if self.state == WorkerState::Created {
            Ok(())
        } else {
            Err(WiringError::AlreadyStarted {
                worker_index: self.index,
                processor: self.role.processor_name().to_string(),
            })
        }
    }
}

impl<P: InputProcessor> Producer<P::Output> for Worker<InputRole<P>> {
    fn worker_index(&self) -> usize {
        self.index
    }

    fn processor_name(&self) -> &str {
        self.role.processor_name()
    }

    fn output_port(&mut self) -> Result<&mut OutputPort<P::Output>, WiringError> {
        self.ensure_wirable()?;
        Ok(&mut self.role.output)
    }
}

impl<P: InOutProcessor> Producer<P::Output> for Worker<InOutRole<P>> {
    fn worker_index(&self) -> usize {
        self.index
    }

    fn processor_name(&self) -> &str {
        self.role.processor_name()
    }

    fn output_port(&mut self) -> Result<&mut OutputPort<P::Output>, WiringError> {
        self.ensure_wirable()?;
        Ok(&mut self.role.output)
    }
}

impl<P: InOutProcessor> Consumer<P::Input> for Worker<InOutRole<P>> {
    fn worker_index(&self) -> usize {
        self.index
    }

    fn processor_name(&self) -> &str {
        self.role.processor_name()
    }

    fn input_port(&mut self) -> Result<&mut InputPort<P::Input>, WiringError> {
        self.ensure_wirable()?;
        Ok(&mut self.role.input)
    }
}

impl<P: OutputProcessor> Consumer<P::Input> for Worker<OutputRole<P>> {
    fn worker_index(&self) -> usize {
        self.index
    }

    fn processor_name(&self) -> &str {
        self.role.processor_name()
    }

    fn input_port(&mut self) -> Result<&mut InputPort<P::Input>, WiringError> {
        self.ensure_wirable()?;
        Ok(&mut self.role.input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::stub::{
        Collector, Doubler, FailingSource, Lifecycle, PanickingSink, StubSource,
    };
    use crate::buffer::{Buffer, ReadPolicy};
    use std::time::Duration;

    #[test]
    fn test_bounded_run_calls_lifecycle_exactly() {
        let lifecycle = Lifecycle::default();
        let mut worker = Worker::input(0, StubSource::new(lifecycle.clone()));

        let report = worker.run(Some(5)).unwrap();

        assert_eq!(report.iterations, 5);
        assert_eq!(report.stop_reason, StopReason::IterationLimit);
        assert_eq!(lifecycle.inits(), 1);
        assert_eq!(lifecycle.processes(), 5);
        assert_eq!(lifecycle.closes(), 1);
        assert_eq!(worker.state(), WorkerState::Finished);
    }

    #[test]
    fn test_zero_limit_still_initializes_and_closes() {
        let lifecycle = Lifecycle::default();
        let mut worker = Worker::input(0, StubSource::new(lifecycle.clone()));

        let report = worker.run(Some(0)).unwrap();

        assert_eq!(report.iterations, 0);
        assert_eq!(lifecycle.inits(), 1);
        assert_eq!(lifecycle.processes(), 0);
        assert_eq!(lifecycle.closes(), 1);
    }

    #[test]
    fn test_processor_stop_request_ends_run() {
        let lifecycle = Lifecycle::default();
        let mut worker = Worker::input(0, StubSource::new(lifecycle.clone()).stop_after(3));

        let report = worker.run(Some(10)).unwrap();

        assert_eq!(report.iterations, 3);
        assert_eq!(report.stop_reason, StopReason::ProcessorRequested);
        assert_eq!(lifecycle.processes(), 3);
        assert_eq!(lifecycle.closes(), 1);
    }

    #[test]
    fn test_final_value_published_on_stop_request() {
        let lifecycle = Lifecycle::default();
        let mut worker = Worker::input(0, StubSource::new(lifecycle).stop_after(3));
        let buffer = worker.output_port().unwrap().export().reader();

        worker.run(None).unwrap();

        assert_eq!(buffer.read(), Some(3));
    }

    #[test]
    fn test_process_failure_still_closes() {
        let lifecycle = Lifecycle::default();
        let mut worker = Worker::input(4, FailingSource::new(lifecycle.clone(), 2));

        let error = worker.run(Some(10)).unwrap_err();

        assert!(matches!(
            error,
            WorkerError::Processing { worker_index: 4, iteration: 2, .. }
        ));
        assert_eq!(lifecycle.processes(), 2);
        assert_eq!(lifecycle.closes(), 1);
    }

    #[test]
    fn test_init_failure_skips_process_but_closes() {
        let lifecycle = Lifecycle::default();
        let mut worker = Worker::input(0, StubSource::new(lifecycle.clone()))
            .with_options(WorkerOptions::default().with_init_args("fail"));

        let error = worker.run(Some(10)).unwrap_err();

        assert!(matches!(error, WorkerError::Init { .. }));
        assert_eq!(lifecycle.processes(), 0);
        assert_eq!(lifecycle.closes(), 1);
    }

    #[test]
    fn test_panic_in_process_is_contained() {
        let lifecycle = Lifecycle::default();
        let producer = Buffer::new();
        let mut worker = Worker::output(1, PanickingSink::new(lifecycle.clone()));
        worker.input_port().unwrap().bind(producer.reader()).ok();
        producer.write(7);

        let error = worker.run(Some(3)).unwrap_err();

        match error {
            WorkerError::Panicked { worker_index, message, .. } => {
                assert_eq!(worker_index, 1);
                assert!(message.contains("refusing 7"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(lifecycle.closes(), 1);
    }

    #[test]
    fn test_second_run_rejected() {
        let mut worker = Worker::input(0, StubSource::new(Lifecycle::default()));
        worker.run(Some(1)).unwrap();

        assert!(matches!(worker.run(Some(1)), Err(WorkerError::AlreadyRun { .. })));
    }

    #[test]
    fn test_unbound_consumer_fails_before_init() {
        let collector = Collector::<i32>::default();
        let lifecycle = collector.lifecycle();
        let mut worker = Worker::output(2, collector);

        let error = worker.run(Some(1)).unwrap_err();

        assert!(matches!(error, WorkerError::InputNotBound { worker_index: 2, .. }));
        assert_eq!(lifecycle.inits(), 0);
        assert_eq!(lifecycle.closes(), 0);
    }

    #[test]
    fn test_consumer_stops_when_upstream_closes() {
        let producer = Buffer::new();
        let writer = producer.writer();
        let collector = Collector::<i32>::default();
        let seen = collector.values();
        let mut worker = Worker::output(1, collector);
        worker.input_port().unwrap().bind(producer.reader()).ok();

        writer.write(42);
        drop(writer);

        let report = worker.run(None).unwrap();

        assert_eq!(report.stop_reason, StopReason::UpstreamClosed);
        assert_eq!(report.iterations, 1);
        assert_eq!(*seen.lock().unwrap(), vec![42]);
    }

    #[test]
    fn test_in_out_worker_transforms_and_publishes() {
        let producer = Buffer::new();
        let writer = producer.writer();
        let mut worker = Worker::in_out(1, Doubler);
        worker.input_port().unwrap().bind(producer.reader()).ok();
        let downstream = worker.output_port().unwrap().export().reader();

        writer.write(21);
        drop(writer);
        worker.run(None).unwrap();

        assert_eq!(downstream.read(), Some(42));
    }

    #[test]
    fn test_idle_timeout_fails_stalled_consumer() {
        let producer: Buffer<i32> = Buffer::new();
        let _writer = producer.writer();
        let collector = Collector::<i32>::default();
        let lifecycle = collector.lifecycle();
        let mut worker = Worker::output(3, collector).with_options(
            WorkerOptions::default().with_idle_timeout(Duration::from_millis(20)),
        );
        worker.input_port().unwrap().bind(producer.reader()).ok();

        let error = worker.run(None).unwrap_err();

        assert!(matches!(error, WorkerError::InputTimedOut { worker_index: 3, .. }));
        assert_eq!(lifecycle.closes(), 1);
    }

    #[test]
    fn test_run_releases_output_writers() {
        let mut worker = Worker::input(0, StubSource::new(Lifecycle::default()));
        let exported = worker.output_port().unwrap().export().reader();
        let mut downstream = exported;

        worker.run(Some(2)).unwrap();

        assert_eq!(downstream.receive(ReadPolicy::Fresh, None), crate::buffer::Received::Value(2));
        assert_eq!(downstream.receive(ReadPolicy::Fresh, None), crate::buffer::Received::Closed);
    }

    #[test]
    fn test_wiring_rejected_after_run() {
        let mut worker = Worker::input(0, StubSource::new(Lifecycle::default()));
        worker.run(Some(1)).unwrap();

        assert!(matches!(
            worker.output_port(),
            Err(WiringError::AlreadyStarted { worker_index: 0, .. })
        ));
    }

    #[test]
    fn test_init_receives_configured_args() {
        let lifecycle = Lifecycle::default();
        let mut worker = Worker::input(0, StubSource::new(lifecycle.clone()))
            .with_options(WorkerOptions::default().with_init_args("warmup"));

        worker.run(Some(1)).unwrap();

        assert_eq!(lifecycle.last_init_args(), "warmup");
    }
}
