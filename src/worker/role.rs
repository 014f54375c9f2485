// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Role adapters that let one generic [`Worker`](super::Worker) drive any
//! processor role.
//!
//! Each adapter owns the processor, the ports its role needs, and (for
//! output-capable roles) the output slot that persists between iterations.

use std::time::Duration;

use crate::buffer::{BufferId, InputPort, OutputPort, ReadPolicy, Received};
use crate::errors::ProcessorError;
use crate::traits::{InOutProcessor, InputProcessor, OutputProcessor};

/// Which processor role a worker drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleKind {
    Input,
    InOut,
    Output,
}

impl RoleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleKind::Input => "input",
            RoleKind::InOut => "in_out",
            RoleKind::Output => "output",
        }
    }
}

impl std::fmt::Display for RoleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What happened during one iteration of the run loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// `process` was called; `keep_going` is its return value.
    Processed { keep_going: bool },
    /// The input buffer closed and its final value was already consumed.
    EndOfInput,
    /// No input arrived within the idle timeout.
    TimedOut,
}

/// Uniform interface over the three role adapters.
pub trait Role: Send {
    fn kind(&self) -> RoleKind;

    fn processor_name(&self) -> &str;

    /// True when the role consumes input but no input buffer is bound.
    fn missing_input(&self) -> bool;

    fn init(&mut self, args: &str) -> Result<(), ProcessorError>;

    /// Read input (if any), call `process`, publish output (if any).
    fn step(
        &mut self,
        policy: ReadPolicy,
        timeout: Option<Duration>,
    ) -> Result<Step, ProcessorError>;

    fn close(&mut self) -> Result<(), ProcessorError>;

    /// Drop every output writer so downstream buffers can close.
    fn release(&mut self);

    /// Buffer this role reads from, if any.
    fn reads(&self) -> Option<BufferId>;

    /// Writers currently holding the input buffer open.
    fn upstream_writers(&self) -> usize;

    /// Buffers this role writes to.
    fn writes(&self) -> Vec<BufferId>;
}

/// Adapter for [`InputProcessor`]s.
pub struct InputRole<P: InputProcessor> {
    pub(crate) processor: P,
    slot: P::Output,
    pub(crate) output: OutputPort<P::Output>,
}

impl<P: InputProcessor> InputRole<P> {
    pub fn new(processor: P) -> Self {
        Self {
            processor,
            slot: P::Output::default(),
            output: OutputPort::new(),
        }
    }

    pub fn processor(&self) -> &P {
        &self.processor
    }
}

impl<P: InputProcessor> Role for InputRole<P> {
    fn kind(&self) -> RoleKind {
        RoleKind::Input
    }

    fn processor_name(&self) -> &str {
        self.processor.name()
    }

    fn missing_input(&self) -> bool {
        false
    }

    fn init(&mut self, args: &str) -> Result<(), ProcessorError> {
        self.processor.init(args)
    }

    fn step(
        &mut self,
        _policy: ReadPolicy,
        _timeout: Option<Duration>,
    ) -> Result<Step, ProcessorError> {
        let keep_going = self.processor.process(&mut self.slot)?;
        self.output.publish(&self.slot);
        Ok(Step::Processed { keep_going })
    }

    fn close(&mut self) -> Result<(), ProcessorError> {
        self.processor.close()
    }

    fn release(&mut self) {
        self.output.release();
    }

    fn reads(&self) -> Option<BufferId> {
        None
    }

    fn upstream_writers(&self) -> usize {
        0
    }

    fn writes(&self) -> Vec<BufferId> {
        self.output.target_ids()
    }
}

/// Adapter for [`InOutProcessor`]s.
pub struct InOutRole<P: InOutProcessor> {
    pub(crate) processor: P,
    slot: P::Output,
    pub(crate) input: InputPort<P::Input>,
    pub(crate) output: OutputPort<P::Output>,
}

impl<P: InOutProcessor> InOutRole<P> {
    pub fn new(processor: P) -> Self {
        Self {
            processor,
            slot: P::Output::default(),
            input: InputPort::new(),
            output: OutputPort::new(),
        }
    }

    pub fn processor(&self) -> &P {
        &self.processor
    }
}

impl<P: InOutProcessor> Role for InOutRole<P> {
    fn kind(&self) -> RoleKind {
        RoleKind::InOut
    }

    fn processor_name(&self) -> &str {
        self.processor.name()
    }

    fn missing_input(&self) -> bool {
        !self.input.is_bound()
    }

    fn init(&mut self, args: &str) -> Result<(), ProcessorError> {
        self.processor.init(args)
    }

    fn step(
        &mut self,
        policy: ReadPolicy,
        timeout: Option<Duration>,
    ) -> Result<Step, ProcessorError> {
        let received = match self.input.source_mut() {
            Some(source) => source.receive(policy, timeout),
            None => return Ok(Step::EndOfInput),
        };

        match received {
            Received::Value(value) => {
                let keep_going = self.processor.process(&value, &mut self.slot)?;
                self.output.publish(&self.slot);
                Ok(Step::Processed { keep_going })
            }
            Received::Closed => Ok(Step::EndOfInput),
            Received::TimedOut => Ok(Step::TimedOut),
        }
    }

    fn close(&mut self) -> Result<(), ProcessorError> {
        self.processor.close()
    }

    fn release(&mut self) {
        self.output.release();
    }

    fn reads(&self) -> Option<BufferId> {
        self.input.source_id()
    }

    fn upstream_writers(&self) -> usize {
        self.input.source_writers()
    }

    fn writes(&self) -> Vec<BufferId> {
        self.output.target_ids()
    }
}

/// Adapter for [`OutputProcessor`]s.
pub struct OutputRole<P: OutputProcessor> {
    pub(crate) processor: P,
    pub(crate) input: InputPort<P::Input>,
}

impl<P: OutputProcessor> OutputRole<P> {
    pub fn new(processor: P) -> Self {
        Self {
            processor,
            input: InputPort::new(),
        }
    }

    pub fn processor(&self) -> &P {
        &self.processor
    }
}

impl<P: OutputProcessor> Role for OutputRole<P> {
    fn kind(&self) -> RoleKind {
        RoleKind::Output
    }

    fn processor_name(&self) -> &str {
        self.processor.name()
    }

    fn missing_input(&self) -> bool {
        !self.input.is_bound()
    }

    fn init(&mut self, args: &str) -> Result<(), ProcessorError> {
        self.processor.init(args)
    }

    fn step(
        &mut self,
        policy: ReadPolicy,
        timeout: Option<Duration>,
    ) -> Result<Step, ProcessorError> {
        let received = match self.input.source_mut() {
            Some(source) => source.receive(policy, timeout),
            None => return Ok(Step::EndOfInput),
        };

        match received {
            Received::Value(value) => {
                let keep_going = self.processor.process(&value)?;
                Ok(Step::Processed { keep_going })
            }
            Received::Closed => Ok(Step::EndOfInput),
            Received::TimedOut => Ok(Step::TimedOut),
        }
    }

    fn close(&mut self) -> Result<(), ProcessorError> {
        self.processor.close()
    }

    fn release(&mut self) {}

    fn reads(&self) -> Option<BufferId> {
        self.input.source_id()
    }

    fn upstream_writers(&self) -> usize {
        self.input.source_writers()
    }

    fn writes(&self) -> Vec<BufferId> {
        Vec::new()
    }
}
