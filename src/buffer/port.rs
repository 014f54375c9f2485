// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Worker-side ends of the buffers.
//!
//! An [`OutputPort`] is where a producing worker publishes. It may own a buffer
//! (fan-out: consumers read from it) and may hold writers into buffers owned by
//! consumers (fan-in). An [`InputPort`] is where a consuming worker reads. It
//! has exactly one source, which is either a reader on a producer's buffer or
//! a buffer it owns and lets producers write into.

use super::cell::{Buffer, BufferId, BufferReader, BufferWriter};

/// Publishing end of a worker.
pub struct OutputPort<T> {
    owned: Option<Buffer<T>>,
    targets: Vec<BufferWriter<T>>,
}

impl<T> OutputPort<T> {
    pub fn new() -> Self {
        Self {
            owned: None,
            targets: Vec::new(),
        }
    }

    /// Buffer owned by this port, allocated on first use.
    ///
    /// The port registers itself as the buffer's writer when it allocates it,
    /// so consumers see the buffer close when this port is released.
    pub fn export(&mut self) -> &Buffer<T> {
        let targets = &mut self.targets;
        self.owned.get_or_insert_with(|| {
            let buffer = Buffer::new();
            targets.push(buffer.writer());
            buffer
        })
    }

    pub fn owned_id(&self) -> Option<BufferId> {
        self.owned.as_ref().map(|b| b.id())
    }

    /// Publish into a buffer owned by a consumer.
    pub fn bind(&mut self, writer: BufferWriter<T>) {
        if !self.targets.iter().any(|t| t.buffer_id() == writer.buffer_id()) {
            self.targets.push(writer);
        }
    }

    pub fn is_bound(&self) -> bool {
        !self.targets.is_empty()
    }

    /// Ids of every buffer this port writes to.
    pub fn target_ids(&self) -> Vec<BufferId> {
        self.targets.iter().map(|t| t.buffer_id()).collect()
    }

    /// Drop every writer so downstream buffers can close.
    pub fn release(&mut self) {
        self.targets.clear();
    }
}

impl<T: Clone> OutputPort<T> {
    /// Write `value` into every bound buffer.
    pub fn publish(&self, value: &T) {
        for target in &self.targets {
            target.write(value.clone());
        }
    }
}

impl<T> Default for OutputPort<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Reading end of a worker.
pub struct InputPort<T> {
    owned: Option<Buffer<T>>,
    source: Option<BufferReader<T>>,
}

impl<T> InputPort<T> {
    pub fn new() -> Self {
        Self {
            owned: None,
            source: None,
        }
    }

    /// Buffer owned by this port for fan-in, allocated on first use.
    ///
    /// Returns `None` when the port already reads from a buffer it does not
    /// own, since a consumer has exactly one input buffer.
    pub fn import(&mut self) -> Option<&Buffer<T>> {
        if self.owned.is_none() && self.source.is_some() {
            return None;
        }
        let source = &mut self.source;
        Some(self.owned.get_or_insert_with(|| {
            let buffer = Buffer::new();
            *source = Some(buffer.reader());
            buffer
        }))
    }

    /// Read from a buffer owned by a producer.
    ///
    /// Hands the reader back if the port is already bound.
    pub fn bind(&mut self, reader: BufferReader<T>) -> Result<(), BufferReader<T>> {
        if self.source.is_some() {
            return Err(reader);
        }
        self.source = Some(reader);
        Ok(())
    }

    pub fn is_bound(&self) -> bool {
        self.source.is_some()
    }

    pub fn source_id(&self) -> Option<BufferId> {
        self.source.as_ref().map(|s| s.buffer_id())
    }

    /// Writers currently feeding the source buffer; 0 when unbound.
    pub fn source_writers(&self) -> usize {
        self.source.as_ref().map_or(0, |s| s.live_writers())
    }

    pub fn source_mut(&mut self) -> Option<&mut BufferReader<T>> {
        self.source.as_mut()
    }
}

impl<T> Default for InputPort<T> {
    fn default() -> Self {
        Self::new()
    }
}
