// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Buffers exchanged between workers and the ports that hold them.

pub mod cell;
pub mod port;

pub use cell::{Buffer, BufferId, BufferReader, BufferWriter, ReadPolicy, Received};
pub use port::{InputPort, OutputPort};
