// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod ports;
pub mod processor;

pub use ports::{Consumer, Producer};
pub use processor::{InOutProcessor, InputProcessor, OutputProcessor, Processor};
