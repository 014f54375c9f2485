// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod console_sink;
pub mod offset_formatter;
pub mod sequence_source;

pub use console_sink::*;
pub use offset_formatter::*;
pub use sequence_source::*;

use crate::errors::ProcessorError;

/// Parse an optional integer init argument; empty means "keep the default".
fn parse_i32_arg(argument: &str, args: &str) -> Result<Option<i32>, ProcessorError> {
    let trimmed = args.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<i32>()
        .map(Some)
        .map_err(|e| ProcessorError::InvalidArgument {
            argument: argument.to_string(),
            reason: format!("'{}' is not an integer: {}", trimmed, e),
        })
}
