// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use super::parse_i32_arg;
use crate::errors::ProcessorError;
use crate::traits::{InOutProcessor, Processor};

/// Subtracts a fixed offset and renders the result as text.
///
/// A non-empty init argument replaces the offset.
pub struct OffsetFormatter {
    offset: i32,
}

impl OffsetFormatter {
    pub fn new(offset: i32) -> Self {
        Self { offset }
    }

    pub fn offset(&self) -> i32 {
        self.offset
    }
}

impl Processor for OffsetFormatter {
    fn name(&self) -> &str {
        "offset_formatter"
    }

    fn init(&mut self, args: &str) -> Result<(), ProcessorError> {
        if let Some(offset) = parse_i32_arg("offset", args)? {
            self.offset = offset;
        }
        Ok(())
    }
}

impl InOutProcessor for OffsetFormatter {
    type Input = i32;
    type Output = String;

    fn process(&mut self, input: &i32, output: &mut String) -> Result<bool, ProcessorError> {
        let value = input.checked_sub(self.offset).ok_or_else(|| {
            ProcessorError::failed(format!("{} - {} overflows i32", input, self.offset))
        })?;
        *output = value.to_string();
        Ok(true)
    }
}
