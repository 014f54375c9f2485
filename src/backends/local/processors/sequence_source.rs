// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use super::parse_i32_arg;
use crate::errors::ProcessorError;
use crate::traits::{InputProcessor, Processor};

/// Counts up from a base value: emits `base + 1`, `base + 2`, ...
///
/// A non-empty init argument replaces the base.
pub struct SequenceSource {
    current: i32,
}

impl SequenceSource {
    pub fn new(base: i32) -> Self {
        Self { current: base }
    }

    /// Last value emitted, or the base before the first call.
    pub fn current(&self) -> i32 {
        self.current
    }
}

impl Processor for SequenceSource {
    fn name(&self) -> &str {
        "sequence_source"
    }

    fn init(&mut self, args: &str) -> Result<(), ProcessorError> {
        if let Some(base) = parse_i32_arg("base", args)? {
            tracing::debug!(
                processor = self.name(),
                base,
                "Overriding sequence base from init args"
            );
            self.current = base;
        }
        Ok(())
    }
}

impl InputProcessor for SequenceSource {
    type Output = i32;

    fn process(&mut self, output: &mut i32) -> Result<bool, ProcessorError> {
        self.current = self
            .current
            .checked_add(1)
            .ok_or_else(|| ProcessorError::failed("sequence overflowed i32"))?;
        *output = self.current;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_up_from_base() {
        let mut source = SequenceSource::new(220);
        let mut out = 0;

        let emitted: Vec<i32> = (0..3)
            .map(|_| {
                source.process(&mut out).unwrap();
                out
            })
            .collect();

        assert_eq!(emitted, vec![221, 222, 223]);
    }

    #[test]
    fn test_init_args_override_base() {
        let mut source = SequenceSource::new(220);
        source.init(" 10 ").unwrap();
        let mut out = 0;
        source.process(&mut out).unwrap();

        assert_eq!(out, 11);
    }

    #[test]
    fn test_empty_init_args_keep_base() {
        let mut source = SequenceSource::new(5);
        source.init("").unwrap();

        assert_eq!(source.current(), 5);
    }

    #[test]
    fn test_bad_init_args_rejected() {
        let mut source = SequenceSource::new(0);

        let error = source.init("twenty").unwrap_err();
        assert!(matches!(
            error,
            ProcessorError::InvalidArgument { ref argument, .. } if argument == "base"
        ));
    }

    #[test]
    fn test_overflow_is_an_error() {
        let mut source = SequenceSource::new(i32::MAX);
        let mut out = 0;

        assert!(source.process(&mut out).is_err());
    }
}
