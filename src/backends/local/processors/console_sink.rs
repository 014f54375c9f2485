// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::ProcessorError;
use crate::observability::DiagnosticSink;
use crate::traits::{OutputProcessor, Processor};

/// Writes every value it receives as `output: <value>`.
pub struct ConsoleSink {
    sink: DiagnosticSink,
    lines: u64,
}

impl ConsoleSink {
    pub fn new(sink: DiagnosticSink) -> Self {
        Self { sink, lines: 0 }
    }

    /// Lines written so far.
    pub fn lines(&self) -> u64 {
        self.lines
    }
}

impl Processor for ConsoleSink {
    fn name(&self) -> &str {
        "console_sink"
    }

    fn close(&mut self) -> Result<(), ProcessorError> {
        tracing::debug!(processor = self.name(), lines = self.lines, "Console sink closed");
        Ok(())
    }
}

impl OutputProcessor for ConsoleSink {
    type Input = String;

    fn process(&mut self, input: &String) -> Result<bool, ProcessorError> {
        self.sink.emit(&format!("output: {}", input))?;
        self.lines += 1;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_prefixed_lines() {
        let sink = DiagnosticSink::in_memory();
        let mut console = ConsoleSink::new(sink.clone());

        console.process(&"101".to_string()).unwrap();
        console.process(&"102".to_string()).unwrap();

        assert_eq!(sink.lines(), vec!["output: 101", "output: 102"]);
        assert_eq!(console.lines(), 2);
    }

    #[test]
    fn test_write_failure_surfaces_as_io_error() {
        struct Broken;

        impl std::io::Write for Broken {
            fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let mut console = ConsoleSink::new(DiagnosticSink::from_writer(Broken));

        let error = console.process(&"1".to_string()).unwrap_err();
        assert!(matches!(error, ProcessorError::Io(_)));
    }
}
