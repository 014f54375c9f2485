// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Shared, line-serialized diagnostic output.
//!
//! Worker threads that print through the same [`DiagnosticSink`] never
//! interleave within a line. The lock is held only for the duration of one
//! write, never across a processor's `process` call.

use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

type SharedWriter = Arc<Mutex<Box<dyn Write + Send>>>;

/// Cloneable handle to a shared writer.
#[derive(Clone)]
pub struct DiagnosticSink {
    writer: SharedWriter,
    captured: Option<Arc<Mutex<Vec<u8>>>>,
}

impl DiagnosticSink {
    /// Sink over the process's standard output.
    pub fn stdout() -> Self {
        Self::from_writer(io::stdout())
    }

    pub fn from_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Arc::new(Mutex::new(Box::new(writer))),
            captured: None,
        }
    }

    /// Sink that collects everything in memory; see [`DiagnosticSink::contents`].
    pub fn in_memory() -> Self {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        Self {
            writer: Arc::new(Mutex::new(Box::new(Capture(Arc::clone(&buffer))))),
            captured: Some(buffer),
        }
    }

    /// Write one line and flush.
    pub fn emit(&self, line: &str) -> io::Result<()> {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        writeln!(writer, "{}", line)?;
        writer.flush()
    }

    /// Everything emitted so far, for in-memory sinks. Empty otherwise.
    pub fn contents(&self) -> String {
        match &self.captured {
            Some(buffer) => {
                let bytes = buffer.lock().unwrap_or_else(PoisonError::into_inner);
                String::from_utf8_lossy(&bytes).into_owned()
            }
            None => String::new(),
        }
    }

    /// Emitted lines, for in-memory sinks.
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }
}

impl fmt::Debug for DiagnosticSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticSink")
            .field("in_memory", &self.captured.is_some())
            .finish()
    }
}

struct Capture(Arc<Mutex<Vec<u8>>>);

impl Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_in_memory_sink_captures_lines() {
        let sink = DiagnosticSink::in_memory();
        sink.emit("output: 101").unwrap();
        sink.emit("output: 102").unwrap();

        assert_eq!(sink.lines(), vec!["output: 101", "output: 102"]);
    }

    #[test]
    fn test_clones_share_one_writer() {
        let sink = DiagnosticSink::in_memory();
        let clone = sink.clone();
        clone.emit("from clone").unwrap();

        assert_eq!(sink.contents(), "from clone\n");
    }

    #[test]
    fn test_concurrent_emits_never_interleave_within_a_line() {
        let sink = DiagnosticSink::in_memory();
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let sink = sink.clone();
                thread::spawn(move || {
                    for i in 0..100 {
                        sink.emit(&format!("thread-{}-line-{}", t, i)).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let lines = sink.lines();
        assert_eq!(lines.len(), 400);
        for line in lines {
            let parts: Vec<_> = line.split('-').collect();
            assert_eq!(parts.len(), 4, "torn line: {}", line);
            assert_eq!(parts[0], "thread");
            assert_eq!(parts[2], "line");
        }
    }

    #[test]
    fn test_writer_backed_sink_has_no_captured_contents() {
        let sink = DiagnosticSink::from_writer(io::sink());
        sink.emit("discarded").unwrap();

        assert!(sink.contents().is_empty());
    }
}
