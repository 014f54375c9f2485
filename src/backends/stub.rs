// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Test processors with observable lifecycles.

use std::marker::PhantomData;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::errors::ProcessorError;
use crate::traits::{InOutProcessor, InputProcessor, OutputProcessor, Processor};

/// Shared counters for `init`, `process` and `close` calls.
#[derive(Clone, Default)]
pub struct Lifecycle {
    inits: Arc<AtomicUsize>,
    processes: Arc<AtomicUsize>,
    closes: Arc<AtomicUsize>,
    init_args: Arc<Mutex<String>>,
}

impl Lifecycle {
    pub fn inits(&self) -> usize {
        self.inits.load(Ordering::SeqCst)
    }

    pub fn processes(&self) -> usize {
        self.processes.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    pub fn last_init_args(&self) -> String {
        self.init_args.lock().unwrap().clone()
    }

    fn record_init(&self, args: &str) {
        self.inits.fetch_add(1, Ordering::SeqCst);
        *self.init_args.lock().unwrap() = args.to_string();
    }

    fn record_process(&self) -> usize {
        self.processes.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn record_close(&self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}

/// Emits 1, 2, 3, ... and fails `init` when given `"fail"`.
pub struct StubSource {
    lifecycle: Lifecycle,
    count: i32,
    stop_after: Option<i32>,
}

impl StubSource {
    pub fn new(lifecycle: Lifecycle) -> Self {
        Self {
            lifecycle,
            count: 0,
            stop_after: None,
        }
    }

    /// Return `false` from the `n`th call.
    pub fn stop_after(mut self, n: i32) -> Self {
        self.stop_after = Some(n);
        self
    }
}

impl Processor for StubSource {
    fn name(&self) -> &str {
        "stub_source"
    }

    fn init(&mut self, args: &str) -> Result<(), ProcessorError> {
        self.lifecycle.record_init(args);
        if args == "fail" {
            return Err(ProcessorError::failed("init refused"));
        }
        Ok(())
    }

    fn close(&mut self) -> Result<(), ProcessorError> {
        self.lifecycle.record_close();
        Ok(())
    }
}

impl InputProcessor for StubSource {
    type Output = i32;

    fn process(&mut self, output: &mut i32) -> Result<bool, ProcessorError> {
        self.lifecycle.record_process();
        self.count += 1;
        *output = self.count;
        Ok(self.stop_after != Some(self.count))
    }
}

/// Emits like [`StubSource`] but fails on the `fail_on`th call.
pub struct FailingSource {
    lifecycle: Lifecycle,
    fail_on: usize,
}

impl FailingSource {
    pub fn new(lifecycle: Lifecycle, fail_on: usize) -> Self {
        Self { lifecycle, fail_on }
    }
}

impl Processor for FailingSource {
    fn name(&self) -> &str {
        "failing_source"
    }

    fn init(&mut self, args: &str) -> Result<(), ProcessorError> {
        self.lifecycle.record_init(args);
        Ok(())
    }

    fn close(&mut self) -> Result<(), ProcessorError> {
        self.lifecycle.record_close();
        Ok(())
    }
}

impl InputProcessor for FailingSource {
    type Output = i32;

    fn process(&mut self, output: &mut i32) -> Result<bool, ProcessorError> {
        let call = self.lifecycle.record_process();
        if call == self.fail_on {
            return Err(ProcessorError::failed(format!("simulated failure on call {}", call)));
        }
        *output = call as i32;
        Ok(true)
    }
}

/// Emits strings of `width` copies of one symbol, so a torn value is detectable.
pub struct RepeatSource {
    symbol: char,
    width: usize,
}

impl RepeatSource {
    pub fn new(symbol: char, width: usize) -> Self {
        Self { symbol, width }
    }
}

impl Processor for RepeatSource {
    fn name(&self) -> &str {
        "repeat_source"
    }
}

impl InputProcessor for RepeatSource {
    type Output = String;

    fn process(&mut self, output: &mut String) -> Result<bool, ProcessorError> {
        output.clear();
        output.extend(std::iter::repeat(self.symbol).take(self.width));
        Ok(true)
    }
}

/// Panics on every value it receives.
pub struct PanickingSink {
    lifecycle: Lifecycle,
}

impl PanickingSink {
    pub fn new(lifecycle: Lifecycle) -> Self {
        Self { lifecycle }
    }
}

impl Processor for PanickingSink {
    fn name(&self) -> &str {
        "panicking_sink"
    }

    fn init(&mut self, args: &str) -> Result<(), ProcessorError> {
        self.lifecycle.record_init(args);
        Ok(())
    }

    fn close(&mut self) -> Result<(), ProcessorError> {
        self.lifecycle.record_close();
        Ok(())
    }
}

impl OutputProcessor for PanickingSink {
    type Input = i32;

    fn process(&mut self, input: &i32) -> Result<bool, ProcessorError> {
        self.lifecycle.record_process();
        panic!("refusing {}", input);
    }
}

/// Records every value it receives, optionally sleeping after each one.
pub struct Collector<T> {
    lifecycle: Lifecycle,
    values: Arc<Mutex<Vec<T>>>,
    delay: Option<Duration>,
    _marker: PhantomData<fn(T)>,
}

impl<T> Default for Collector<T> {
    fn default() -> Self {
        Self {
            lifecycle: Lifecycle::default(),
            values: Arc::new(Mutex::new(Vec::new())),
            delay: None,
            _marker: PhantomData,
        }
    }
}

impl<T> Collector<T> {
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle.clone()
    }

    pub fn values(&self) -> Arc<Mutex<Vec<T>>> {
        Arc::clone(&self.values)
    }
}

impl<T: Send> Processor for Collector<T> {
    fn name(&self) -> &str {
        "collector"
    }

    fn init(&mut self, args: &str) -> Result<(), ProcessorError> {
        self.lifecycle.record_init(args);
        Ok(())
    }

    fn close(&mut self) -> Result<(), ProcessorError> {
        self.lifecycle.record_close();
        Ok(())
    }
}

impl<T: Clone + Send + 'static> OutputProcessor for Collector<T> {
    type Input = T;

    fn process(&mut self, input: &T) -> Result<bool, ProcessorError> {
        self.lifecycle.record_process();
        self.values.lock().unwrap().push(input.clone());
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        Ok(true)
    }
}

/// Doubles every value.
pub struct Doubler;

impl Processor for Doubler {
    fn name(&self) -> &str {
        "doubler"
    }
}

impl InOutProcessor for Doubler {
    type Input = i32;
    type Output = i32;

    fn process(&mut self, input: &i32, output: &mut i32) -> Result<bool, ProcessorError> {
        *output = input * 2;
        Ok(true)
    }
}
