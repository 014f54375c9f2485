// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::time::Duration;

use crate::buffer::ReadPolicy;

/// Per-worker execution options.
///
/// All fields default to the plain run loop: fresh reads, no idle timeout, no
/// pacing delay and an empty init argument.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkerOptions {
    /// How the worker's input is read.
    pub read_policy: ReadPolicy,
    /// Fail with `InputTimedOut` if no input arrives within this window.
    pub idle_timeout: Option<Duration>,
    /// Sleep after each iteration that keeps going.
    pub pacing: Option<Duration>,
    /// Passed to the processor's `init`.
    pub init_args: String,
}

impl WorkerOptions {
    pub fn with_read_policy(mut self, read_policy: ReadPolicy) -> Self {
        self.read_policy = read_policy;
        self
    }

    pub fn with_idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = Some(timeout);
        self
    }

    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = Some(pacing);
        self
    }

    pub fn with_init_args(mut self, args: impl Into<String>) -> Self {
        self.init_args = args.into();
        self
    }
}
