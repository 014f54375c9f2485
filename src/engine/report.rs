// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::time::Duration;

use serde::Serialize;

use crate::errors::{ExecutionError, WorkerError};
use crate::worker::{StopReason, WorkerReport};

/// How one worker's thread ended.
#[derive(Debug)]
pub struct WorkerOutcome {
    pub index: usize,
    pub processor: String,
    pub result: Result<WorkerReport, WorkerError>,
}

/// Flattened, serializable view of a [`WorkerOutcome`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkerSummary {
    pub index: usize,
    pub processor: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iterations: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_reason: Option<StopReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Results of a pipeline run, in the order workers were added.
///
/// Worker failures are recorded here rather than returned as errors so that
/// every other worker's outcome is still available.
#[derive(Debug, Default)]
pub struct PipelineReport {
    outcomes: Vec<WorkerOutcome>,
    duration: Duration,
}

impl PipelineReport {
    pub(crate) fn new(outcomes: Vec<WorkerOutcome>, duration: Duration) -> Self {
        Self { outcomes, duration }
    }

    pub fn outcomes(&self) -> &[WorkerOutcome] {
        &self.outcomes
    }

    /// Report of the worker with `index`, if it finished cleanly.
    pub fn report(&self, index: usize) -> Option<&WorkerReport> {
        self.outcomes
            .iter()
            .find(|outcome| outcome.index == index)
            .and_then(|outcome| outcome.result.as_ref().ok())
    }

    /// Error of the worker with `index`, if it failed.
    pub fn error(&self, index: usize) -> Option<&WorkerError> {
        self.outcomes
            .iter()
            .find(|outcome| outcome.index == index)
            .and_then(|outcome| outcome.result.as_ref().err())
    }

    pub fn failures(&self) -> Vec<&WorkerError> {
        self.outcomes
            .iter()
            .filter_map(|outcome| outcome.result.as_ref().err())
            .collect()
    }

    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(|outcome| outcome.result.is_ok())
    }

    /// Wall-clock time from the first spawn to the last join.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn summaries(&self) -> Vec<WorkerSummary> {
        self.outcomes
            .iter()
            .map(|outcome| match &outcome.result {
                Ok(report) => WorkerSummary {
                    index: outcome.index,
                    processor: outcome.processor.clone(),
                    iterations: Some(report.iterations),
                    stop_reason: Some(report.stop_reason),
                    error: None,
                },
                Err(error) => WorkerSummary {
                    index: outcome.index,
                    processor: outcome.processor.clone(),
                    iterations: None,
                    stop_reason: None,
                    error: Some(error.to_string()),
                },
            })
            .collect()
    }

    /// Every worker report, or `WorkersFailed` if any worker failed.
    pub fn into_result(self) -> Result<Vec<WorkerReport>, ExecutionError> {
        let total = self.outcomes.len();
        let failed = self.failures().len();
        if failed > 0 {
            return Err(ExecutionError::WorkersFailed { failed, total });
        }
        Ok(self
            .outcomes
            .into_iter()
            .filter_map(|outcome| outcome.result.ok())
            .collect())
    }
}
