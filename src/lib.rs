// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Typed thread-per-stage pipelines.
//!
//! Processors hold per-iteration logic. Each one is driven by a [`worker::Worker`]
//! on its own OS thread, and workers hand values to each other through
//! single-slot, latest-value-wins [`buffer::Buffer`]s that are wired up before
//! execution starts. The [`engine::Pipeline`] validates the wired topology,
//! spawns the threads and reports how each worker ended.

pub mod backends;      // bundled processors
pub mod buffer;        // single-slot hand-off cells and ports
pub mod config;        // execution settings
pub mod engine;        // wiring, validation, threaded driver
pub mod errors;        // error handling
pub mod observability; // structured log messages, diagnostic sink
pub mod traits;        // processor roles and wiring capabilities
pub mod worker;        // per-processor run loop
