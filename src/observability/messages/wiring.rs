// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for buffer wiring events.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Workers were connected through a shared buffer.
///
/// `direction` is `"fan_out"` when the producer owns the buffer and
/// `"fan_in"` when the consumer does.
///
/// # Log Level
/// `debug!` - Setup detail
///
/// # Example
/// ```
/// use the_pipeworks::observability::messages::wiring::BuffersConnected;
///
/// let peers = vec![1, 2];
/// let msg = BuffersConnected {
///     direction: "fan_out",
///     owner_index: 0,
///     buffer_id: 5,
///     peers: &peers,
/// };
///
/// tracing::debug!("{}", msg);
/// ```
pub struct BuffersConnected<'a> {
    pub direction: &'a str,
    pub owner_index: usize,
    pub buffer_id: u64,
    pub peers: &'a [usize],
}

impl Display for BuffersConnected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Connected worker {} to workers {:?} through buffer #{} ({})",
            self.owner_index, self.peers, self.buffer_id, self.direction
        )
    }
}

impl StructuredLog for BuffersConnected<'_> {
    fn log(&self) {
        tracing::debug!(
            direction = self.direction,
            owner_index = self.owner_index,
            buffer_id = self.buffer_id,
            peer_count = self.peers.len(),
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "wiring",
            span_name = name,
            owner_index = self.owner_index,
            buffer_id = self.buffer_id,
        )
    }
}

/// A wiring call named no peers.
///
/// # Log Level
/// `warn!` - The call is rejected
///
/// # Example
/// ```
/// use the_pipeworks::observability::messages::wiring::WiringWithoutPeers;
///
/// let msg = WiringWithoutPeers {
///     worker_index: 0,
///     direction: "fan_out",
/// };
///
/// tracing::warn!("{}", msg);
/// ```
pub struct WiringWithoutPeers<'a> {
    pub worker_index: usize,
    pub direction: &'a str,
}

impl Display for WiringWithoutPeers<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Worker {} was wired ({}) with an empty peer list",
            self.worker_index, self.direction
        )
    }
}

impl StructuredLog for WiringWithoutPeers<'_> {
    fn log(&self) {
        tracing::warn!(
            worker_index = self.worker_index,
            direction = self.direction,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "wiring",
            span_name = name,
            worker_index = self.worker_index,
        )
    }
}
