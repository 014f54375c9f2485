// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Single-slot "latest value wins" buffer shared between workers.
//!
//! A [`Buffer`] holds at most one value. Writers overwrite it, readers clone it,
//! and nothing is ever queued: a slow reader simply skips values that were
//! overwritten before it looked. Every write bumps a version counter so a
//! [`BufferReader`] can tell whether it has already consumed the current value.
//!
//! # Synchronization
//!
//! The slot lives behind a `Mutex` paired with a `Condvar`. A write is a single
//! assignment under the lock, which gives the two guarantees the pipeline
//! relies on:
//! - readers never observe a half-written value;
//! - concurrent writers (fan-in) are serialized, so the slot always holds a
//!   value written in full by exactly one `write` call.
//!
//! # Closing
//!
//! [`BufferWriter`] handles are counted. When the last registered writer is
//! dropped the buffer is closed, and readers waiting for a newer value wake up
//! with [`Received::Closed`] once they have consumed the final one. A buffer
//! that never had a writer is never closed.
//!
//! ```text
//!            writer (producer A) ──┐
//!                                  ├──► [ slot | version | writers ] ──► reader (consumer X)
//!            writer (producer B) ──┘                                 └─► reader (consumer Y)
//! ```

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

static NEXT_BUFFER_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identifier of a buffer, used for topology validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferId(u64);

impl BufferId {
    fn next() -> Self {
        Self(NEXT_BUFFER_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for BufferId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How a reader waits for input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadPolicy {
    /// Block until a value newer than the last one consumed is published.
    #[default]
    Fresh,
    /// Return the current value as soon as one exists, even if already seen.
    Latest,
}

/// Result of a blocking receive on a [`BufferReader`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Received<T> {
    /// A value satisfying the read policy.
    Value(T),
    /// Every writer is gone and the final value has already been consumed.
    Closed,
    /// The timeout elapsed before a value became available.
    TimedOut,
}

struct Slot<T> {
    value: Option<T>,
    version: u64,
    live_writers: usize,
    registered_writers: usize,
}

impl<T> Slot<T> {
    fn is_closed(&self) -> bool {
        self.registered_writers > 0 && self.live_writers == 0
    }
}

struct Shared<T> {
    id: BufferId,
    slot: Mutex<Slot<T>>,
    published: Condvar,
}

impl<T> Shared<T> {
    fn lock(&self) -> MutexGuard<'_, Slot<T>> {
        // A write is one assignment, so a poisoned lock still guards a whole value.
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn store(&self, value: T) {
        let mut slot = self.lock();
        slot.value = Some(value);
        slot.version += 1;
        drop(slot);
        self.published.notify_all();
    }
}

/// Single-slot shared cell owned by the worker that allocated it.
///
/// Peers never hold a `Buffer`; they receive a [`BufferReader`] or
/// [`BufferWriter`] from the wiring functions.
pub struct Buffer<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Buffer<T> {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                id: BufferId::next(),
                slot: Mutex::new(Slot {
                    value: None,
                    version: 0,
                    live_writers: 0,
                    registered_writers: 0,
                }),
                published: Condvar::new(),
            }),
        }
    }

    pub fn id(&self) -> BufferId {
        self.shared.id
    }

    /// Number of values published so far.
    pub fn version(&self) -> u64 {
        self.shared.lock().version
    }

    /// True once every registered writer has been dropped.
    pub fn is_closed(&self) -> bool {
        self.shared.lock().is_closed()
    }

    /// Writers currently holding this buffer open.
    pub fn live_writers(&self) -> usize {
        self.shared.lock().live_writers
    }

    /// Store `value`, replacing whatever was there, and wake waiting readers.
    pub fn write(&self, value: T) {
        self.shared.store(value);
    }

    /// Register a new writer. The buffer closes when the last one is dropped.
    pub fn writer(&self) -> BufferWriter<T> {
        let mut slot = self.shared.lock();
        slot.live_writers += 1;
        slot.registered_writers += 1;
        drop(slot);
        BufferWriter {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Create a reader that has not consumed anything yet.
    pub fn reader(&self) -> BufferReader<T> {
        BufferReader {
            shared: Arc::clone(&self.shared),
            last_seen: 0,
        }
    }
}

impl<T: Clone> Buffer<T> {
    /// Clone of the latest value, or `None` before the first write.
    pub fn read(&self) -> Option<T> {
        self.shared.lock().value.clone()
    }
}

impl<T> Default for Buffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for Buffer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let slot = self.shared.lock();
        f.debug_struct("Buffer")
            .field("id", &self.shared.id)
            .field("version", &slot.version)
            .field("live_writers", &slot.live_writers)
            .finish()
    }
}

/// Write handle bound to a buffer owned by another worker (or by its own port).
pub struct BufferWriter<T> {
    shared: Arc<Shared<T>>,
}

impl<T> BufferWriter<T> {
    pub fn buffer_id(&self) -> BufferId {
        self.shared.id
    }

    pub fn write(&self, value: T) {
        self.shared.store(value);
    }
}

impl<T> Drop for BufferWriter<T> {
    fn drop(&mut self) {
        let mut slot = self.shared.lock();
        slot.live_writers = slot.live_writers.saturating_sub(1);
        let closed = slot.is_closed();
        drop(slot);
        if closed {
            self.shared.published.notify_all();
        }
    }
}

/// Read handle that remembers the last version it consumed.
pub struct BufferReader<T> {
    shared: Arc<Shared<T>>,
    last_seen: u64,
}

impl<T> BufferReader<T> {
    pub fn buffer_id(&self) -> BufferId {
        self.shared.id
    }

    /// Version of the last value returned by [`receive`](Self::receive).
    pub fn last_seen(&self) -> u64 {
        self.last_seen
    }

    /// Writers currently holding the buffer open.
    pub fn live_writers(&self) -> usize {
        self.shared.lock().live_writers
    }
}

impl<T: Clone> BufferReader<T> {
    /// Non-blocking peek at the latest value. Does not mark it as consumed.
    pub fn read(&self) -> Option<T> {
        self.shared.lock().value.clone()
    }

    /// Wait for a value according to `policy`.
    ///
    /// An unconsumed final value is always delivered before `Closed` is
    /// reported. With `timeout = None` this blocks until a value arrives or
    /// the buffer closes.
    pub fn receive(&mut self, policy: ReadPolicy, timeout: Option<Duration>) -> Received<T> {
        let deadline = timeout.map(|t| Instant::now() + t);
        let mut slot = self.shared.lock();

        loop {
            let unseen = slot.version > self.last_seen;
            let ready = match policy {
                ReadPolicy::Fresh => unseen,
                ReadPolicy::Latest => slot.value.is_some() && (unseen || !slot.is_closed()),
            };

            if ready {
                if let Some(value) = slot.value.clone() {
                    self.last_seen = slot.version;
                    return Received::Value(value);
                }
            }

            if slot.is_closed() {
                return Received::Closed;
            }

            slot = match deadline {
                None => self
                    .shared
                    .published
                    .wait(slot)
                    .unwrap_or_else(PoisonError::into_inner),
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return Received::TimedOut;
                    }
                    let (guard, _) = self
                        .shared
                        .published
                        .wait_timeout(slot, deadline - now)
                        .unwrap_or_else(PoisonError::into_inner);
                    guard
                }
            };
        }
    }
}
