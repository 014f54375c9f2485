// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Binding buffers between workers before execution.
//!
//! Two shapes are supported:
//!
//! ```text
//! fan-out:  producer ──► [buffer owned by producer] ──► consumer, consumer, ...
//! fan-in:   producer, producer, ... ──► [buffer owned by consumer] ──► consumer
//! ```
//!
//! Both functions are generic over the value type `T`, and every peer must
//! agree on it:
//!
//! ```rust
//! use the_pipeworks::backends::local::processors::{ConsoleSink, OffsetFormatter, SequenceSource};
//! use the_pipeworks::engine::{connect_consumer_to_producers, connect_output_to_consumers};
//! use the_pipeworks::observability::DiagnosticSink;
//! use the_pipeworks::worker::Worker;
//!
//! let mut w0 = Worker::input(0, SequenceSource::new(220));
//! let mut w1 = Worker::in_out(1, OffsetFormatter::new(120));
//! let mut w2 = Worker::in_out(2, OffsetFormatter::new(120));
//! let mut w3 = Worker::output(3, ConsoleSink::new(DiagnosticSink::in_memory()));
//!
//! connect_output_to_consumers(&mut w0, &mut [&mut w1, &mut w2]).unwrap();
//! connect_consumer_to_producers(&mut w3, &mut [&mut w1, &mut w2]).unwrap();
//! ```
//!
//! A mismatch is rejected by the compiler, not at run time:
//!
//! ```rust,compile_fail
//! use the_pipeworks::backends::local::processors::{ConsoleSink, SequenceSource};
//! use the_pipeworks::engine::connect_output_to_consumers;
//! use the_pipeworks::observability::DiagnosticSink;
//! use the_pipeworks::worker::Worker;
//!
//! // SequenceSource produces i32; ConsoleSink consumes String.
//! let mut source = Worker::input(0, SequenceSource::new(0));
//! let mut sink = Worker::output(1, ConsoleSink::new(DiagnosticSink::in_memory()));
//!
//! connect_output_to_consumers(&mut source, &mut [&mut sink]).unwrap();
//! ```

use crate::errors::WiringError;
use crate::observability::messages::wiring::{BuffersConnected, WiringWithoutPeers};
use crate::observability::messages::StructuredLog;
use crate::traits::{Consumer, Producer};

/// Fan-out: every consumer reads the buffer owned by `producer`.
///
/// The producer's buffer is created on first use and reused afterwards, so
/// the same producer can be connected in several calls. Nothing is bound
/// unless every consumer is free to take the buffer.
pub fn connect_output_to_consumers<T>(
    producer: &mut dyn Producer<T>,
    consumers: &mut [&mut dyn Consumer<T>],
) -> Result<(), WiringError> {
    let owner_index = producer.worker_index();
    if consumers.is_empty() {
        WiringWithoutPeers {
            worker_index: owner_index,
            direction: "fan_out",
        }
        .log();
        return Err(WiringError::NoConsumers {
            worker_index: owner_index,
        });
    }

    let port = producer.output_port()?;
    let existing = port.owned_id();

    for consumer in consumers.iter_mut() {
        let bound_elsewhere = {
            let input = consumer.input_port()?;
            input.is_bound() && input.source_id() != existing
        };
        if bound_elsewhere {
            return Err(WiringError::InputAlreadyBound {
                worker_index: consumer.worker_index(),
                processor: consumer.processor_name().to_string(),
            });
        }
    }

    let buffer = port.export();
    let buffer_id = buffer.id();
    for consumer in consumers.iter_mut() {
        let input = consumer.input_port()?;
        if input.source_id() == Some(buffer_id) {
            continue;
        }
        if input.bind(buffer.reader()).is_err() {
            return Err(WiringError::InputAlreadyBound {
                worker_index: consumer.worker_index(),
                processor: consumer.processor_name().to_string(),
            });
        }
    }

    let peers: Vec<usize> = consumers.iter().map(|c| c.worker_index()).collect();
    BuffersConnected {
        direction: "fan_out",
        owner_index,
        buffer_id: buffer_id.get(),
        peers: &peers,
    }
    .log();
    Ok(())
}

/// Fan-in: every producer writes into the buffer owned by `consumer`.
///
/// Calling this again with the same consumer adds producers to the same
/// buffer. A consumer already reading a producer-owned buffer is rejected.
pub fn connect_consumer_to_producers<T>(
    consumer: &mut dyn Consumer<T>,
    producers: &mut [&mut dyn Producer<T>],
) -> Result<(), WiringError> {
    let owner_index = consumer.worker_index();
    if producers.is_empty() {
        WiringWithoutPeers {
            worker_index: owner_index,
            direction: "fan_in",
        }
        .log();
        return Err(WiringError::NoProducers {
            worker_index: owner_index,
        });
    }

    for producer in producers.iter_mut() {
        producer.output_port()?;
    }

    let processor = consumer.processor_name().to_string();
    let buffer = match consumer.input_port()?.import() {
        Some(buffer) => buffer,
        None => {
            return Err(WiringError::InputAlreadyBound {
                worker_index: owner_index,
                processor,
            })
        }
    };

    for producer in producers.iter_mut() {
        producer.output_port()?.bind(buffer.writer());
    }

    let peers: Vec<usize> = producers.iter().map(|p| p.worker_index()).collect();
    BuffersConnected {
        direction: "fan_in",
        owner_index,
        buffer_id: buffer.id().get(),
        peers: &peers,
    }
    .log();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::stub::{Collector, Doubler, Lifecycle, StubSource};
    use crate::buffer::{ReadPolicy, Received};
    use crate::worker::Worker;

    #[test]
    fn test_fan_out_shares_one_buffer() {
        let mut source = Worker::input(0, StubSource::new(Lifecycle::default()));
        let mut left = Worker::output(1, Collector::<i32>::default());
        let mut right = Worker::output(2, Collector::<i32>::default());

        connect_output_to_consumers(&mut source, &mut [&mut left, &mut right]).unwrap();

        let written = source.writes();
        assert_eq!(written.len(), 1);
        assert_eq!(left.reads(), Some(written[0]));
        assert_eq!(right.reads(), Some(written[0]));
    }

    #[test]
    fn test_fan_out_reuses_buffer_across_calls() {
        let mut source = Worker::input(0, StubSource::new(Lifecycle::default()));
        let mut left = Worker::output(1, Collector::<i32>::default());
        let mut right = Worker::output(2, Collector::<i32>::default());

        connect_output_to_consumers(&mut source, &mut [&mut left]).unwrap();
        connect_output_to_consumers(&mut source, &mut [&mut right, &mut left]).unwrap();

        assert_eq!(source.writes().len(), 1);
        assert_eq!(left.reads(), right.reads());
    }

    #[test]
    fn test_fan_in_reuses_consumer_buffer() {
        let mut first = Worker::input(0, StubSource::new(Lifecycle::default()));
        let mut second = Worker::input(1, StubSource::new(Lifecycle::default()));
        let mut sink = Worker::output(2, Collector::<i32>::default());

        connect_consumer_to_producers(&mut sink, &mut [&mut first]).unwrap();
        connect_consumer_to_producers(&mut sink, &mut [&mut second]).unwrap();

        let input = sink.reads().unwrap();
        assert_eq!(first.writes(), vec![input]);
        assert_eq!(second.writes(), vec![input]);
    }

    #[test]
    fn test_consumer_cannot_take_second_input() {
        let mut first = Worker::input(0, StubSource::new(Lifecycle::default()));
        let mut second = Worker::input(1, StubSource::new(Lifecycle::default()));
        let mut sink = Worker::output(2, Collector::<i32>::default());

        connect_output_to_consumers(&mut first, &mut [&mut sink]).unwrap();
        let error = connect_output_to_consumers(&mut second, &mut [&mut sink]).unwrap_err();

        assert!(matches!(error, WiringError::InputAlreadyBound { worker_index: 2, .. }));
        assert!(second.writes().is_empty());
    }

    #[test]
    fn test_fan_in_rejected_when_input_bound_to_producer_buffer() {
        let mut first = Worker::input(0, StubSource::new(Lifecycle::default()));
        let mut second = Worker::input(1, StubSource::new(Lifecycle::default()));
        let mut sink = Worker::output(2, Collector::<i32>::default());

        connect_output_to_consumers(&mut first, &mut [&mut sink]).unwrap();
        let error = connect_consumer_to_producers(&mut sink, &mut [&mut second]).unwrap_err();

        assert!(matches!(error, WiringError::InputAlreadyBound { .. }));
    }

    #[test]
    fn test_empty_peer_lists_rejected() {
        let mut source = Worker::input(0, StubSource::new(Lifecycle::default()));
        let mut sink = Worker::output(1, Collector::<i32>::default());

        assert_eq!(
            connect_output_to_consumers(&mut source, &mut []),
            Err(WiringError::NoConsumers { worker_index: 0 })
        );
        assert_eq!(
            connect_consumer_to_producers(&mut sink, &mut []),
            Err(WiringError::NoProducers { worker_index: 1 })
        );
    }

    #[test]
    fn test_wiring_after_run_rejected() {
        let mut source = Worker::input(0, StubSource::new(Lifecycle::default()));
        source.run(Some(1)).unwrap();
        let mut sink = Worker::output(1, Collector::<i32>::default());

        let error = connect_output_to_consumers(&mut source, &mut [&mut sink]).unwrap_err();

        assert!(matches!(error, WiringError::AlreadyStarted { worker_index: 0, .. }));
        assert!(sink.reads().is_none());
    }

    #[test]
    fn test_chained_stage_delivers_transformed_value() {
        let mut source = Worker::input(0, StubSource::new(Lifecycle::default()));
        let mut doubler = Worker::in_out(1, Doubler);
        let mut sink = Worker::output(2, Collector::<i32>::default());
        let seen = sink.processor().values();

        connect_output_to_consumers(&mut source, &mut [&mut doubler]).unwrap();
        connect_output_to_consumers(&mut doubler, &mut [&mut sink]).unwrap();

        source.run(Some(1)).unwrap();
        doubler.run(None).unwrap();
        sink.run(None).unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![2]);
    }

    #[test]
    fn test_fan_in_buffer_sees_every_producer() {
        let mut first = Worker::input(0, StubSource::new(Lifecycle::default()));
        let mut second = Worker::input(1, StubSource::new(Lifecycle::default()).stop_after(5));
        let mut sink = Worker::output(2, Collector::<i32>::default());
        connect_consumer_to_producers(&mut sink, &mut [&mut first, &mut second]).unwrap();

        first.run(Some(1)).unwrap();
        second.run(None).unwrap();

        let mut expected = Vec::new();
        let port = crate::traits::Consumer::input_port(&mut sink).unwrap();
        if let Some(reader) = port.source_mut() {
            expected.push(reader.receive(ReadPolicy::Fresh, None));
            expected.push(reader.receive(ReadPolicy::Fresh, None));
        }
        assert_eq!(expected, vec![Received::Value(5), Received::Closed]);
    }
}
