//! Commit-gated emission.
//!
//! The two-phase contract for every write operation:
//!
//! 1. The *buffered* phase performs the store mutation and stages the
//!    resulting events in an [`EventBuffer`] it was handed.
//! 2. The *emit* wrapper here constructs a fresh, function-scoped buffer,
//!    runs phase 1, and hands the buffer to the publisher **if and only if**
//!    phase 1 returned `Ok`.
//!
//! The discard rule is load-bearing: an error return from phase 1 drops the
//! buffer (empty or partially populated) without publishing anything. An
//! event that was staged from a pre-mutation lookup therefore never becomes
//! observable when the mutation itself failed. A publish failure after a
//! successful phase 1 is returned as its own error class; the mutation is
//! already durable and is not compensated.

use crate::buffer::EventBuffer;
use scribe_core::DomainResult;

/// Sink for a drained buffer. Implemented by the publisher in front of the
/// actual bus.
pub trait Publish {
    /// Deliver every buffered message, preserving per-topic order.
    fn publish_all(&self, buffer: EventBuffer) -> DomainResult<()>;
}

impl<P> Publish for &P
where
    P: Publish + ?Sized,
{
    fn publish_all(&self, buffer: EventBuffer) -> DomainResult<()> {
        (**self).publish_all(buffer)
    }
}

/// Run a value-returning buffered operation, publishing on success only.
pub fn emit_with_result<T, P, F>(publisher: P, operation: F) -> DomainResult<T>
where
    P: Publish,
    F: FnOnce(&mut EventBuffer) -> DomainResult<T>,
{
    let mut buffer = EventBuffer::new();
    let value = operation(&mut buffer)?;
    publisher.publish_all(buffer)?;
    Ok(value)
}

/// Run a unit buffered operation, publishing on success only.
pub fn emit<P, F>(publisher: P, operation: F) -> DomainResult<()>
where
    P: Publish,
    F: FnOnce(&mut EventBuffer) -> DomainResult<()>,
{
    emit_with_result(publisher, operation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::BufferedMessage;
    use scribe_core::{DomainError, Provider};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingPublisher {
        published: Mutex<Vec<(String, Vec<BufferedMessage>)>>,
    }

    impl Publish for RecordingPublisher {
        fn publish_all(&self, buffer: EventBuffer) -> DomainResult<()> {
            self.published.lock().unwrap().extend(buffer.into_topics());
            Ok(())
        }
    }

    struct FailingPublisher;

    impl Publish for FailingPublisher {
        fn publish_all(&self, _buffer: EventBuffer) -> DomainResult<()> {
            Err(DomainError::publish("bus down"))
        }
    }

    fn staged(n: u8) -> Provider<Vec<BufferedMessage>> {
        Provider::fixed(vec![BufferedMessage {
            partition_key: vec![n],
            payload: serde_json::json!({ "n": n }),
        }])
    }

    #[test]
    fn success_publishes_the_buffer() {
        let publisher = RecordingPublisher::default();
        let out = emit_with_result(&publisher, |buffer| {
            buffer.put("note-status", staged(1))?;
            Ok(41)
        })
        .unwrap();

        assert_eq!(out, 41);
        let published = publisher.published.lock().unwrap();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].0, "note-status");
    }

    #[test]
    fn phase_one_failure_discards_partially_filled_buffer() {
        let publisher = RecordingPublisher::default();
        let err = emit(&publisher, |buffer| {
            buffer.put("note-status", staged(1))?;
            Err(DomainError::store("constraint violation"))
        })
        .unwrap_err();

        assert!(matches!(err, DomainError::Store(_)));
        assert!(publisher.published.lock().unwrap().is_empty());
    }

    #[test]
    fn publish_failure_surfaces_as_publish_error() {
        let err = emit_with_result(&FailingPublisher, |buffer| {
            buffer.put("note-status", staged(1))?;
            Ok(())
        })
        .unwrap_err();

        assert_eq!(err, DomainError::Publish("bus down".to_string()));
    }
}
