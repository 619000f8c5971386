//! Event publishing/subscription abstraction (mechanics only).
//!
//! The bus is the seam between this service and the message broker. It is
//! intentionally lightweight:
//!
//! - **Transport-agnostic**: the in-process bus backs tests and dev; a
//!   broker client implements the same trait in deployment.
//! - **Per-key ordering**: implementations must preserve the relative order
//!   of messages published with the same partition key on the same topic.
//!   Cross-key ordering is not guaranteed.
//! - **No persistence**: the bus distributes; the note store is the source
//!   of truth. Emission is best-effort and in-process (no durable outbox).
//!
//! Failures are surfaced synchronously to the publisher, which reports them
//! to the caller as a post-commit delivery failure.

use std::sync::mpsc::Receiver;
use std::sync::Arc;
use std::time::Duration;

/// A subscription to a message stream.
///
/// Each subscription receives a copy of every message published to the bus
/// (broadcast semantics), in publication order. Designed for single-threaded
/// consumption; each inbound adapter owns exactly one subscription.
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: Receiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(receiver: Receiver<M>) -> Self {
        Self { receiver }
    }

    /// Block until the next message is available.
    pub fn recv(&self) -> Result<M, std::sync::mpsc::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive a message without blocking.
    pub fn try_recv(&self) -> Result<M, std::sync::mpsc::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Block for up to `timeout` waiting for a message.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<M, std::sync::mpsc::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }
}

/// Domain-agnostic message bus (pub/sub).
///
/// `publish` delivers one message; a returned error means the message may
/// not have reached every subscriber and the caller must treat the send as
/// failed. `subscribe` registers a new broadcast consumer.
pub trait EventBus<M>: Send + Sync {
    type Error: core::fmt::Debug + Send + Sync + 'static;

    fn publish(&self, message: M) -> Result<(), Self::Error>;

    fn subscribe(&self) -> Subscription<M>;
}

impl<M, B> EventBus<M> for Arc<B>
where
    B: EventBus<M> + ?Sized,
{
    type Error = B::Error;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        (**self).publish(message)
    }

    fn subscribe(&self) -> Subscription<M> {
        (**self).subscribe()
    }
}
