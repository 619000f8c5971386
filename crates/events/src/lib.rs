//! `scribe-events` — event plumbing for the notes service.
//!
//! Contains the transport-agnostic bus abstraction, the operation-scoped
//! [`EventBuffer`], the commit-gated emission helpers, the wire types for
//! the note/character topics, and partition-key derivation.

pub mod buffer;
pub mod bus;
pub mod emit;
pub mod in_memory_bus;
pub mod key;
pub mod message;
pub mod topics;

pub use buffer::{BufferedMessage, EventBuffer};
pub use bus::{EventBus, Subscription};
pub use emit::{emit, emit_with_result, Publish};
pub use in_memory_bus::InMemoryEventBus;
pub use key::partition_key;
pub use message::{BusMessage, TenantScoped};
