//! `scribe-infra` — infrastructure for the notes service.
//!
//! The note store (in-memory and Postgres), the processor orchestrating
//! transactional writes with commit-gated event emission, the event
//! producer/publisher pair, and the inbound consumer adapters.

pub mod consumer;
pub mod note_store;
pub mod processor;
pub mod producer;
pub mod publisher;

pub use note_store::{
    InMemoryNoteStore, NewNote, NoteRecord, NoteStore, NoteUpdate, PostgresNoteStore, StoreError,
};
pub use processor::NoteProcessor;
pub use publisher::Publisher;
