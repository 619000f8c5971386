//! `scribe-core` — domain foundation for the notes service.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! strongly-typed identifiers, the domain error model, the [`Note`] aggregate,
//! and the lazy [`Provider`] combinators used to compose reads and writes.

pub mod error;
pub mod id;
pub mod note;
pub mod provider;

pub use error::{DomainError, DomainResult};
pub use id::{CharacterId, NoteId, TenantId};
pub use note::{Note, NoteBuilder};
pub use provider::Provider;
