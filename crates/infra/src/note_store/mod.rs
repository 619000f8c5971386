//! Persistent store adapter for notes.
//!
//! The [`NoteStore`] trait is the unit-of-work boundary: every method is one
//! logical change (or read) executed atomically and scoped to a tenant. No
//! partial row mutation is ever visible on error. Deletion is soft at this
//! layer (`deleted_at`); deleted rows are invisible to every read and update.

mod in_memory;
mod postgres;

pub use in_memory::InMemoryNoteStore;
pub use postgres::PostgresNoteStore;

use chrono::{DateTime, Utc};
use thiserror::Error;

use scribe_core::{CharacterId, DomainError, Note, NoteId, TenantId};

/// Store operation error.
///
/// Infrastructure failures only; the processor maps these into the domain
/// taxonomy at its seam.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No live row matched the id/tenant (or character/tenant) scope.
    #[error("no matching row")]
    NotFound,

    /// The store rejected the mutation (e.g. constraint violation).
    #[error("constraint violation: {0}")]
    Constraint(String),

    /// The backend failed (connection, transaction, decode).
    #[error("store backend failure: {0}")]
    Backend(String),
}

impl From<StoreError> for DomainError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound => DomainError::NotFound,
            other => DomainError::store(other.to_string()),
        }
    }
}

/// Fields for a note about to be created. The store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNote {
    pub character_id: CharacterId,
    pub sender_id: CharacterId,
    pub message: String,
    pub flag: u8,
    pub timestamp: DateTime<Utc>,
}

/// Full replacement of a note's mutable fields.
///
/// `timestamp: None` preserves the stored creation time; `Some` re-supplies
/// it explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteUpdate {
    pub character_id: CharacterId,
    pub sender_id: CharacterId,
    pub message: String,
    pub flag: u8,
    pub timestamp: Option<DateTime<Utc>>,
}

/// A persisted note row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteRecord {
    pub id: NoteId,
    pub tenant_id: TenantId,
    pub character_id: CharacterId,
    pub sender_id: CharacterId,
    pub message: String,
    pub flag: u8,
    pub timestamp: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl NoteRecord {
    /// Domain-model constructor: project the row into a [`Note`].
    pub fn to_note(&self) -> Note {
        Note::builder()
            .id(self.id)
            .character_id(self.character_id)
            .sender_id(self.sender_id)
            .message(self.message.clone())
            .flag(self.flag)
            .timestamp(self.timestamp)
            .build()
    }
}

/// Tenant-scoped note persistence.
///
/// Synchronous by contract (callers compose it inside lazy providers); the
/// Postgres implementation bridges onto the async pool internally.
pub trait NoteStore: Send + Sync {
    /// Insert a new note; the store assigns a monotonic id.
    fn create(&self, tenant_id: TenantId, note: NewNote) -> Result<NoteRecord, StoreError>;

    /// Replace the mutable fields of a live note.
    fn update(&self, tenant_id: TenantId, id: NoteId, update: NoteUpdate)
        -> Result<(), StoreError>;

    /// Point lookup of a live note.
    fn get_by_id(&self, tenant_id: TenantId, id: NoteId) -> Result<NoteRecord, StoreError>;

    /// All live notes for a character, in id order.
    fn list_by_character(
        &self,
        tenant_id: TenantId,
        character_id: CharacterId,
    ) -> Result<Vec<NoteRecord>, StoreError>;

    /// All live notes in the tenant, in id order.
    fn list_all(&self, tenant_id: TenantId) -> Result<Vec<NoteRecord>, StoreError>;

    /// Soft-delete one live note.
    fn delete_by_id(&self, tenant_id: TenantId, id: NoteId) -> Result<(), StoreError>;

    /// Soft-delete every live note for a character; returns the count.
    fn delete_by_character(
        &self,
        tenant_id: TenantId,
        character_id: CharacterId,
    ) -> Result<u64, StoreError>;
}

impl<S> NoteStore for std::sync::Arc<S>
where
    S: NoteStore + ?Sized,
{
    fn create(&self, tenant_id: TenantId, note: NewNote) -> Result<NoteRecord, StoreError> {
        (**self).create(tenant_id, note)
    }

    fn update(
        &self,
        tenant_id: TenantId,
        id: NoteId,
        update: NoteUpdate,
    ) -> Result<(), StoreError> {
        (**self).update(tenant_id, id, update)
    }

    fn get_by_id(&self, tenant_id: TenantId, id: NoteId) -> Result<NoteRecord, StoreError> {
        (**self).get_by_id(tenant_id, id)
    }

    fn list_by_character(
        &self,
        tenant_id: TenantId,
        character_id: CharacterId,
    ) -> Result<Vec<NoteRecord>, StoreError> {
        (**self).list_by_character(tenant_id, character_id)
    }

    fn list_all(&self, tenant_id: TenantId) -> Result<Vec<NoteRecord>, StoreError> {
        (**self).list_all(tenant_id)
    }

    fn delete_by_id(&self, tenant_id: TenantId, id: NoteId) -> Result<(), StoreError> {
        (**self).delete_by_id(tenant_id, id)
    }

    fn delete_by_character(
        &self,
        tenant_id: TenantId,
        character_id: CharacterId,
    ) -> Result<u64, StoreError> {
        (**self).delete_by_character(tenant_id, character_id)
    }
}
