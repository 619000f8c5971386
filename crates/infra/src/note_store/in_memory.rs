//! In-memory note store for tests/dev.

use std::sync::RwLock;

use chrono::Utc;

use scribe_core::{CharacterId, NoteId, TenantId};

use super::{NewNote, NoteRecord, NoteStore, NoteUpdate, StoreError};

/// In-memory store with the same observable semantics as Postgres:
/// monotonic id assignment, tenant scoping, soft delete.
///
/// Not optimized; rows are scanned linearly, which keeps listing in id
/// (insertion) order for free.
#[derive(Debug, Default)]
pub struct InMemoryNoteStore {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    next_id: u32,
    rows: Vec<NoteRecord>,
}

impl InMemoryNoteStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> StoreError {
    StoreError::Backend("lock poisoned".to_string())
}

fn is_live(row: &NoteRecord, tenant_id: TenantId) -> bool {
    row.tenant_id == tenant_id && row.deleted_at.is_none()
}

impl NoteStore for InMemoryNoteStore {
    fn create(&self, tenant_id: TenantId, note: NewNote) -> Result<NoteRecord, StoreError> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;

        inner.next_id += 1;
        let now = Utc::now();
        let record = NoteRecord {
            id: NoteId::new(inner.next_id),
            tenant_id,
            character_id: note.character_id,
            sender_id: note.sender_id,
            message: note.message,
            flag: note.flag,
            timestamp: note.timestamp,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        inner.rows.push(record.clone());
        Ok(record)
    }

    fn update(
        &self,
        tenant_id: TenantId,
        id: NoteId,
        update: NoteUpdate,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;

        let row = inner
            .rows
            .iter_mut()
            .find(|r| r.id == id && is_live(r, tenant_id))
            .ok_or(StoreError::NotFound)?;

        row.character_id = update.character_id;
        row.sender_id = update.sender_id;
        row.message = update.message;
        row.flag = update.flag;
        if let Some(timestamp) = update.timestamp {
            row.timestamp = timestamp;
        }
        row.updated_at = Utc::now();
        Ok(())
    }

    fn get_by_id(&self, tenant_id: TenantId, id: NoteId) -> Result<NoteRecord, StoreError> {
        let inner = self.inner.read().map_err(|_| poisoned())?;

        inner
            .rows
            .iter()
            .find(|r| r.id == id && is_live(r, tenant_id))
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    fn list_by_character(
        &self,
        tenant_id: TenantId,
        character_id: CharacterId,
    ) -> Result<Vec<NoteRecord>, StoreError> {
        let inner = self.inner.read().map_err(|_| poisoned())?;

        Ok(inner
            .rows
            .iter()
            .filter(|r| r.character_id == character_id && is_live(r, tenant_id))
            .cloned()
            .collect())
    }

    fn list_all(&self, tenant_id: TenantId) -> Result<Vec<NoteRecord>, StoreError> {
        let inner = self.inner.read().map_err(|_| poisoned())?;

        Ok(inner
            .rows
            .iter()
            .filter(|r| is_live(r, tenant_id))
            .cloned()
            .collect())
    }

    fn delete_by_id(&self, tenant_id: TenantId, id: NoteId) -> Result<(), StoreError> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;

        let row = inner
            .rows
            .iter_mut()
            .find(|r| r.id == id && is_live(r, tenant_id))
            .ok_or(StoreError::NotFound)?;

        row.deleted_at = Some(Utc::now());
        Ok(())
    }

    fn delete_by_character(
        &self,
        tenant_id: TenantId,
        character_id: CharacterId,
    ) -> Result<u64, StoreError> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;

        let now = Utc::now();
        let mut affected = 0u64;
        for row in inner
            .rows
            .iter_mut()
            .filter(|r| r.character_id == character_id && is_live(r, tenant_id))
        {
            row.deleted_at = Some(now);
            affected += 1;
        }
        Ok(affected)
    }
}
