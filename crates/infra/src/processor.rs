//! Note command/event processor.
//!
//! Orchestrates every write as two phases. The *buffered* form takes an
//! explicit [`EventBuffer`], performs the store mutation, and stages the
//! resulting status event(s); the `_and_emit` form wraps it with
//! [`emit_with_result`]/[`emit`], which publish the buffer only when the
//! buffered form returned `Ok`. Reads are lazy providers with no buffering.
//!
//! A processor instance is tenant-scoped: it is constructed per request or
//! per consumed message from the tenant in context, and no operation can
//! observe another tenant's notes.

use std::sync::Arc;

use tracing::debug;

use scribe_core::{CharacterId, DomainResult, Note, NoteBuilder, NoteId, Provider, TenantId};
use scribe_events::{emit, emit_with_result, topics, BusMessage, EventBuffer, EventBus};

use crate::note_store::{NewNote, NoteStore, NoteUpdate};
use crate::producer;
use crate::publisher::Publisher;

pub struct NoteProcessor<S: ?Sized, B> {
    tenant_id: TenantId,
    store: Arc<S>,
    publisher: Publisher<B>,
}

impl<S, B> NoteProcessor<S, B>
where
    S: NoteStore + ?Sized + 'static,
    B: EventBus<BusMessage>,
{
    pub fn new(tenant_id: TenantId, store: Arc<S>, bus: B) -> Self {
        Self {
            tenant_id,
            store,
            publisher: Publisher::new(bus, tenant_id),
        }
    }

    pub fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    /// Create a note with a server-set timestamp and stage a CREATED event
    /// built from the committed row.
    pub fn create(
        &self,
        buffer: &mut EventBuffer,
        character_id: CharacterId,
        sender_id: CharacterId,
        message: &str,
        flag: u8,
    ) -> DomainResult<Note> {
        debug!(tenant_id = %self.tenant_id, %character_id, "creating note");

        let draft = NoteBuilder::new()
            .character_id(character_id)
            .sender_id(sender_id)
            .message(message)
            .flag(flag)
            .build();

        let record = self.store.create(
            self.tenant_id,
            NewNote {
                character_id: draft.character_id(),
                sender_id: draft.sender_id(),
                message: draft.message().to_string(),
                flag: draft.flag(),
                timestamp: draft.timestamp(),
            },
        )?;

        let note = record.to_note();
        buffer.put(topics::note_status(), producer::note_created(&note))?;
        Ok(note)
    }

    pub fn create_and_emit(
        &self,
        character_id: CharacterId,
        sender_id: CharacterId,
        message: &str,
        flag: u8,
    ) -> DomainResult<Note> {
        emit_with_result(&self.publisher, |buffer| {
            self.create(buffer, character_id, sender_id, message, flag)
        })
    }

    /// Replace a note's mutable fields, then re-read the committed row so the
    /// staged UPDATED event reflects the actually-persisted state rather than
    /// the caller-supplied one.
    pub fn update(
        &self,
        buffer: &mut EventBuffer,
        id: NoteId,
        character_id: CharacterId,
        sender_id: CharacterId,
        message: &str,
        flag: u8,
    ) -> DomainResult<Note> {
        debug!(tenant_id = %self.tenant_id, %id, "updating note");

        self.store.update(
            self.tenant_id,
            id,
            NoteUpdate {
                character_id,
                sender_id,
                message: message.to_string(),
                flag,
                timestamp: None,
            },
        )?;

        let record = self.store.get_by_id(self.tenant_id, id)?;
        let note = record.to_note();
        buffer.put(topics::note_status(), producer::note_updated(&note))?;
        Ok(note)
    }

    pub fn update_and_emit(
        &self,
        id: NoteId,
        character_id: CharacterId,
        sender_id: CharacterId,
        message: &str,
        flag: u8,
    ) -> DomainResult<Note> {
        emit_with_result(&self.publisher, |buffer| {
            self.update(buffer, id, character_id, sender_id, message, flag)
        })
    }

    /// Delete one note. The prior lookup supplies the character id for the
    /// event key; if the lookup fails nothing is mutated or staged. If the
    /// delete itself fails, the staged DELETED event never leaves this
    /// operation because the emit wrapper discards the buffer on error.
    pub fn delete(&self, buffer: &mut EventBuffer, id: NoteId) -> DomainResult<()> {
        debug!(tenant_id = %self.tenant_id, %id, "deleting note");

        let record = self.store.get_by_id(self.tenant_id, id)?;
        self.store.delete_by_id(self.tenant_id, id)?;
        buffer.put(
            topics::note_status(),
            producer::note_deleted(record.character_id, id),
        )?;
        Ok(())
    }

    pub fn delete_and_emit(&self, id: NoteId) -> DomainResult<()> {
        emit(&self.publisher, |buffer| self.delete(buffer, id))
    }

    /// Delete every note for a character: stage one DELETED per note in
    /// listing order, then remove all matching rows in one statement.
    pub fn delete_all(
        &self,
        buffer: &mut EventBuffer,
        character_id: CharacterId,
    ) -> DomainResult<()> {
        debug!(tenant_id = %self.tenant_id, %character_id, "deleting all notes for character");

        let records = self.store.list_by_character(self.tenant_id, character_id)?;
        for record in &records {
            buffer.put(
                topics::note_status(),
                producer::note_deleted(record.character_id, record.id),
            )?;
        }
        self.store.delete_by_character(self.tenant_id, character_id)?;
        Ok(())
    }

    pub fn delete_all_and_emit(&self, character_id: CharacterId) -> DomainResult<()> {
        emit(&self.publisher, |buffer| {
            self.delete_all(buffer, character_id)
        })
    }

    /// Discard an explicit list of notes (inbound DISCARD command). Each id
    /// goes through the buffered delete path; a failure on any id aborts the
    /// remainder and nothing is published.
    pub fn discard(
        &self,
        buffer: &mut EventBuffer,
        character_id: CharacterId,
        note_ids: &[NoteId],
    ) -> DomainResult<()> {
        debug!(tenant_id = %self.tenant_id, %character_id, count = note_ids.len(), "discarding notes");

        for id in note_ids {
            self.delete(buffer, *id)?;
        }
        Ok(())
    }

    pub fn discard_and_emit(
        &self,
        character_id: CharacterId,
        note_ids: &[NoteId],
    ) -> DomainResult<()> {
        emit(&self.publisher, |buffer| {
            self.discard(buffer, character_id, note_ids)
        })
    }

    /// Lazy point read.
    pub fn by_id(&self, id: NoteId) -> Provider<Note> {
        let store = Arc::clone(&self.store);
        let tenant_id = self.tenant_id;
        Provider::new(move || Ok(store.get_by_id(tenant_id, id)?.to_note()))
    }

    /// Lazy list of a character's notes, mapped through the domain
    /// constructor concurrently with retrieval order preserved.
    pub fn by_character(&self, character_id: CharacterId) -> Provider<Vec<Note>> {
        let store = Arc::clone(&self.store);
        let tenant_id = self.tenant_id;
        Provider::new(move || Ok(store.list_by_character(tenant_id, character_id)?))
            .par_map_seq(|record| Ok(record.to_note()))
    }

    /// Lazy list of every note in the tenant.
    pub fn in_tenant(&self) -> Provider<Vec<Note>> {
        let store = Arc::clone(&self.store);
        let tenant_id = self.tenant_id;
        Provider::new(move || Ok(store.list_all(tenant_id)?))
            .par_map_seq(|record| Ok(record.to_note()))
    }
}
