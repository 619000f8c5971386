//! Status-event construction.
//!
//! One constructor per event kind; each yields a lazy provider of staged
//! messages keyed by the owning character, ready for `EventBuffer::put`.

use serde::Serialize;

use scribe_core::{CharacterId, DomainError, Note, NoteId, Provider};
use scribe_events::message::{
    NoteCreatedBody, NoteDeletedBody, NoteStatusEvent, NoteUpdatedBody, STATUS_EVENT_TYPE_CREATED,
    STATUS_EVENT_TYPE_DELETED, STATUS_EVENT_TYPE_UPDATED,
};
use scribe_events::{partition_key, BufferedMessage};

fn single_message<B: Serialize + Send + Sync + 'static>(
    event: NoteStatusEvent<B>,
) -> Provider<Vec<BufferedMessage>> {
    Provider::new(move || {
        let payload = serde_json::to_value(&event)
            .map_err(|e| DomainError::validation(format!("event serialization failed: {e}")))?;
        Ok(vec![BufferedMessage {
            partition_key: partition_key(event.character_id),
            payload,
        }])
    })
}

/// Status event for a freshly created note, built from the committed row.
pub fn note_created(note: &Note) -> Provider<Vec<BufferedMessage>> {
    single_message(NoteStatusEvent {
        character_id: note.character_id(),
        kind: STATUS_EVENT_TYPE_CREATED.to_string(),
        body: NoteCreatedBody {
            note_id: note.id(),
            sender_id: note.sender_id(),
            message: note.message().to_string(),
            flag: note.flag(),
            time: note.timestamp(),
        },
    })
}

/// Status event for an updated note, built from the re-read committed row.
pub fn note_updated(note: &Note) -> Provider<Vec<BufferedMessage>> {
    single_message(NoteStatusEvent {
        character_id: note.character_id(),
        kind: STATUS_EVENT_TYPE_UPDATED.to_string(),
        body: NoteUpdatedBody {
            note_id: note.id(),
            sender_id: note.sender_id(),
            message: note.message().to_string(),
            flag: note.flag(),
            time: note.timestamp(),
        },
    })
}

/// Status event for a deleted note.
pub fn note_deleted(character_id: CharacterId, note_id: NoteId) -> Provider<Vec<BufferedMessage>> {
    single_message(NoteStatusEvent {
        character_id,
        kind: STATUS_EVENT_TYPE_DELETED.to_string(),
        body: NoteDeletedBody { note_id },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use scribe_core::NoteBuilder;

    #[test]
    fn created_event_carries_note_fields_and_character_key() {
        let note = NoteBuilder::new()
            .id(NoteId::new(5))
            .character_id(CharacterId::new(1))
            .sender_id(CharacterId::new(2))
            .message("Hello!")
            .build();

        let staged = note_created(&note).get().unwrap();
        assert_eq!(staged.len(), 1);
        assert_eq!(staged[0].partition_key, partition_key(CharacterId::new(1)));
        assert_eq!(staged[0].payload["type"], "CREATED");
        assert_eq!(staged[0].payload["characterId"], 1);
        assert_eq!(staged[0].payload["body"]["noteId"], 5);
        assert_eq!(staged[0].payload["body"]["message"], "Hello!");
    }

    #[test]
    fn deleted_event_carries_only_the_note_id() {
        let staged = note_deleted(CharacterId::new(3), NoteId::new(7))
            .get()
            .unwrap();
        assert_eq!(staged[0].payload["type"], "DELETED");
        assert_eq!(staged[0].payload["body"]["noteId"], 7);
        assert!(staged[0].payload["body"].get("message").is_none());
    }
}
