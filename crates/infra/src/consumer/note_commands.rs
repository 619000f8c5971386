//! Note command feed (CREATE / DISCARD).

use std::sync::Arc;

use serde_json::Value as JsonValue;

use scribe_core::{DomainError, DomainResult};
use scribe_events::message::{
    NoteCommand, NoteCreateCommandBody, NoteDiscardCommandBody, COMMAND_TYPE_CREATE,
    COMMAND_TYPE_DISCARD,
};
use scribe_events::{topics, BusMessage, EventBus};

use super::{spawn_worker, WorkerHandle};
use crate::note_store::NoteStore;
use crate::processor::NoteProcessor;

/// Decodes note commands and drives the processor.
///
/// A processor is built per message from the message's tenant, so one
/// consumer serves every tenant on the topic. Unrecognized command subtypes
/// are ignored silently (not an error); malformed payloads are surfaced so
/// the worker loop logs and skips them.
pub struct NoteCommandConsumer<S: ?Sized, B> {
    store: Arc<S>,
    bus: B,
}

impl<S, B> NoteCommandConsumer<S, B>
where
    S: NoteStore + ?Sized + 'static,
    B: EventBus<BusMessage> + Clone + Send + Sync + 'static,
{
    pub fn new(store: Arc<S>, bus: B) -> Self {
        Self { store, bus }
    }

    /// Subscribe and process commands on a background thread.
    pub fn spawn(self) -> WorkerHandle {
        let subscription = self.bus.subscribe();
        spawn_worker(
            "note_command",
            subscription,
            topics::note_command(),
            move |message| self.handle(message),
        )
    }

    pub fn handle(&self, message: BusMessage) -> DomainResult<()> {
        let tenant_id = message.tenant_id;
        let command: NoteCommand<JsonValue> = serde_json::from_value(message.payload)
            .map_err(|e| DomainError::validation(format!("malformed note command: {e}")))?;

        let processor = NoteProcessor::new(tenant_id, Arc::clone(&self.store), self.bus.clone());

        match command.kind.as_str() {
            COMMAND_TYPE_CREATE => {
                let body: NoteCreateCommandBody = serde_json::from_value(command.body)
                    .map_err(|e| DomainError::validation(format!("malformed CREATE body: {e}")))?;
                processor.create_and_emit(
                    command.character_id,
                    body.sender_id,
                    &body.message,
                    body.flag,
                )?;
                Ok(())
            }
            COMMAND_TYPE_DISCARD => {
                let body: NoteDiscardCommandBody = serde_json::from_value(command.body)
                    .map_err(|e| DomainError::validation(format!("malformed DISCARD body: {e}")))?;
                processor.discard_and_emit(command.character_id, &body.note_ids)
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note_store::InMemoryNoteStore;
    use scribe_core::{CharacterId, TenantId};
    use scribe_events::InMemoryEventBus;

    type TestBus = Arc<InMemoryEventBus<BusMessage>>;

    fn consumer() -> (NoteCommandConsumer<InMemoryNoteStore, TestBus>, TestBus) {
        let store = Arc::new(InMemoryNoteStore::new());
        let bus: TestBus = Arc::new(InMemoryEventBus::new());
        (NoteCommandConsumer::new(store, Arc::clone(&bus)), bus)
    }

    fn command_message(tenant_id: TenantId, payload: serde_json::Value) -> BusMessage {
        BusMessage {
            topic: topics::note_command(),
            partition_key: vec![],
            tenant_id,
            payload,
        }
    }

    #[test]
    fn create_command_creates_note_and_emits_status() {
        let (consumer, bus) = consumer();
        let status = bus.subscribe();
        let tenant = TenantId::new();

        consumer
            .handle(command_message(
                tenant,
                serde_json::json!({
                    "characterId": 1,
                    "type": "CREATE",
                    "body": { "senderId": 2, "message": "Hello!", "flag": 0 }
                }),
            ))
            .unwrap();

        let processor =
            NoteProcessor::new(tenant, Arc::clone(&consumer.store), consumer.bus.clone());
        let notes = processor.by_character(CharacterId::new(1)).get().unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].message(), "Hello!");

        let event = status.try_recv().unwrap();
        assert_eq!(event.topic, topics::note_status());
        assert_eq!(event.payload["type"], "CREATED");
    }

    #[test]
    fn discard_command_deletes_listed_notes() {
        let (consumer, bus) = consumer();
        let tenant = TenantId::new();
        let processor =
            NoteProcessor::new(tenant, Arc::clone(&consumer.store), Arc::clone(&bus));
        let a = processor
            .create_and_emit(CharacterId::new(1), CharacterId::new(2), "a", 0)
            .unwrap();
        let status = bus.subscribe();

        consumer
            .handle(command_message(
                tenant,
                serde_json::json!({
                    "characterId": 1,
                    "type": "DISCARD",
                    "body": { "noteIds": [a.id().as_u32()] }
                }),
            ))
            .unwrap();

        assert!(processor
            .by_character(CharacterId::new(1))
            .get()
            .unwrap()
            .is_empty());
        assert_eq!(status.try_recv().unwrap().payload["type"], "DELETED");
    }

    #[test]
    fn unrecognized_subtype_is_ignored_silently() {
        let (consumer, bus) = consumer();
        let status = bus.subscribe();

        consumer
            .handle(command_message(
                TenantId::new(),
                serde_json::json!({
                    "characterId": 1,
                    "type": "SOMETHING_ELSE",
                    "body": {}
                }),
            ))
            .unwrap();

        assert!(status.try_recv().is_err());
    }

    #[test]
    fn malformed_payload_is_an_error() {
        let (consumer, _bus) = consumer();

        let err = consumer
            .handle(command_message(
                TenantId::new(),
                serde_json::json!({ "not": "a command" }),
            ))
            .unwrap_err();

        assert!(matches!(err, scribe_core::DomainError::Validation(_)));
    }

    #[test]
    fn spawned_worker_processes_commands_from_the_bus() {
        let (consumer, bus) = consumer();
        let store = Arc::clone(&consumer.store);
        let tenant = TenantId::new();

        let handle = consumer.spawn();
        bus.publish(command_message(
            tenant,
            serde_json::json!({
                "characterId": 1,
                "type": "CREATE",
                "body": { "senderId": 2, "message": "from the feed", "flag": 0 }
            }),
        ))
        .unwrap();

        // Wait for the worker thread to pick the command up.
        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(2);
        loop {
            let notes = store.list_all(tenant).unwrap();
            if !notes.is_empty() {
                assert_eq!(notes[0].message, "from the feed");
                break;
            }
            assert!(std::time::Instant::now() < deadline, "command never processed");
            std::thread::sleep(std::time::Duration::from_millis(10));
        }

        handle.shutdown();
    }
}
