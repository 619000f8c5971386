//! Character lifecycle feed.
//!
//! When a character is deleted upstream, every note attached to it goes
//! away and one DELETED status event is emitted per removed note.

use std::sync::Arc;

use serde_json::Value as JsonValue;

use scribe_core::{DomainError, DomainResult};
use scribe_events::message::{CharacterStatusEvent, STATUS_EVENT_TYPE_DELETED};
use scribe_events::{topics, BusMessage, EventBus};

use super::{spawn_worker, WorkerHandle};
use crate::note_store::NoteStore;
use crate::processor::NoteProcessor;

pub struct CharacterStatusConsumer<S: ?Sized, B> {
    store: Arc<S>,
    bus: B,
}

impl<S, B> CharacterStatusConsumer<S, B>
where
    S: NoteStore + ?Sized + 'static,
    B: EventBus<BusMessage> + Clone + Send + Sync + 'static,
{
    pub fn new(store: Arc<S>, bus: B) -> Self {
        Self { store, bus }
    }

    /// Subscribe and process lifecycle events on a background thread.
    pub fn spawn(self) -> WorkerHandle {
        let subscription = self.bus.subscribe();
        spawn_worker(
            "character_status",
            subscription,
            topics::character_status(),
            move |message| self.handle(message),
        )
    }

    pub fn handle(&self, message: BusMessage) -> DomainResult<()> {
        let tenant_id = message.tenant_id;
        let event: CharacterStatusEvent<JsonValue> = serde_json::from_value(message.payload)
            .map_err(|e| DomainError::validation(format!("malformed character event: {e}")))?;

        if event.kind != STATUS_EVENT_TYPE_DELETED {
            return Ok(());
        }

        NoteProcessor::new(tenant_id, Arc::clone(&self.store), self.bus.clone())
            .delete_all_and_emit(event.character_id)
    }
}
