//! The note aggregate.

use chrono::{DateTime, Utc};

use crate::id::{CharacterId, NoteId};

/// A note attached to a character.
///
/// Immutable snapshot of the domain state; mutation happens through the
/// processor, which always goes through the store and hands back a fresh
/// `Note`. The `timestamp` is set once at creation and survives updates
/// unless explicitly re-supplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    id: NoteId,
    character_id: CharacterId,
    sender_id: CharacterId,
    message: String,
    flag: u8,
    timestamp: DateTime<Utc>,
}

impl Note {
    pub fn builder() -> NoteBuilder {
        NoteBuilder::new()
    }

    pub fn id(&self) -> NoteId {
        self.id
    }

    pub fn character_id(&self) -> CharacterId {
        self.character_id
    }

    pub fn sender_id(&self) -> CharacterId {
        self.sender_id
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn flag(&self) -> u8 {
        self.flag
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Builder for [`Note`].
///
/// Defaults the timestamp to `Utc::now()`, so a freshly built note carries
/// the server-side creation time unless a stored timestamp is supplied.
#[derive(Debug, Clone)]
pub struct NoteBuilder {
    id: NoteId,
    character_id: CharacterId,
    sender_id: CharacterId,
    message: String,
    flag: u8,
    timestamp: DateTime<Utc>,
}

impl NoteBuilder {
    pub fn new() -> Self {
        Self {
            id: NoteId::new(0),
            character_id: CharacterId::new(0),
            sender_id: CharacterId::new(0),
            message: String::new(),
            flag: 0,
            timestamp: Utc::now(),
        }
    }

    pub fn id(mut self, id: NoteId) -> Self {
        self.id = id;
        self
    }

    pub fn character_id(mut self, character_id: CharacterId) -> Self {
        self.character_id = character_id;
        self
    }

    pub fn sender_id(mut self, sender_id: CharacterId) -> Self {
        self.sender_id = sender_id;
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn flag(mut self, flag: u8) -> Self {
        self.flag = flag;
        self
    }

    pub fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn build(self) -> Note {
        Note {
            id: self.id,
            character_id: self.character_id,
            sender_id: self.sender_id,
            message: self.message,
            flag: self.flag,
            timestamp: self.timestamp,
        }
    }
}

impl Default for NoteBuilder {
    fn default() -> Self {
        Self::new()
    }
}
