//! Bus envelope and wire types for the note/character topics.
//!
//! The payload shapes mirror what subscribers on the other side of the bus
//! expect: a thin `{characterId, type, body}` envelope with a typed body per
//! event/command kind. Unknown `type` values are ignored by consumers, which
//! is what lets topics evolve without breaking existing services.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use scribe_core::{CharacterId, NoteId, TenantId};

/// A message on the bus: topic, partition key, tenant scope, JSON payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusMessage {
    pub topic: String,
    pub partition_key: Vec<u8>,
    pub tenant_id: TenantId,
    pub payload: JsonValue,
}

/// Helper trait for tenant-scoped messages.
///
/// Lets infrastructure (consumer loops, tenant filters) operate on any
/// message type that carries a tenant without knowing its payload.
pub trait TenantScoped {
    fn tenant_id(&self) -> TenantId;
}

impl TenantScoped for BusMessage {
    fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }
}

pub const STATUS_EVENT_TYPE_CREATED: &str = "CREATED";
pub const STATUS_EVENT_TYPE_UPDATED: &str = "UPDATED";
pub const STATUS_EVENT_TYPE_DELETED: &str = "DELETED";

pub const COMMAND_TYPE_CREATE: &str = "CREATE";
pub const COMMAND_TYPE_DISCARD: &str = "DISCARD";

/// Outbound status event on the note-status topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteStatusEvent<B> {
    pub character_id: CharacterId,
    #[serde(rename = "type")]
    pub kind: String,
    pub body: B,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteCreatedBody {
    pub note_id: NoteId,
    pub sender_id: CharacterId,
    pub message: String,
    pub flag: u8,
    pub time: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteUpdatedBody {
    pub note_id: NoteId,
    pub sender_id: CharacterId,
    pub message: String,
    pub flag: u8,
    pub time: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteDeletedBody {
    pub note_id: NoteId,
}

/// Inbound command on the note-command topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteCommand<B> {
    pub character_id: CharacterId,
    #[serde(rename = "type")]
    pub kind: String,
    pub body: B,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteCreateCommandBody {
    pub sender_id: CharacterId,
    pub message: String,
    pub flag: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteDiscardCommandBody {
    pub note_ids: Vec<NoteId>,
}

/// Inbound lifecycle event on the character-status topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterStatusEvent<B> {
    pub world_id: u8,
    pub character_id: CharacterId,
    #[serde(rename = "type")]
    pub kind: String,
    pub body: B,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterDeletedBody {}
