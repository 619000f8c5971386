//! Flat note resource.
//!
//! Numeric fields travel as strings on the wire (the surrounding services
//! treat ids as opaque strings); parsing happens here and a bad numeric
//! yields a validation error before anything touches the store.

use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};

use scribe_core::{CharacterId, DomainResult, Note, NoteId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteResource {
    #[serde(default)]
    pub id: String,
    pub character_id: String,
    pub sender_id: String,
    pub message: String,
    pub flag: String,
    #[serde(default)]
    pub timestamp: String,
}

impl NoteResource {
    pub fn from_note(note: &Note) -> Self {
        Self {
            id: note.id().to_string(),
            character_id: note.character_id().to_string(),
            sender_id: note.sender_id().to_string(),
            message: note.message().to_string(),
            flag: note.flag().to_string(),
            timestamp: note
                .timestamp()
                .to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }

    /// Parse the writable fields. The id and timestamp are server-owned and
    /// ignored on input (the timestamp is never client-supplied).
    pub fn parse_input(&self) -> DomainResult<NoteInput> {
        Ok(NoteInput {
            character_id: self.character_id.parse()?,
            sender_id: self.sender_id.parse()?,
            message: self.message.clone(),
            flag: self
                .flag
                .parse::<u8>()
                .map_err(|e| scribe_core::DomainError::validation(format!("flag: {e}")))?,
        })
    }

    /// Parse the body id for routes that require one (PATCH).
    pub fn parse_id(&self) -> DomainResult<NoteId> {
        self.id.parse()
    }
}

/// Parsed, strongly-typed write fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteInput {
    pub character_id: CharacterId,
    pub sender_id: CharacterId,
    pub message: String,
    pub flag: u8,
}
