//! Topic name resolution.
//!
//! Topic names come from the environment so deployments can route the
//! service onto shared brokers without code changes; the defaults are what
//! local dev and the in-memory bus use.

pub const ENV_EVENT_TOPIC_NOTE_STATUS: &str = "EVENT_TOPIC_NOTE_STATUS";
pub const ENV_COMMAND_TOPIC_NOTE: &str = "COMMAND_TOPIC_NOTE";
pub const ENV_EVENT_TOPIC_CHARACTER_STATUS: &str = "EVENT_TOPIC_CHARACTER_STATUS";

fn from_env(var: &str, default: &str) -> String {
    std::env::var(var).unwrap_or_else(|_| default.to_string())
}

/// Outbound topic carrying note status events (CREATED/UPDATED/DELETED).
pub fn note_status() -> String {
    from_env(ENV_EVENT_TOPIC_NOTE_STATUS, "note-status")
}

/// Inbound topic carrying note commands (CREATE/DISCARD).
pub fn note_command() -> String {
    from_env(ENV_COMMAND_TOPIC_NOTE, "note-command")
}

/// Inbound topic carrying character lifecycle events.
pub fn character_status() -> String {
    from_env(ENV_EVENT_TOPIC_CHARACTER_STATUS, "character-status")
}
