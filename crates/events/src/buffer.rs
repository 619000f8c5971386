//! Operation-scoped accumulator for not-yet-published messages.
//!
//! Every write operation gets a **fresh** buffer; buffers are never pooled
//! or shared across concurrent operations, so no locking is needed. Messages
//! sit in the buffer until the enclosing operation's store mutation has
//! committed, at which point the emission wrapper hands the whole buffer to
//! the publisher. If the operation fails, the buffer is dropped and nothing
//! ever reaches the bus.

use serde_json::Value as JsonValue;

use scribe_core::{DomainResult, Provider};

/// A message staged for publication: partition key + JSON payload.
///
/// Topic and tenant are attached at publish time (the buffer tracks the
/// topic; the publisher knows the tenant of the enclosing operation).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferedMessage {
    pub partition_key: Vec<u8>,
    pub payload: JsonValue,
}

/// Per-topic ordered queue of staged messages.
///
/// Insertion order within a topic is preserved; topics drain in first-put
/// order. An empty buffer is legal (an operation may fail before its first
/// put).
#[derive(Debug, Default)]
pub struct EventBuffer {
    topics: Vec<(String, Vec<BufferedMessage>)>,
}

impl EventBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluate `provider` eagerly and append its messages under `topic`.
    ///
    /// On provider failure the failure is returned and nothing is inserted.
    pub fn put(
        &mut self,
        topic: impl Into<String>,
        provider: Provider<Vec<BufferedMessage>>,
    ) -> DomainResult<()> {
        let messages = provider.get()?;
        let topic = topic.into();

        match self.topics.iter_mut().find(|(t, _)| *t == topic) {
            Some((_, queue)) => queue.extend(messages),
            None => self.topics.push((topic, messages)),
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.topics.iter().all(|(_, queue)| queue.is_empty())
    }

    /// Total number of staged messages across all topics.
    pub fn len(&self) -> usize {
        self.topics.iter().map(|(_, queue)| queue.len()).sum()
    }

    /// Drain the buffer: topics in first-put order, messages in insertion
    /// order within each topic.
    pub fn into_topics(self) -> Vec<(String, Vec<BufferedMessage>)> {
        self.topics
    }
}
