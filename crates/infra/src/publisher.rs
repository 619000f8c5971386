//! Buffer-to-bus delivery.

use tracing::warn;

use scribe_core::{DomainError, DomainResult, TenantId};
use scribe_events::{BusMessage, EventBuffer, EventBus, Publish};

/// Delivers a drained buffer to the bus, tagging every message with the
/// owning tenant.
///
/// Sending is sequential in per-topic insertion order, so per-key ordering
/// on the bus matches buffer order. The first failed send aborts delivery
/// and surfaces as a `Publish` error; messages already sent stay sent
/// (best-effort, in-process — there is no durable outbox to retry from).
#[derive(Debug, Clone)]
pub struct Publisher<B> {
    bus: B,
    tenant_id: TenantId,
}

impl<B> Publisher<B> {
    pub fn new(bus: B, tenant_id: TenantId) -> Self {
        Self { bus, tenant_id }
    }
}

impl<B> Publish for Publisher<B>
where
    B: EventBus<BusMessage>,
{
    fn publish_all(&self, buffer: EventBuffer) -> DomainResult<()> {
        for (topic, messages) in buffer.into_topics() {
            for message in messages {
                self.bus
                    .publish(BusMessage {
                        topic: topic.clone(),
                        partition_key: message.partition_key,
                        tenant_id: self.tenant_id,
                        payload: message.payload,
                    })
                    .map_err(|e| {
                        warn!(topic = %topic, error = ?e, "bus send failed");
                        DomainError::publish(format!("send to '{topic}' failed: {e:?}"))
                    })?;
            }
        }
        Ok(())
    }
}
