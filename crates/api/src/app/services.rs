//! Infrastructure wiring shared by HTTP handlers and consumer workers.

use std::sync::Arc;

use scribe_core::TenantId;
use scribe_events::{BusMessage, InMemoryEventBus};
use scribe_infra::consumer::{CharacterStatusConsumer, NoteCommandConsumer, WorkerHandle};
use scribe_infra::{InMemoryNoteStore, NoteProcessor, NoteStore, PostgresNoteStore};

/// The service bus type: in-process fan-out. A broker-backed deployment
/// swaps this for a client implementing the same `EventBus` trait.
pub type ServiceBus = Arc<InMemoryEventBus<BusMessage>>;

pub struct AppServices {
    store: Arc<dyn NoteStore>,
    bus: ServiceBus,
}

impl AppServices {
    /// Wire services from the environment: `DATABASE_URL` selects the
    /// Postgres store; without it the in-memory store backs dev runs.
    pub async fn from_env() -> Self {
        match std::env::var("DATABASE_URL") {
            Ok(url) => {
                let pool = sqlx::postgres::PgPoolOptions::new()
                    .max_connections(8)
                    .connect(&url)
                    .await
                    .expect("failed to connect to DATABASE_URL");
                tracing::info!("using postgres note store");
                Self::new(Arc::new(PostgresNoteStore::new(pool)))
            }
            Err(_) => {
                tracing::warn!("DATABASE_URL not set; using in-memory note store");
                Self::in_memory()
            }
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryNoteStore::new()))
    }

    pub fn new(store: Arc<dyn NoteStore>) -> Self {
        Self {
            store,
            bus: Arc::new(InMemoryEventBus::new()),
        }
    }

    pub fn bus(&self) -> ServiceBus {
        Arc::clone(&self.bus)
    }

    /// Tenant-scoped processor for one request or consumed message.
    pub fn processor(&self, tenant_id: TenantId) -> NoteProcessor<dyn NoteStore, ServiceBus> {
        NoteProcessor::new(tenant_id, Arc::clone(&self.store), self.bus())
    }

    /// Start the two inbound feeds (note commands, character lifecycle).
    pub fn spawn_consumers(&self) -> Vec<WorkerHandle> {
        vec![
            NoteCommandConsumer::new(Arc::clone(&self.store), self.bus()).spawn(),
            CharacterStatusConsumer::new(Arc::clone(&self.store), self.bus()).spawn(),
        ]
    }
}
