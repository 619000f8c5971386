//! Inbound message feeds.
//!
//! Each consumer owns one bus subscription and runs on its own thread,
//! decoding messages for its topic and invoking the processor. Handler
//! errors are logged and the message is skipped; retry, if any, belongs to
//! the feed's re-delivery mechanism, not to this loop.

mod character_status;
mod note_commands;

pub use character_status::CharacterStatusConsumer;
pub use note_commands::NoteCommandConsumer;

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use tracing::warn;

use scribe_core::DomainResult;
use scribe_events::{BusMessage, Subscription};

/// Handle to control and join a background consumer.
#[derive(Debug)]
pub struct WorkerHandle {
    shutdown: mpsc::Sender<()>,
    join: Option<thread::JoinHandle<()>>,
}

impl WorkerHandle {
    /// Request graceful shutdown and wait for the consumer to stop.
    pub fn shutdown(mut self) {
        let _ = self.shutdown.send(());
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }
}

/// Spawn a consumer thread that feeds messages for `topic` to `handler`.
fn spawn_worker<H>(
    name: &'static str,
    subscription: Subscription<BusMessage>,
    topic: String,
    mut handler: H,
) -> WorkerHandle
where
    H: FnMut(BusMessage) -> DomainResult<()> + Send + 'static,
{
    let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();

    let join = thread::Builder::new()
        .name(name.to_string())
        .spawn(move || {
            let tick = Duration::from_millis(250);
            loop {
                if shutdown_rx.try_recv().is_ok() {
                    break;
                }

                match subscription.recv_timeout(tick) {
                    Ok(message) => {
                        if message.topic != topic {
                            continue;
                        }
                        if let Err(err) = handler(message) {
                            warn!(consumer = name, error = %err, "consumer handler failed");
                        }
                    }
                    Err(std::sync::mpsc::RecvTimeoutError::Timeout) => continue,
                    Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => break,
                }
            }
        })
        .expect("failed to spawn consumer thread");

    WorkerHandle {
        shutdown: shutdown_tx,
        join: Some(join),
    }
}
