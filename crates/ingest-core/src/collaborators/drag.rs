//! Scoped subscriptions to the process-wide drag event stream.
//!
//! A `DragSubscription` owns its receiver and detaches itself from the
//! source when dropped, so a torn-down session never receives stale events.

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::models::DragEvent;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, Weak};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// A platform source of drag events.
pub trait DragEventSource: Send + Sync {
    /// Attach a new listener. The returned guard releases it on drop.
    fn subscribe(&self) -> Result<DragSubscription>;
}

/// Live listener on a drag event source.
pub struct DragSubscription {
    events: mpsc::Receiver<DragEvent>,
    unsubscribe: Option<Box<dyn FnOnce() + Send>>,
}

impl DragSubscription {
    /// Wrap a receiver together with the action that detaches it.
    pub fn new(events: mpsc::Receiver<DragEvent>, unsubscribe: impl FnOnce() + Send + 'static) -> Self {
        Self {
            events,
            unsubscribe: Some(Box::new(unsubscribe)),
        }
    }

    /// Next event, or `None` once the source is gone.
    pub async fn recv(&mut self) -> Option<DragEvent> {
        self.events.recv().await
    }
}

impl Drop for DragSubscription {
    fn drop(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl std::fmt::Debug for DragSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DragSubscription")
            .field("attached", &self.unsubscribe.is_some())
            .finish()
    }
}

#[derive(Default)]
struct Subscribers {
    next_id: u64,
    senders: HashMap<u64, mpsc::Sender<DragEvent>>,
}

/// In-process drag event source that fans events out to every subscriber.
#[derive(Clone, Default)]
pub struct ChannelDragSource {
    subscribers: Arc<Mutex<Subscribers>>,
}

impl ChannelDragSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver an event to every live subscriber. Returns how many received it.
    pub fn emit(&self, event: DragEvent) -> usize {
        let subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let mut delivered = 0;
        for (id, sender) in &subscribers.senders {
            match sender.try_send(event.clone()) {
                Ok(()) => delivered += 1,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    warn!("Drag subscriber {} is lagging, dropping {:?} event", id, event.kind);
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {}
            }
        }
        delivered
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .senders
            .len()
    }
}

impl DragEventSource for ChannelDragSource {
    fn subscribe(&self) -> Result<DragSubscription> {
        let (tx, rx) = mpsc::channel(PipelineConfig::DRAG_EVENT_BUFFER);

        let id = {
            let mut subscribers = self
                .subscribers
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            let id = subscribers.next_id;
            subscribers.next_id += 1;
            subscribers.senders.insert(id, tx);
            id
        };
        debug!("Drag subscriber {} attached", id);

        let registry: Weak<Mutex<Subscribers>> = Arc::downgrade(&self.subscribers);
        Ok(DragSubscription::new(rx, move || {
            if let Some(registry) = registry.upgrade() {
                registry
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .senders
                    .remove(&id);
                debug!("Drag subscriber {} detached", id);
            }
        }))
    }
}
