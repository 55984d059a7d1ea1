use crate::core::{Batch, SampleSource};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// Named-event push boundary standing in for the batch transport.
///
/// Batches are published under an event key (the wire protocol uses names
/// like "metric:eeg"); every live subscriber of that event receives its own
/// copy. Dropping a receiver unregisters the listener on the next publish.
#[derive(Clone)]
pub struct EventHub {
    listeners: Arc<Mutex<HashMap<String, Vec<mpsc::Sender<Batch>>>>>,
    capacity: usize,
}

impl EventHub {
    pub fn new(capacity: usize) -> Self {
        Self {
            listeners: Arc::new(Mutex::new(HashMap::new())),
            capacity,
        }
    }

    /// Register a listener for one event name
    pub fn subscribe(&self, event: &str) -> mpsc::Receiver<Batch> {
        let (tx, rx) = mpsc::channel(self.capacity);
        let mut listeners = self.listeners.lock().unwrap();
        listeners.entry(event.to_string()).or_default().push(tx);
        rx
    }

    /// Deliver a batch to every live listener of the event, in
    /// registration order
    pub async fn publish(&self, event: &str, batch: Batch) {
        let targets: Vec<mpsc::Sender<Batch>> = {
            let mut listeners = self.listeners.lock().unwrap();
            if let Some(senders) = listeners.get_mut(event) {
                senders.retain(|tx| !tx.is_closed());
                senders.clone()
            } else {
                Vec::new()
            }
        };

        for tx in targets {
            // A listener that went away between the prune and the send is
            // simply skipped
            let _ = tx.send(batch.clone()).await;
        }
    }

    pub fn listener_count(&self, event: &str) -> usize {
        let mut listeners = self.listeners.lock().unwrap();
        match listeners.get_mut(event) {
            Some(senders) => {
                senders.retain(|tx| !tx.is_closed());
                senders.len()
            }
            None => 0,
        }
    }
}

impl Default for EventHub {
    fn default() -> Self {
        Self::new(16)
    }
}

/// `SampleSource` bound to one event name on a hub
pub struct EventSource {
    hub: EventHub,
    event: String,
}

impl EventSource {
    pub fn new(hub: &EventHub, event: impl Into<String>) -> Self {
        Self {
            hub: hub.clone(),
            event: event.into(),
        }
    }
}

#[async_trait]
impl SampleSource for EventSource {
    async fn subscribe(&mut self) -> Result<mpsc::Receiver<Batch>> {
        Ok(self.hub.subscribe(&self.event))
    }
}
