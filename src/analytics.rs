use async_channel::{Receiver, Sender};
use log::{info, warn};
use serde::Serialize;
use uuid::Uuid;

/// Structured events pushed to the process-wide analytics queue. Delivery is
/// fire-and-forget; a full or closed queue drops the event.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    PageView { path: String },
    MapViewed { marker_count: usize },
    MarkerClick { property_id: Uuid, title: String },
    ListingUploaded { title: String, external: bool },
}

pub fn channel() -> (Sender<Event>, Receiver<Event>) {
    async_channel::unbounded()
}

pub fn track(sender: &Sender<Event>, event: Event) {
    if let Err(e) = sender.try_send(event) {
        warn!("Dropped analytics event: {}", e);
    }
}

/// Drains the queue and hands events to the external sink. The only sink in
/// this deployment is the log.
pub async fn run_sink(receiver: Receiver<Event>) {
    while let Ok(event) = receiver.recv().await {
        match serde_json::to_string(&event) {
            Ok(json) => info!("analytics {}", json),
            Err(e) => warn!("Unserializable analytics event: {}", e),
        }
    }
}
