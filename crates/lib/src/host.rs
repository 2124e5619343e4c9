//! Host capability: the parent frame, document height and location of the embedding context.
//!
//! The SDK never touches a browser global directly; everything it needs from the
//! embedding context goes through [`Host`]. [`QueueHost`] is an in-process host that
//! forwards envelopes into a tokio channel.

use crate::message::Message;
use crate::query;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, RwLock};
use tokio::sync::mpsc;

/// Capabilities of the embedding context.
pub trait Host: Send + Sync {
    /// Deliver an envelope to the parent context (wildcard target, no acknowledgment).
    fn send_to_parent(&self, message: &Message);

    /// Current document scroll height in pixels.
    fn current_height(&self) -> u32;

    /// Location search string, e.g. `?resizeId=abc`.
    fn location_search(&self) -> String;

    /// Look up a query-string parameter of the current location.
    fn query_param(&self, name: &str) -> Option<String> {
        query::query_param(&self.location_search(), name)
    }
}

/// Post an envelope to the parent. Fire-and-forget: no origin check, no delivery guarantee.
pub fn post_app_message(host: &dyn Host, message: &Message) {
    log::debug!("posting {} to parent", message.type_name());
    host.send_to_parent(message);
}

/// Host that forwards posted envelopes to an unbounded mpsc receiver.
///
/// Height and location are set by the owner; useful for native embeddings
/// and for driving the SDK without a browser.
pub struct QueueHost {
    tx: mpsc::UnboundedSender<Message>,
    height: AtomicU32,
    search: RwLock<String>,
}

impl QueueHost {
    pub fn new(search: impl Into<String>) -> (Arc<Self>, mpsc::UnboundedReceiver<Message>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let host = Arc::new(Self {
            tx,
            height: AtomicU32::new(0),
            search: RwLock::new(search.into()),
        });
        (host, rx)
    }

    pub fn set_height(&self, height: u32) {
        self.height.store(height, Ordering::SeqCst);
    }

    pub fn set_location_search(&self, search: impl Into<String>) {
        let mut g = self.search.write().unwrap_or_else(|e| e.into_inner());
        *g = search.into();
    }
}

impl Host for QueueHost {
    fn send_to_parent(&self, message: &Message) {
        if self.tx.send(message.clone()).is_err() {
            log::debug!("queue host: receiver dropped, discarding {}", message.type_name());
        }
    }

    fn current_height(&self) -> u32 {
        self.height.load(Ordering::SeqCst)
    }

    fn location_search(&self) -> String {
        self.search.read().unwrap_or_else(|e| e.into_inner()).clone()
    }
}
