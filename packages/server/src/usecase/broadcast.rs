//! Fan-out of one stamped message to every registered participant.
//!
//! The recipient set is an immutable snapshot taken under the registry lock;
//! delivery happens after the lock is released and evictions are applied to
//! the live registry afterwards, one connection at a time.

use std::sync::Arc;

use crate::domain::{ChatMessage, ClientId, ClientRegistry, Unregistration};

/// What happened during one fan-out
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Number of recipients the message was handed to
    pub delivered: usize,
    /// Recipients whose stream was gone and who were removed from the registry
    pub evicted: Vec<ClientId>,
}

/// Delivers messages to every entry of a [`ClientRegistry`].
#[derive(Clone)]
pub struct Broadcaster {
    registry: Arc<dyn ClientRegistry>,
}

impl Broadcaster {
    pub fn new(registry: Arc<dyn ClientRegistry>) -> Self {
        Self { registry }
    }

    /// Deliver `message` to every participant in the current snapshot.
    ///
    /// Never fails: a recipient whose channel is closed is evicted and the
    /// fan-out continues with the others.
    pub async fn broadcast(&self, message: &ChatMessage) -> BroadcastReport {
        let recipients = self.registry.snapshot().await;
        let mut report = BroadcastReport::default();
        let mut failed = Vec::new();

        for entry in recipients {
            match entry.deliver(message.clone()) {
                Ok(()) => report.delivered += 1,
                Err(_) => failed.push(entry),
            }
        }

        for entry in failed {
            tracing::warn!(
                component = "Server",
                event = "DeliveryError",
                client_id = %entry.client_id(),
                lamport = message.logical_time.value(),
                "send failed: stream closed (removing client)"
            );
            let outcome = self
                .registry
                .unregister_connection(entry.client_id(), entry.connection_id)
                .await;
            if outcome == Unregistration::Removed {
                report.evicted.push(entry.client_id().clone());
            }
        }

        report
    }
}
