//! Lifecycle event publication.
//!
//! The orchestrator publishes [`DomainEvent`]s strictly after its transaction
//! commits. Publication is fire-and-forget: a failing publisher is logged by
//! the caller and never unwinds the committed work.

use async_trait::async_trait;
use tokio::sync::broadcast;

use quire_model::DomainEvent;

use crate::Result;

/// Outbound port for lifecycle events. At-least-once; ordering is preserved
/// only within a single publishing call site.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: DomainEvent) -> Result<()>;
}

/// Lightweight in-process event bus that fans lifecycle events out to
/// subscribers inside the runtime. This keeps the wiring flexible while we
/// decide how and when to plug in an external message broker.
#[derive(Debug)]
pub struct InProcEventBus {
    sender: broadcast::Sender<DomainEvent>,
}

impl InProcEventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.sender.subscribe()
    }
}

#[async_trait]
impl EventPublisher for InProcEventBus {
    async fn publish(&self, event: DomainEvent) -> Result<()> {
        // A send with no live receivers is not a failure.
        let _ = self.sender.send(event);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quire_model::{Library, Series};

    #[tokio::test]
    async fn subscribers_see_events_in_publish_order() {
        let bus = InProcEventBus::new(8);
        let mut rx = bus.subscribe();

        let series = Series::new(Library::new("Shelf").id, "Dune");
        bus.publish(DomainEvent::SeriesAdded(series.clone()))
            .await
            .unwrap();
        bus.publish(DomainEvent::SeriesUpdated(series.clone()))
            .await
            .unwrap();

        assert_eq!(rx.recv().await.unwrap(), DomainEvent::SeriesAdded(series.clone()));
        assert_eq!(rx.recv().await.unwrap(), DomainEvent::SeriesUpdated(series));
    }

    #[tokio::test]
    async fn publishing_without_subscribers_is_fine() {
        let bus = InProcEventBus::new(8);
        let series = Series::new(Library::new("Shelf").id, "Dune");
        bus.publish(DomainEvent::SeriesDeleted(series)).await.unwrap();
    }
}
