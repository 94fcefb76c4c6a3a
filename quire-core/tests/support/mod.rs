//! Shared wiring for the lifecycle integration tests.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};

use quire_core::config::CoreConfig;
use quire_core::domain::books::BookLifecycleService;
use quire_core::domain::series::SeriesLifecycleService;
use quire_core::events::InProcEventBus;
use quire_core::persistence::memory::MemoryStore;
use quire_core::tasks::{QueuedTaskTrigger, TaskRequest};
use quire_model::DomainEvent;

pub struct Fixture {
    pub store: MemoryStore,
    pub lifecycle: SeriesLifecycleService,
    pub events: broadcast::Receiver<DomainEvent>,
    pub tasks: mpsc::UnboundedReceiver<TaskRequest>,
}

pub fn fixture() -> Fixture {
    init_tracing();

    let config = CoreConfig::default();
    let store = MemoryStore::new();
    let stores = store.stores();
    let bus = Arc::new(InProcEventBus::new(config.event_capacity));
    let events = bus.subscribe();
    let (trigger, tasks) = QueuedTaskTrigger::new();

    let lifecycle = SeriesLifecycleService::new(
        stores.clone(),
        Arc::new(BookLifecycleService::new(stores)),
        bus,
        Arc::new(trigger),
    );

    Fixture {
        store,
        lifecycle,
        events,
        tasks,
    }
}

/// Drain whatever events are immediately available.
pub fn drain_events(rx: &mut broadcast::Receiver<DomainEvent>) -> Vec<DomainEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}
