//! # Quire Core
//!
//! Core library for the Quire media library server: the series lifecycle
//! orchestrator and its collaborators.
//!
//! ## Overview
//!
//! `quire-core` owns the consistency rules for hierarchical media collections
//! (series containing ordered books):
//!
//! - **Series Lifecycle**: creation, book-set mutation, renumbering, soft and
//!   hard deletion cascades
//! - **Read Progress**: per-user bulk mark-read and clear operations
//! - **Cover Selection**: selected-thumbnail invariants with self-healing
//!   housekeeping
//! - **Ports**: narrow repository traits behind which storage adapters live
//! - **Events**: lifecycle events published after commit for subscribers
//!
//! Storage, HTTP transport, and authentication are external to this crate and
//! reach it only through the traits in [`persistence`], [`events`], and
//! [`tasks`].
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use quire_core::domain::books::BookLifecycleService;
//! use quire_core::domain::series::SeriesLifecycleService;
//! use quire_core::events::InProcEventBus;
//! use quire_core::persistence::memory::MemoryStore;
//! use quire_core::tasks::QueuedTaskTrigger;
//! use quire_model::{Library, Series};
//!
//! async fn bootstrap() -> quire_core::Result<Series> {
//!     let store = MemoryStore::new();
//!     let stores = store.stores();
//!     let events = Arc::new(InProcEventBus::new(64));
//!     let (tasks, _rx) = QueuedTaskTrigger::new();
//!     let books = Arc::new(BookLifecycleService::new(stores.clone()));
//!     let lifecycle = SeriesLifecycleService::new(
//!         stores,
//!         books,
//!         events,
//!         Arc::new(tasks),
//!     );
//!
//!     let library = Library::new("Shelf");
//!     lifecycle.create_series(Series::new(library.id, "Dune")).await
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs)]

/// Runtime configuration merged from file and environment sources
pub mod config;

/// Business services: the series lifecycle orchestrator and book lifecycle
pub mod domain;

/// Error taxonomy shared across the crate
pub mod error;

/// Event publisher port and in-process fan-out bus
pub mod events;

/// Repository ports, transaction scope, and the in-memory adapter
pub mod persistence;

/// Asynchronous task trigger port and queue adapter
pub mod tasks;

pub use error::{CoreError, Result};
