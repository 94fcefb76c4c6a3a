//! Storage boundary of the lifecycle core.
//!
//! Repository ports (interfaces) grouped per entity. These keep the domain
//! services independent from any concrete storage engine; adapters implement
//! the ports and are composed into a [`unit_of_work::SeriesStores`] façade.

pub mod memory;
pub mod ports;
pub mod unit_of_work;

pub use unit_of_work::{
    SeriesStores, SeriesStoresBuilder, TransactionHandle, TransactionScope, with_transaction,
};
