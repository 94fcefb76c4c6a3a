//! Business services built on top of the repository ports.

pub mod books;
pub mod series;

pub use books::{BookLifecycle, BookLifecycleService};
pub use series::SeriesLifecycleService;
