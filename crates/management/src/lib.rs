//! Campaign dashboard domain — campaigns, ad groups, keywords, metrics,
//! reports, logs and API quota held in one in-memory document.
//!
//! The initial document is generated from a seeded stream; mutations go
//! through `DataStore` actions that keep report rows and the API pause
//! flag consistent.

pub mod fixtures;
pub mod models;
pub mod random;
pub mod store;
pub mod ui;
pub mod views;

pub use fixtures::{Fixtures, IdSequence};
pub use random::SeededStream;
pub use store::{Clock, DataStore};
pub use ui::UiStore;
pub use views::{ConversionPoint, DashboardOverview, PerformanceTrend, SpendShare};
