//! Wide-column backend provider for the partitioned document store.
//!
//! One generic table keyed by ((partition, area), id) holds serialized
//! documents plus a text→text filter map for equality scans. The store
//! issues parameterized statements through a [`StatementTransport`] and
//! never interprets the backend's wire format itself.
//!
//! [`StatementTransport`]: strata_api::StatementTransport

pub mod codec;
pub mod config;
pub mod migrate;
pub mod query;
pub mod store;
pub mod transport;

pub use config::StoreConfig;
pub use migrate::MigrationOutcome;
pub use store::RecordStore;
pub use transport::HttpTransport;
