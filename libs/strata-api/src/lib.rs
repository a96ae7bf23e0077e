pub mod document;
pub mod error;
pub mod filter;
pub mod statement;
pub mod transport;

pub use document::{Document, SchemaTag};
pub use error::StoreError;
pub use filter::{Filter, FilterValue};
pub use statement::{Param, ResultSet, Row, Statement};
pub use transport::StatementTransport;
