use std::future::Future;
use std::pin::Pin;

use crate::error::StoreError;
use crate::statement::{ResultSet, Statement};

/// Outbound statement transport.
///
/// One statement in, one tabular result (possibly empty) or failure out.
/// Connection setup, TLS and timeouts belong to the implementation; the
/// store issues exactly one round trip per operation and awaits it.
pub trait StatementTransport: Send + Sync {
    fn execute(
        &self,
        stmt: &Statement,
    ) -> Pin<Box<dyn Future<Output = Result<ResultSet, StoreError>> + Send + '_>>;
}
