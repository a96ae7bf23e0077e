use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use strata_api::{ResultSet, Row, Statement, StatementTransport, StoreError};

use crate::config::StoreConfig;

/// Statement transport over an HTTP CQL gateway.
///
/// POSTs `{"text": …, "params": […]}` to the gateway endpoint with
/// credentials and keyspace as query parameters; rows come back as
/// newline-delimited JSON objects. TLS, timeouts and connection reuse
/// are the HTTP client's business.
pub struct HttpTransport {
    http: reqwest::Client,
    url: String,
    user: String,
    password: String,
    keyspace: String,
}

impl HttpTransport {
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        let scheme = if config.tls { "https" } else { "http" };
        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| StoreError::Config(format!("HTTP client: {e}")))?;
        Ok(Self {
            http,
            url: format!("{scheme}://{}:{}/v1/statement", config.host, config.port),
            user: config.user.clone(),
            password: config.password.clone(),
            keyspace: config.keyspace.clone(),
        })
    }

    async fn round_trip(&self, stmt: &Statement) -> Result<ResultSet, StoreError> {
        let body = serde_json::to_string(stmt)
            .map_err(|e| StoreError::Transport(format!("statement body: {e}")))?;

        let resp = self
            .http
            .post(&self.url)
            .query(&[
                ("user", self.user.as_str()),
                ("password", self.password.as_str()),
                ("keyspace", self.keyspace.as_str()),
            ])
            .header("content-type", "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| StoreError::Transport(format!("request: {e}")))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| StoreError::Transport(format!("read: {e}")))?;

        if !status.is_success() {
            return Err(StoreError::Backend { status: status.as_u16(), body });
        }
        parse_rows(&body)
    }
}

/// Parse a newline-delimited JSON result body into rows.
///
/// A malformed line fails the whole response: this is the tabular frame
/// itself, not a stored payload, so there is nothing to salvage.
fn parse_rows(body: &str) -> Result<ResultSet, StoreError> {
    let mut rows = Vec::new();
    for line in body.lines() {
        if line.is_empty() {
            continue;
        }
        let object: serde_json::Map<String, serde_json::Value> = serde_json::from_str(line)
            .map_err(|e| StoreError::Transport(format!("parse result row: {e}")))?;
        let mut row = Row::new();
        for (name, value) in object {
            row.push(name, column_text(value));
        }
        rows.push(row);
    }
    Ok(rows)
}

/// Column value as its stored text; nulls read back as `None`.
fn column_text(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

impl StatementTransport for HttpTransport {
    fn execute(
        &self,
        stmt: &Statement,
    ) -> Pin<Box<dyn Future<Output = Result<ResultSet, StoreError>> + Send + '_>> {
        let stmt = stmt.clone();
        Box::pin(async move { self.round_trip(&stmt).await })
    }
}
