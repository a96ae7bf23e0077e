/// Unified error type for every store operation.
///
/// Every public operation returns `Result`; `Ok(None)` / an empty
/// sequence always means "no data", never a swallowed failure. The
/// variant identifies the stage that failed, so callers can tell a
/// corrupt payload from a dead backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("config error: {0}")]
    Config(String),

    #[error("encode failed for {type_name}: {source}")]
    Encode {
        type_name: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("decode failed for {type_name}: {source}")]
    Decode {
        type_name: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("backend returned {status}: {body}")]
    Backend { status: u16, body: String },

    #[error("{type_name} declares no schema tag, migration is unavailable for it")]
    SchemaUnavailable { type_name: &'static str },
}

impl StoreError {
    /// Add context to the error message, keeping the variant.
    ///
    /// Produces `"context: original message"` for the string-carrying
    /// variants; structured variants are returned unchanged.
    pub fn with_context(self, ctx: impl std::fmt::Display) -> Self {
        match self {
            StoreError::Config(msg) => StoreError::Config(format!("{ctx}: {msg}")),
            StoreError::Transport(msg) => StoreError::Transport(format!("{ctx}: {msg}")),
            other => other,
        }
    }
}
