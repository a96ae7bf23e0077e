use serde::Deserialize;

fn default_port() -> u16 {
    8182
}
fn default_user() -> String {
    "cassandra".into()
}
fn default_keyspace() -> String {
    "strata".into()
}
fn default_table() -> String {
    "records".into()
}
fn default_request_timeout_secs() -> u64 {
    30
}

/// Connection and table configuration, fixed at construction.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    // ── Connection ──
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_user")]
    pub user: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub tls: bool,
    #[serde(default)]
    pub accept_invalid_certs: bool,

    // ── Table ──
    #[serde(default = "default_keyspace")]
    pub keyspace: String,
    #[serde(default = "default_table")]
    pub table: String,

    // ── Timeouts ──
    /// HTTP request timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl StoreConfig {
    /// Minimal config for a given host, everything else defaulted.
    pub fn for_host(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: default_port(),
            user: default_user(),
            password: String::new(),
            tls: false,
            accept_invalid_certs: false,
            keyspace: default_keyspace(),
            table: default_table(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}
