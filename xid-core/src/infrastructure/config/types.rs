use serde::{Deserialize, Serialize};

/// Base configuration for the daemon.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Directory holding the state database and, by default, log files.
    #[serde(default)]
    pub data_dir: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self { data_dir: ".xid".to_string() }
    }
}

/// JSON-RPC server configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RpcConfig {
    /// Listen address of the JSON-RPC server.
    #[serde(default)]
    pub listen: String,
    /// Enable RPC methods that can disrupt the server (`stop`,
    /// `getcurrentstate`).  Off by default.
    #[serde(default)]
    pub unsafe_methods: bool,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self { listen: "127.0.0.1:8400".to_string(), unsafe_methods: false }
    }
}

/// REST server configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RestConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Listen address of the REST server.
    #[serde(default)]
    pub listen: String,
}

impl Default for RestConfig {
    fn default() -> Self {
        Self { enabled: true, listen: "127.0.0.1:8401".to_string() }
    }
}

/// Logging configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LogConfig {
    /// Filter expression, e.g. `"info"` or `"debug,rocksdb=warn"`.
    #[serde(default)]
    pub filters: String,
    /// Directory for log files; console-only when unset.
    #[serde(default)]
    pub dir: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { filters: "info".to_string(), dir: None }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub rpc: RpcConfig,
    #[serde(default)]
    pub rest: RestConfig,
    #[serde(default)]
    pub log: LogConfig,
}
