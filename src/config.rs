//! Environment configuration for the proxy server.

use std::env;

/// Default public mainnet RPC endpoint, used when no override is configured.
pub const DEFAULT_RPC_URL: &str = "https://api.mainnet-beta.solana.com";

/// Default Jupiter aggregation API base.
pub const DEFAULT_JUPITER_API_BASE: &str = "https://lite-api.jup.ag";

/// Default bind address for the proxy server.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// General-purpose Solana RPC URL (blockhash fetches).
    pub rpc_url: String,
    /// Distinct RPC URL for sending transactions, if configured.
    pub send_rpc_url: Option<String>,
    /// Base URL of the Jupiter-style aggregation API.
    pub jupiter_api_base: String,
    /// Address the proxy server binds to.
    pub bind_addr: String,
}

impl Config {
    /// Load configuration from the environment, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            rpc_url: env::var("SOLANA_RPC_URL").unwrap_or_else(|_| DEFAULT_RPC_URL.to_string()),
            send_rpc_url: env::var("SOLANA_RPC_SEND_URL").ok(),
            jupiter_api_base: env::var("JUPITER_API_BASE")
                .unwrap_or_else(|_| DEFAULT_JUPITER_API_BASE.to_string()),
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
        }
    }

    /// RPC URL used for sending transactions. Falls back to the general RPC
    /// URL when no distinct send endpoint is configured.
    pub fn send_rpc_url(&self) -> &str {
        self.send_rpc_url.as_deref().unwrap_or(&self.rpc_url)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            send_rpc_url: None,
            jupiter_api_base: DEFAULT_JUPITER_API_BASE.to_string(),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
        }
    }
}
