use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// System configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory the speech service writes audio into, served under `/cache`.
    #[serde(default = "default_cache_dir")]
    pub cache_dir: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    12393
}

fn default_cache_dir() -> String {
    "cache".to_string()
}

impl SystemConfig {
    /// Resolve the listen address from `host` and `port`.
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let host = if self.host == "localhost" {
            "127.0.0.1"
        } else {
            self.host.as_str()
        };
        let addr: SocketAddr = format!("{}:{}", host, self.port)
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid listen address {}:{}: {}", self.host, self.port, e))?;
        Ok(addr)
    }
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cache_dir: default_cache_dir(),
        }
    }
}
