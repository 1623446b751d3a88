use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub receipts: ReceiptConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptConfig {
    /// Base URL receipts are served from; the stable
    /// `receipt_<number>.pdf` name is appended to it.
    pub base_url: String,
    /// Upper bound for each collaborator call in the receipt pipeline.
    pub side_effect_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenv::dotenv().ok();

        Ok(Config {
            server: ServerConfig {
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("HTTP_PORT")
                    .unwrap_or_else(|_| "8091".to_string())
                    .parse()?,
                workers: env::var("WORKERS")
                    .unwrap_or_else(|_| "4".to_string())
                    .parse()?,
            },
            receipts: ReceiptConfig {
                base_url: env::var("RECEIPTS_BASE_URL")
                    .unwrap_or_else(|_| "/receipts".to_string()),
                side_effect_timeout_secs: env::var("SIDE_EFFECT_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()?,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::from_env().unwrap();
        assert!(config.server.port > 0);
        assert!(config.receipts.side_effect_timeout_secs > 0);
    }
}
