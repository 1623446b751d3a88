use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub leaderboard: LeaderboardConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardConfig {
    pub default_limit: usize,
    pub max_limit: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenv::dotenv().ok();

        Ok(Config {
            server: ServerConfig {
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("HTTP_PORT")
                    .unwrap_or_else(|_| "8092".to_string())
                    .parse()?,
                workers: env::var("WORKERS")
                    .unwrap_or_else(|_| "4".to_string())
                    .parse()?,
            },
            leaderboard: LeaderboardConfig {
                default_limit: env::var("LEADERBOARD_DEFAULT_LIMIT")
                    .unwrap_or_else(|_| "50".to_string())
                    .parse()?,
                max_limit: env::var("LEADERBOARD_MAX_LIMIT")
                    .unwrap_or_else(|_| "200".to_string())
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
        assert!(config.leaderboard.default_limit <= config.leaderboard.max_limit);
    }
}
