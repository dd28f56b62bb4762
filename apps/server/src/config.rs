use std::{net::SocketAddr, time::Duration};

use anyhow::Context;

pub struct Config {
    pub listen_addr: SocketAddr,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub log_format: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 5000)),
            cors_allow: vec!["*".to_string()],
            request_timeout: Duration::from_millis(30000),
            log_format: "text".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        let listen_addr = match std::env::var("QG_LISTEN_ADDR") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("Invalid QG_LISTEN_ADDR: {}", raw))?,
            Err(_) => defaults.listen_addr,
        };
        let cors_allow = std::env::var("QG_CORS_ALLOW_ORIGINS")
            .map(|raw| parse_origins(&raw))
            .unwrap_or(defaults.cors_allow);
        let timeout_ms: u64 = std::env::var("QG_REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|_| "30000".into())
            .parse()
            .unwrap_or(30000);
        let log_format = std::env::var("QG_LOG_FORMAT").unwrap_or(defaults.log_format);

        Ok(Self {
            listen_addr,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            log_format,
        })
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
