// config.rs
use std::{path::PathBuf, time::Duration};

#[derive(Debug, Clone)]
pub struct Config {
    pub app_url: String,
    pub port: u16,
    /// File backing the durable session record.
    pub session_file: PathBuf,
    /// Artificial delay applied before every store mutation.
    pub simulated_latency: Duration,
}

impl Config {
    pub fn init() -> Config {
        let app_url = std::env::var("APP_URL")
            .unwrap_or_else(|_| "http://localhost:5173".to_string());

        let port = parse_or_default("PORT", 8000u16);

        let session_file = std::env::var("SESSION_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(".supportflow/session.json"));

        let latency_ms = parse_or_default("SIMULATED_LATENCY_MS", 1000u64);

        Config {
            app_url,
            port,
            session_file,
            simulated_latency: Duration::from_millis(latency_ms),
        }
    }
}

fn parse_or_default<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw.parse::<T>().unwrap_or_else(|_| {
            tracing::warn!("{} has invalid value '{}', falling back to {}", key, raw, default);
            default
        }),
        Err(_) => default,
    }
}
