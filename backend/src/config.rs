//! Runtime configuration, read once from the environment at startup.

use log::warn;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    /// Directory holding the TTF files used to build PDF documents.
    pub fonts_dir: PathBuf,
    /// First part of exported file names (`<label>-<personName>.<ext>`).
    pub export_label: String,
    pub store_timeout: Duration,
    pub session_ttl: Duration,
    pub provider: ProviderConfig,
}

#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
    pub timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            host: env_or("CERTS_HOST", "127.0.0.1".to_string()),
            port: parse_env_or("CERTS_PORT", 8080),
            db_path: PathBuf::from(env_or("CERTS_DB_PATH", "certificates.sqlite".to_string())),
            fonts_dir: PathBuf::from(env_or("CERTS_FONTS_DIR", "./fonts".to_string())),
            export_label: env_or("CERTS_EXPORT_LABEL", "شهادة".to_string()),
            store_timeout: Duration::from_secs(parse_env_or("CERTS_STORE_TIMEOUT_SECS", 10)),
            session_ttl: Duration::from_secs(parse_env_or("CERTS_SESSION_TTL_SECS", 3600)),
            provider: ProviderConfig::from_env(),
        }
    }
}

impl ProviderConfig {
    pub fn from_env() -> Self {
        let api_key = api_key_from(env::var("GEMINI_API_KEY").ok(), env::var("API_KEY").ok());
        Self {
            api_key,
            model: env_or("GEMINI_MODEL", DEFAULT_MODEL.to_string()),
            endpoint: env_or(
                "GEMINI_ENDPOINT",
                "https://generativelanguage.googleapis.com/v1beta".to_string(),
            ),
            timeout: Duration::from_secs(parse_env_or("CERTS_PROVIDER_TIMEOUT_SECS", 30)),
        }
    }
}

/// First non-blank of the two credential variables.
fn api_key_from(primary: Option<String>, fallback: Option<String>) -> Option<String> {
    let set = |v: &String| !v.trim().is_empty();
    primary.filter(set).or_else(|| fallback.filter(set))
}

fn env_or(key: &str, default: String) -> String {
    env::var(key).ok().filter(|v| !v.trim().is_empty()).unwrap_or(default)
}

fn parse_env_or<T: FromStr + Copy + std::fmt::Display>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Ignoring invalid {}={:?}, using {}", key, raw, default);
            default
        }),
        Err(_) => default,
    }
}
