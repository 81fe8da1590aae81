use std::env;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_API_KEY: &str = "dev-helpdesk-key";
const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:8080";

/// Runtime settings read from `HELPDESK_*` environment variables.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub kb_root: PathBuf,
    pub bind: String,
    pub api_key: String,
    pub rate_limit_window: Duration,
    pub rate_limit_max: usize,
    pub allowed_origins: Vec<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            kb_root: PathBuf::from("kb"),
            bind: "0.0.0.0:8080".to_string(),
            api_key: DEFAULT_API_KEY.to_string(),
            rate_limit_window: Duration::from_secs(60),
            rate_limit_max: 120,
            allowed_origins: vec![DEFAULT_ALLOWED_ORIGIN.to_string()],
        }
    }
}

impl ApiConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            kb_root: env::var("HELPDESK_KB_ROOT")
                .map(PathBuf::from)
                .unwrap_or(defaults.kb_root),
            bind: env::var("HELPDESK_BIND").unwrap_or(defaults.bind),
            api_key: env::var("HELPDESK_API_KEY")
                .ok()
                .filter(|value| !value.trim().is_empty())
                .unwrap_or(defaults.api_key),
            rate_limit_window: env::var("HELPDESK_RATE_LIMIT_WINDOW_SECONDS")
                .ok()
                .and_then(|value| value.parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.rate_limit_window),
            rate_limit_max: env::var("HELPDESK_RATE_LIMIT_MAX")
                .ok()
                .and_then(|value| value.parse::<usize>().ok())
                .unwrap_or(defaults.rate_limit_max),
            allowed_origins: env::var("HELPDESK_ALLOWED_ORIGINS")
                .map(|value| parse_origins(&value))
                .unwrap_or(defaults.allowed_origins),
        }
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|origin| origin.trim().trim_end_matches('/').to_string())
        .filter(|origin| !origin.is_empty())
        .collect()
}
