use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

const DEFAULT_DASHBOARD_API_URL: &str = "http://localhost:5000";
const DEFAULT_DATA_API_URL: &str = "http://localhost:8000";
const DEFAULT_TIMEOUT_MS: u64 = 15_000;
const DEFAULT_DISMISS_MS: u64 = 5_000;
const DEFAULT_DECKS_PER_PAGE: usize = 6;

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL for `/dashboard`, `/progress` and `/user/stats`.
    pub dashboard_api_url: String,
    /// Base URL for `/decks` and the full user-data fetch.
    pub data_api_url: String,
    pub request_timeout: Duration,
    pub notification_dismiss: Duration,
    pub decks_per_page: usize,
    pub log_level: String,
    /// Set when `ENABLE_FILE_LOGS` is on; defaults to `./logs`.
    pub log_dir: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Self {
        let dashboard_api_url = normalize_base_url(
            env_string("DASHBOARD_API_URL").unwrap_or_else(|| DEFAULT_DASHBOARD_API_URL.to_string()),
        );

        let data_api_url = normalize_base_url(
            env_string("DATA_API_URL").unwrap_or_else(|| DEFAULT_DATA_API_URL.to_string()),
        );

        let request_timeout =
            Duration::from_millis(env_u64("REQUEST_TIMEOUT_MS").unwrap_or(DEFAULT_TIMEOUT_MS));

        let notification_dismiss =
            Duration::from_millis(env_u64("NOTIFICATION_DISMISS_MS").unwrap_or(DEFAULT_DISMISS_MS));

        let decks_per_page = env_u64("DECKS_PER_PAGE")
            .map(|v| (v as usize).clamp(1, 100))
            .unwrap_or(DEFAULT_DECKS_PER_PAGE);

        let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let file_logs = env_string("ENABLE_FILE_LOGS")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);
        let log_dir = file_logs.then(|| {
            PathBuf::from(env_string("LOG_DIR").unwrap_or_else(|| "./logs".to_string()))
        });

        Self {
            dashboard_api_url,
            data_api_url,
            request_timeout,
            notification_dismiss,
            decks_per_page,
            log_level,
            log_dir,
        }
    }

    /// Both API groups served from a single origin, mostly useful in tests.
    pub fn with_base_url(base_url: &str) -> Self {
        let base = normalize_base_url(base_url.to_string());
        Self {
            dashboard_api_url: base.clone(),
            data_api_url: base,
            request_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            notification_dismiss: Duration::from_millis(DEFAULT_DISMISS_MS),
            decks_per_page: DEFAULT_DECKS_PER_PAGE,
            log_level: "info".to_string(),
            log_dir: None,
        }
    }

    pub fn http_client(&self) -> reqwest::Client {
        reqwest::Client::builder()
            .timeout(self.request_timeout)
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "http client builder failed, using defaults without timeout");
                reqwest::Client::new()
            })
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_u64(key: &str) -> Option<u64> {
    env_string(key)?.parse().ok()
}

fn normalize_base_url(url: String) -> String {
    url.trim().trim_end_matches('/').to_string()
}
