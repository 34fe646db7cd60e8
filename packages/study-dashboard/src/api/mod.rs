pub mod progress;
pub mod stats;

pub use progress::ProgressClient;
pub use stats::{StatsApi, StatsClient};

use serde_json::Value;

use crate::error::{ClientError, ClientResult};
use crate::session::AuthToken;

pub const DASHBOARD_PATH: &str = "/dashboard";
pub const PROGRESS_PATH: &str = "/progress";
pub const DECKS_PATH: &str = "/decks";
pub const USER_STATS_PATH: &str = "/user/stats";

fn endpoint_url(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

/// Authenticated GET that fails on non-2xx and on bodies that are not JSON.
/// Shape checks are left to the caller.
async fn get_json(
    client: &reqwest::Client,
    base_url: &str,
    path: &'static str,
    token: &AuthToken,
) -> ClientResult<Value> {
    let url = endpoint_url(base_url, path);
    let resp = client.get(&url).bearer_auth(token.as_str()).send().await?;

    let status = resp.status();
    if !status.is_success() {
        return Err(ClientError::http(path, status));
    }

    let bytes = resp.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}
