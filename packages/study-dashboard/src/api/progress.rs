use serde_json::Value;
use tracing::{debug, warn};

use super::{get_json, DASHBOARD_PATH, DECKS_PATH, PROGRESS_PATH};
use crate::config::Config;
use crate::error::ClientResult;
use crate::models::{DashboardStats, Deck, ProgressRecord, UserData, DEFAULT_WEEKLY_GOAL};
use crate::session::AuthToken;

#[derive(Clone)]
pub struct ProgressClient {
    client: reqwest::Client,
    /// Serves `/progress` for the standalone progress fetch.
    dashboard_base_url: String,
    /// Serves `/decks`, `/progress` and `/dashboard` for [`ProgressClient::fetch_user_data`].
    data_base_url: String,
}

impl ProgressClient {
    pub fn new(
        client: reqwest::Client,
        dashboard_base_url: impl Into<String>,
        data_base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            dashboard_base_url: dashboard_base_url.into(),
            data_base_url: data_base_url.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.http_client(),
            config.dashboard_api_url.clone(),
            config.data_api_url.clone(),
        )
    }

    /// Non-2xx fails; a body that is not an array comes back empty.
    pub async fn fetch_progress(&self, token: &AuthToken) -> ClientResult<Vec<ProgressRecord>> {
        let body = get_json(&self.client, &self.dashboard_base_url, PROGRESS_PATH, token).await?;
        Ok(coerce_progress(body))
    }

    pub async fn fetch_decks(&self, token: &AuthToken) -> ClientResult<Vec<Deck>> {
        let body = get_json(&self.client, &self.data_base_url, DECKS_PATH, token).await?;
        Ok(coerce_decks(body))
    }

    /// Loads decks, progress and dashboard in that order.
    ///
    /// Decks and progress must succeed or the whole call fails. The dashboard
    /// is best-effort: when it cannot be read the goal falls back to
    /// [`DEFAULT_WEEKLY_GOAL`] and the stats to zeroes.
    pub async fn fetch_user_data(&self, token: &AuthToken) -> ClientResult<UserData> {
        let decks = coerce_decks(get_json(&self.client, &self.data_base_url, DECKS_PATH, token).await?);
        let progress =
            coerce_progress(get_json(&self.client, &self.data_base_url, PROGRESS_PATH, token).await?);

        let (weekly_goal, stats) =
            match get_json(&self.client, &self.data_base_url, DASHBOARD_PATH, token).await {
                Ok(body) => {
                    let stats = DashboardStats::from_json(&body).rounded();
                    let weekly_goal = if stats.weekly_goal > 0 {
                        stats.weekly_goal
                    } else {
                        DEFAULT_WEEKLY_GOAL
                    };
                    (weekly_goal, stats)
                }
                Err(err) => {
                    warn!(endpoint = DASHBOARD_PATH, error = %err, "dashboard unavailable, using defaults");
                    (DEFAULT_WEEKLY_GOAL, DashboardStats::zeroed())
                }
            };

        debug!(
            decks = decks.len(),
            progress = progress.len(),
            weekly_goal,
            "user data loaded"
        );

        Ok(UserData {
            decks,
            progress,
            weekly_goal,
            stats,
        })
    }
}

fn coerce_progress(body: Value) -> Vec<ProgressRecord> {
    if !body.is_array() {
        warn!(endpoint = PROGRESS_PATH, "progress body is not an array");
    }
    ProgressRecord::list_from_json(body)
}

fn coerce_decks(body: Value) -> Vec<Deck> {
    if !body.is_array() {
        warn!(endpoint = DECKS_PATH, "decks body is not an array");
    }
    Deck::list_from_json(body)
}
