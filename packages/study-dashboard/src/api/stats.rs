use std::future::Future;

use serde_json::{json, Value};
use tracing::{debug, error, warn};

use super::{endpoint_url, get_json, DASHBOARD_PATH, USER_STATS_PATH};
use crate::config::Config;
use crate::error::{ClientError, ClientResult};
use crate::models::{parse_count, DashboardStats};
use crate::session::AuthToken;

/// Dashboard statistics capability used by the view and the goal flow.
///
/// The two operations deliberately fail differently: reading stats never
/// fails (it degrades to zeroes) while updating the goal always surfaces
/// the error to the caller.
pub trait StatsApi {
    fn fetch_dashboard_stats(&self, token: &AuthToken) -> impl Future<Output = DashboardStats> + Send;

    /// Returns the weekly goal as confirmed by the server.
    fn update_weekly_goal(
        &self,
        token: &AuthToken,
        new_goal: u32,
    ) -> impl Future<Output = ClientResult<u32>> + Send;
}

#[derive(Clone)]
pub struct StatsClient {
    client: reqwest::Client,
    base_url: String,
}

impl StatsClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.http_client(), config.dashboard_api_url.clone())
    }

    async fn try_fetch_dashboard_stats(&self, token: &AuthToken) -> ClientResult<DashboardStats> {
        let body = get_json(&self.client, &self.base_url, DASHBOARD_PATH, token).await?;
        Ok(DashboardStats::from_json(&body))
    }
}

impl StatsApi for StatsClient {
    async fn fetch_dashboard_stats(&self, token: &AuthToken) -> DashboardStats {
        match self.try_fetch_dashboard_stats(token).await {
            Ok(stats) => {
                debug!(weekly_goal = stats.weekly_goal, "dashboard stats loaded");
                stats
            }
            Err(err) => {
                error!(endpoint = DASHBOARD_PATH, error = %err, "error fetching dashboard stats");
                DashboardStats::zeroed()
            }
        }
    }

    async fn update_weekly_goal(&self, token: &AuthToken, new_goal: u32) -> ClientResult<u32> {
        let url = endpoint_url(&self.base_url, USER_STATS_PATH);
        let resp = self
            .client
            .put(&url)
            .bearer_auth(token.as_str())
            .json(&json!({ "weekly_goal": new_goal }))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            warn!(endpoint = USER_STATS_PATH, %status, "weekly goal update rejected");
            return Err(ClientError::http(USER_STATS_PATH, status));
        }

        let bytes = resp.bytes().await?;
        let body: Value = serde_json::from_slice(&bytes)?;
        let confirmed = match body.get("weekly_goal").and_then(parse_count) {
            Some(goal) => goal,
            None => {
                warn!(
                    endpoint = USER_STATS_PATH,
                    requested = new_goal,
                    "update response missing weekly_goal, keeping requested value"
                );
                new_goal
            }
        };

        debug!(requested = new_goal, confirmed, "weekly goal updated");
        Ok(confirmed)
    }
}
