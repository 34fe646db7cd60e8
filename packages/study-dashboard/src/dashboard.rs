use tracing::warn;

use crate::api::StatsApi;
use crate::models::DashboardStats;
use crate::session::SessionStore;

/// In-memory state behind the dashboard widgets. Lives as long as the view.
#[derive(Debug, Clone, Default)]
pub struct DashboardView {
    stats: DashboardStats,
    loading: bool,
}

impl DashboardView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> &DashboardStats {
        &self.stats
    }

    pub fn weekly_goal(&self) -> u32 {
        self.stats.weekly_goal
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Reloads stats. Like the stats fetch itself, this never fails: with no
    /// session token the view simply shows zeroes.
    pub async fn refresh<S: StatsApi>(&mut self, api: &S, session: &SessionStore) {
        self.loading = true;
        self.stats = match session.token() {
            Some(token) => api.fetch_dashboard_stats(&token).await,
            None => {
                warn!("no session token, showing empty dashboard");
                DashboardStats::zeroed()
            }
        };
        self.loading = false;
    }

    pub fn replace_stats(&mut self, stats: DashboardStats) {
        self.stats = stats;
    }

    pub fn apply_goal(&mut self, weekly_goal: u32) {
        self.stats.weekly_goal = weekly_goal;
    }
}
