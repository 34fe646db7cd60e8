//! Weekly-goal dialog and the save flow behind it.
//!
//! ```text
//! Idle --save--> Saving --ok--> Success --> Idle (dialog closed)
//!                       \-err-> Failed  --> Idle (dialog open, goal reverted)
//! ```

use tracing::{debug, info, warn};

use crate::api::StatsApi;
use crate::dashboard::DashboardView;
use crate::error::{ClientError, ClientResult};
use crate::models::DashboardStats;
use crate::notify::NotificationCenter;
use crate::session::SessionStore;

pub const GOAL_MIN: u32 = 1;
pub const GOAL_MAX: u32 = 200;
pub const SLIDER_MIN: u32 = 5;
pub const SLIDER_STEP: u32 = 5;

const GENERIC_FAILURE: &str = "Could not update your weekly goal. Please try again.";

/// Numeric input override: any value in `GOAL_MIN..=GOAL_MAX`.
pub fn clamp_input(value: i64) -> u32 {
    value.clamp(GOAL_MIN as i64, GOAL_MAX as i64) as u32
}

/// Slider position snapped to the nearest step within `SLIDER_MIN..=GOAL_MAX`.
pub fn snap_slider(value: i64) -> u32 {
    let step = SLIDER_STEP as i64;
    let clamped = value.clamp(SLIDER_MIN as i64, GOAL_MAX as i64);
    let snapped = (clamped + step / 2) / step * step;
    snapped.clamp(SLIDER_MIN as i64, GOAL_MAX as i64) as u32
}

// Server-provided goals (0 on a fresh account) may sit outside the range.
fn within_range(goal: u32) -> u32 {
    clamp_input(i64::from(goal))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalFlowPhase {
    Idle,
    Saving,
    Success,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoalSaveOutcome {
    Saved { weekly_goal: u32 },
    Failed { message: String },
}

#[derive(Debug, Clone)]
pub struct GoalDialog {
    open: bool,
    candidate: u32,
    confirmed: u32,
    phase: GoalFlowPhase,
}

impl GoalDialog {
    pub fn new(confirmed: u32) -> Self {
        Self {
            open: false,
            candidate: within_range(confirmed),
            confirmed,
            phase: GoalFlowPhase::Idle,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn candidate(&self) -> u32 {
        self.candidate
    }

    pub fn confirmed_goal(&self) -> u32 {
        self.confirmed
    }

    pub fn phase(&self) -> GoalFlowPhase {
        self.phase
    }

    pub fn open(&mut self) {
        self.open = true;
        self.candidate = within_range(self.confirmed);
    }

    /// Closing without saving drops the pending value.
    pub fn close(&mut self) {
        self.open = false;
        self.candidate = within_range(self.confirmed);
    }

    pub fn set_slider(&mut self, value: i64) {
        self.candidate = snap_slider(value);
    }

    pub fn set_input(&mut self, value: i64) {
        self.candidate = clamp_input(value);
    }

    /// Follows a goal loaded elsewhere, e.g. after a dashboard refresh.
    pub fn sync_confirmed(&mut self, goal: u32) {
        self.confirmed = goal;
        if !self.open {
            self.candidate = within_range(goal);
        }
    }

    fn transition(&mut self, next: GoalFlowPhase) {
        debug!(from = ?self.phase, to = ?next, "goal flow transition");
        self.phase = next;
    }
}

pub struct GoalUpdateFlow<'a, S> {
    api: &'a S,
    notifications: &'a NotificationCenter,
}

impl<'a, S: StatsApi> GoalUpdateFlow<'a, S> {
    pub fn new(api: &'a S, notifications: &'a NotificationCenter) -> Self {
        Self { api, notifications }
    }

    /// Persists the dialog's candidate goal and reconciles the view.
    ///
    /// The server's confirmed value wins over both the candidate and the
    /// re-fetched stats. Failures are reported through the notification
    /// center and never retried.
    pub async fn save(
        &self,
        dialog: &mut GoalDialog,
        view: &mut DashboardView,
        session: &SessionStore,
    ) -> GoalSaveOutcome {
        let requested = within_range(dialog.candidate);
        dialog.transition(GoalFlowPhase::Saving);

        let result: ClientResult<(u32, DashboardStats)> = async {
            let token = session.require_token()?;
            let confirmed = self.api.update_weekly_goal(&token, requested).await?;
            let stats = self.api.fetch_dashboard_stats(&token).await;
            Ok::<_, ClientError>((confirmed, stats))
        }
        .await;

        match result {
            Ok((confirmed, stats)) => {
                view.replace_stats(stats);
                view.apply_goal(confirmed);

                dialog.confirmed = confirmed;
                dialog.candidate = within_range(confirmed);
                dialog.open = false;
                dialog.transition(GoalFlowPhase::Success);

                info!(requested, confirmed, "weekly goal saved");
                self.notifications.success(
                    "Weekly goal updated",
                    format!("Your weekly goal is now {confirmed} cards."),
                );

                dialog.transition(GoalFlowPhase::Idle);
                GoalSaveOutcome::Saved {
                    weekly_goal: confirmed,
                }
            }
            Err(err) => {
                warn!(requested, error = %err, "weekly goal save failed");
                let message = err
                    .user_message()
                    .map(|m| format!("Could not update your weekly goal: {m}"))
                    .unwrap_or_else(|| GENERIC_FAILURE.to_string());

                dialog.candidate = within_range(dialog.confirmed);
                dialog.transition(GoalFlowPhase::Failed);
                self.notifications.error("Update failed", message.clone());

                dialog.transition(GoalFlowPhase::Idle);
                GoalSaveOutcome::Failed { message }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use parking_lot::Mutex;

    use super::*;
    use crate::notify::{NotificationEvent, NotificationKind};
    use crate::session::AuthToken;

    struct FakeStats {
        stats: DashboardStats,
        echo_override: Option<u32>,
        reject_with: Option<reqwest::StatusCode>,
        updates: Mutex<Vec<u32>>,
    }

    impl FakeStats {
        fn new(stats: DashboardStats) -> Self {
            Self {
                stats,
                echo_override: None,
                reject_with: None,
                updates: Mutex::new(Vec::new()),
            }
        }
    }

    impl StatsApi for FakeStats {
        async fn fetch_dashboard_stats(&self, _token: &AuthToken) -> DashboardStats {
            self.stats
        }

        async fn update_weekly_goal(&self, _token: &AuthToken, new_goal: u32) -> ClientResult<u32> {
            self.updates.lock().push(new_goal);
            match self.reject_with {
                Some(status) => Err(ClientError::http("/user/stats", status)),
                None => Ok(self.echo_override.unwrap_or(new_goal)),
            }
        }
    }

    fn stats_with_goal(goal: u32) -> DashboardStats {
        DashboardStats {
            weekly_goal: goal,
            study_streak: 3,
            ..DashboardStats::zeroed()
        }
    }

    fn center() -> NotificationCenter {
        NotificationCenter::new(Duration::from_secs(5))
    }

    #[test]
    fn slider_snaps_and_clamps() {
        assert_eq!(snap_slider(0), 5);
        assert_eq!(snap_slider(148), 150);
        assert_eq!(snap_slider(152), 150);
        assert_eq!(snap_slider(153), 155);
        assert_eq!(snap_slider(1_000), 200);
    }

    #[test]
    fn input_clamps_to_range() {
        assert_eq!(clamp_input(-4), 1);
        assert_eq!(clamp_input(0), 1);
        assert_eq!(clamp_input(37), 37);
        assert_eq!(clamp_input(201), 200);
    }

    #[test]
    fn closing_drops_pending_value() {
        let mut dialog = GoalDialog::new(20);
        dialog.open();
        dialog.set_input(80);
        dialog.close();
        assert_eq!(dialog.candidate(), 20);
        assert!(!dialog.is_open());
    }

    #[test]
    fn out_of_range_server_goal_is_clamped_in_dialog() {
        let mut dialog = GoalDialog::new(0);
        assert_eq!(dialog.candidate(), GOAL_MIN);
        assert_eq!(dialog.confirmed_goal(), 0);

        dialog.sync_confirmed(500);
        assert_eq!(dialog.candidate(), GOAL_MAX);
        dialog.open();
        assert_eq!(dialog.candidate(), GOAL_MAX);
        dialog.close();
        assert_eq!(dialog.candidate(), GOAL_MAX);
    }

    #[tokio::test]
    async fn out_of_range_goals_are_never_sent() {
        let api = FakeStats::new(stats_with_goal(1));
        let notifications = center();
        let session = SessionStore::with_token("t");
        let mut view = DashboardView::new();

        let mut fresh = GoalDialog::new(0);
        fresh.open();
        let outcome = GoalUpdateFlow::new(&api, &notifications)
            .save(&mut fresh, &mut view, &session)
            .await;
        assert_eq!(outcome, GoalSaveOutcome::Saved { weekly_goal: GOAL_MIN });

        let mut synced = GoalDialog::new(10);
        synced.sync_confirmed(500);
        synced.open();
        let outcome = GoalUpdateFlow::new(&api, &notifications)
            .save(&mut synced, &mut view, &session)
            .await;
        assert_eq!(outcome, GoalSaveOutcome::Saved { weekly_goal: GOAL_MAX });

        assert_eq!(*api.updates.lock(), vec![GOAL_MIN, GOAL_MAX]);
    }

    #[tokio::test]
    async fn failed_save_reverts_to_clamped_goal() {
        let mut api = FakeStats::new(stats_with_goal(0));
        api.reject_with = Some(reqwest::StatusCode::BAD_GATEWAY);
        let notifications = center();
        let session = SessionStore::with_token("t");

        let mut view = DashboardView::new();
        let mut dialog = GoalDialog::new(0);
        dialog.open();
        dialog.set_input(50);

        let outcome = GoalUpdateFlow::new(&api, &notifications)
            .save(&mut dialog, &mut view, &session)
            .await;

        assert!(matches!(outcome, GoalSaveOutcome::Failed { .. }));
        assert_eq!(dialog.candidate(), GOAL_MIN);
    }

    #[tokio::test]
    async fn save_closes_dialog_and_updates_view() {
        let api = FakeStats::new(stats_with_goal(150));
        let notifications = center();
        let mut rx = notifications.subscribe();
        let session = SessionStore::with_token("t");

        let mut view = DashboardView::new();
        let mut dialog = GoalDialog::new(10);
        dialog.open();
        dialog.set_slider(150);

        let outcome = GoalUpdateFlow::new(&api, &notifications)
            .save(&mut dialog, &mut view, &session)
            .await;

        assert_eq!(outcome, GoalSaveOutcome::Saved { weekly_goal: 150 });
        assert!(!dialog.is_open());
        assert_eq!(dialog.phase(), GoalFlowPhase::Idle);
        assert_eq!(dialog.confirmed_goal(), 150);
        assert_eq!(view.weekly_goal(), 150);
        assert_eq!(view.stats().study_streak, 3);
        assert_eq!(*api.updates.lock(), vec![150]);

        match rx.recv().await.unwrap() {
            NotificationEvent::Shown(n) => assert_eq!(n.kind, NotificationKind::Success),
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[tokio::test]
    async fn confirmed_value_beats_refetched_stats() {
        let mut api = FakeStats::new(stats_with_goal(20));
        api.echo_override = Some(100);
        let notifications = center();
        let session = SessionStore::with_token("t");

        let mut view = DashboardView::new();
        let mut dialog = GoalDialog::new(20);
        dialog.open();
        dialog.set_input(120);

        let outcome = GoalUpdateFlow::new(&api, &notifications)
            .save(&mut dialog, &mut view, &session)
            .await;

        assert_eq!(outcome, GoalSaveOutcome::Saved { weekly_goal: 100 });
        assert_eq!(view.weekly_goal(), 100);
        assert_eq!(dialog.confirmed_goal(), 100);
    }

    #[tokio::test]
    async fn rejected_save_keeps_dialog_open_and_reverts() {
        let mut api = FakeStats::new(stats_with_goal(30));
        api.reject_with = Some(reqwest::StatusCode::INTERNAL_SERVER_ERROR);
        let notifications = center();
        let mut rx = notifications.subscribe();
        let session = SessionStore::with_token("t");

        let mut view = DashboardView::new();
        view.apply_goal(30);
        let mut dialog = GoalDialog::new(30);
        dialog.open();
        dialog.set_slider(75);

        let outcome = GoalUpdateFlow::new(&api, &notifications)
            .save(&mut dialog, &mut view, &session)
            .await;

        let GoalSaveOutcome::Failed { message } = outcome else {
            panic!("save should fail");
        };
        assert!(message.contains("500"));
        assert!(dialog.is_open());
        assert_eq!(dialog.phase(), GoalFlowPhase::Idle);
        assert_eq!(dialog.candidate(), 30);
        assert_eq!(view.weekly_goal(), 30);

        match rx.recv().await.unwrap() {
            NotificationEvent::Shown(n) => {
                assert_eq!(n.kind, NotificationKind::Error);
                assert_eq!(n.message, message);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_token_fails_without_calling_backend() {
        let api = FakeStats::new(stats_with_goal(30));
        let notifications = center();
        let mut view = DashboardView::new();
        let mut dialog = GoalDialog::new(30);
        dialog.open();
        dialog.set_input(40);

        let outcome = GoalUpdateFlow::new(&api, &notifications)
            .save(&mut dialog, &mut view, &SessionStore::new())
            .await;

        assert!(matches!(outcome, GoalSaveOutcome::Failed { ref message } if message.contains("not signed in")));
        assert!(api.updates.lock().is_empty());
    }
}
