pub mod api;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod goal;
pub mod logging;
pub mod models;
pub mod notify;
pub mod pagination;
pub mod session;

pub use api::{ProgressClient, StatsApi, StatsClient};
pub use config::Config;
pub use dashboard::DashboardView;
pub use error::{ClientError, ClientResult};
pub use goal::{GoalDialog, GoalFlowPhase, GoalSaveOutcome, GoalUpdateFlow};
pub use models::{DashboardStats, Deck, ProgressRecord, UserData};
pub use notify::{Notification, NotificationCenter, NotificationEvent, NotificationKind};
pub use session::{AuthToken, SessionStore};
