use std::process::ExitCode;

use study_dashboard::logging::init_tracing;
use study_dashboard::session::TOKEN_KEY;
use study_dashboard::{Config, ProgressClient, SessionStore};

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let config = Config::from_env();
    let _log_guard = init_tracing(&config);

    let mut session = SessionStore::new();
    if let Ok(token) = std::env::var("STUDY_TOKEN") {
        session.set(TOKEN_KEY, token);
    }

    let token = match session.require_token() {
        Ok(token) => token,
        Err(err) => {
            tracing::error!(error = %err, "set STUDY_TOKEN to load the dashboard");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        dashboard = %config.dashboard_api_url,
        data = %config.data_api_url,
        "loading user data"
    );

    let client = ProgressClient::from_config(&config);
    match client.fetch_user_data(&token).await {
        Ok(data) => {
            let first_page = data.deck_page(1, config.decks_per_page);
            tracing::info!(
                decks = data.decks.len(),
                deck_pages = first_page.total_pages,
                progress = data.progress.len(),
                weekly_goal = data.weekly_goal,
                streak = data.stats.study_streak,
                accuracy = data.stats.accuracy,
                "dashboard ready"
            );
            for deck in &first_page.items {
                tracing::info!(id = %deck.id, title = %deck.title, subject = %deck.subject, "deck");
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, "failed to load user data");
            ExitCode::FAILURE
        }
    }
}
