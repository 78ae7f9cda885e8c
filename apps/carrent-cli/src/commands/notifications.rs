use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use serde_json::json;

use carrent_core::PollerConfig;
use carrent_core::domain::{Notification, unread_count};
use carrent_infra::TokioTicker;

use super::print_json;
use crate::app::App;
use crate::cli::NotificationsAction;

pub async fn run(app: &App, action: NotificationsAction) -> Result<()> {
    app.client.auth().require_authenticated()?;
    let notifications = app.client.notifications();

    match action {
        NotificationsAction::List => print_snapshot(&notifications.mine().await?),
        NotificationsAction::Read { id } => {
            notifications.mark_read(id).await?;
            print_json(&json!({ "read": id }))
        }
        NotificationsAction::ReadAll => {
            notifications.mark_all_read().await?;
            print_json(&json!({ "readAll": true }))
        }
        NotificationsAction::Watch { interval } => watch(app, interval).await,
    }
}

/// Print a fresh snapshot on every poll until Ctrl-C.
async fn watch(app: &App, interval: Option<u64>) -> Result<()> {
    let interval = interval
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
        .unwrap_or(app.config.poll_interval);

    let poller = app
        .client
        .notification_poller(Arc::new(TokioTicker::new()), PollerConfig { interval });

    poller
        .start_polling(|list| {
            if let Err(e) = print_snapshot(&list) {
                tracing::warn!(error = %e, "Failed to print notifications");
            }
        })
        .await;

    tokio::signal::ctrl_c().await?;
    poller.stop_polling();
    Ok(())
}

fn print_snapshot(list: &[Notification]) -> Result<()> {
    print_json(&json!({
        "unread": unread_count(list),
        "notifications": list,
    }))
}
