use anyhow::Result;
use serde_json::json;

use super::print_json;
use crate::app::App;

pub async fn login(app: &App, email: &str, password: &str) -> Result<()> {
    app.client.auth().login(email, password).await?;

    match app.client.auth().current_user() {
        Some(user) => print_json(&user),
        None => print_json(&json!({ "signedIn": true })),
    }
}

pub async fn register(app: &App, name: &str, email: &str, password: &str) -> Result<()> {
    let payload = app.client.auth().register(name, email, password).await?;
    tracing::info!(%email, "Account created");

    if payload.is_empty() {
        return print_json(&json!({ "registered": true }));
    }
    print_json(&payload.into_value())
}

pub fn logout(app: &App) -> Result<()> {
    app.client.auth().logout();
    print_json(&json!({ "signedIn": false }))
}

pub fn whoami(app: &App) -> Result<()> {
    let auth = app.client.auth();
    if !auth.is_authenticated() {
        anyhow::bail!("not signed in");
    }

    match auth.current_user() {
        Some(user) => {
            let admin = user.is_admin();
            print_json(&json!({ "user": user, "admin": admin }))
        }
        None => print_json(&json!({ "signedIn": true, "user": null })),
    }
}
