//! # Carrent CLI
//!
//! Terminal client for the car-rental backend.

use std::process::ExitCode;

use clap::Parser;

use carrent_core::ApiError;

mod app;
mod cli;
mod commands;
mod config;
mod telemetry;

use app::App;
use cli::Cli;
use config::AppConfig;
use telemetry::TelemetryConfig;

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    telemetry::init_telemetry(&TelemetryConfig::from_env());

    let mut config = AppConfig::from_env();
    if let Some(api_url) = cli.api_url {
        config.gateway.base_url = api_url;
    }

    let app = match App::build(config) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    match commands::run(&app, cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report(&app, &e);
            ExitCode::FAILURE
        }
    }
}

fn report(app: &App, error: &anyhow::Error) {
    match error.downcast_ref::<ApiError>() {
        Some(api) => {
            tracing::debug!(status = api.status(), error = %api, "Command failed");
            eprintln!("error: {}", api.user_message());
        }
        None => eprintln!("error: {:#}", error),
    }

    if app.needs_login() {
        eprintln!("You are not signed in or your session has expired. Run `carrent login`.");
    }
}
