//! Command handlers. Results go to stdout as JSON, diagnostics to stderr.

mod auth;
mod cars;
mod notifications;
mod payments;
mod reports;
mod reservations;

use anyhow::Result;
use serde::Serialize;

use crate::app::App;
use crate::cli::Command;

pub async fn run(app: &App, command: Command) -> Result<()> {
    match command {
        Command::Login { email, password } => auth::login(app, &email, &password).await,
        Command::Register {
            name,
            email,
            password,
        } => auth::register(app, &name, &email, &password).await,
        Command::Logout => auth::logout(app),
        Command::Whoami => auth::whoami(app),
        Command::Cars { action } => cars::run(app, action).await,
        Command::Reservations { action } => reservations::run(app, action).await,
        Command::Notifications { action } => notifications::run(app, action).await,
        Command::Checkout(booking) => payments::checkout(app, booking).await,
        Command::Pay { reservation_id } => payments::pay(app, reservation_id).await,
        Command::Verify(args) => payments::verify(app, args).await,
        Command::Report { action } => reports::run(app, action).await,
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
