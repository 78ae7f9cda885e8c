//! Command-line surface.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "carrent")]
#[command(about = "Car rental client: browse cars, book, pay and follow notifications", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Override the API base URL (CARRENT_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Sign in and keep the session token
    Login {
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account
    Register {
        #[arg(long)]
        name: String,
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Browse and manage the fleet
    Cars {
        #[command(subcommand)]
        action: CarsAction,
    },
    /// Book and manage reservations
    Reservations {
        #[command(subcommand)]
        action: ReservationsAction,
    },
    /// Read notifications
    Notifications {
        #[command(subcommand)]
        action: NotificationsAction,
    },
    /// Reserve a car and open checkout for it
    Checkout(Booking),
    /// Open checkout for an existing reservation
    Pay { reservation_id: i64 },
    /// Check the outcome of a payment
    Verify(VerifyArgs),
    /// Admin reports
    Report {
        #[command(subcommand)]
        action: ReportAction,
    },
}

#[derive(Subcommand)]
pub enum CarsAction {
    /// List every car
    List,
    /// Show one car
    Show { id: i64 },
    /// Search the fleet
    Filter {
        #[arg(long)]
        make: Option<String>,
        #[arg(long)]
        model: Option<String>,
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        min_price: Option<f64>,
        #[arg(long)]
        max_price: Option<f64>,
        #[arg(long)]
        status: Option<String>,
    },
    /// Add a car (admin)
    Add(CarArgs),
    /// Update a car (admin)
    Update {
        id: i64,
        #[command(flatten)]
        car: CarArgs,
        /// Image being replaced, when uploading a new one
        #[arg(long)]
        old_image: Option<String>,
    },
    /// Remove a car (admin)
    Delete { id: i64 },
}

#[derive(Args)]
pub struct CarArgs {
    #[arg(long)]
    pub make: String,
    #[arg(long)]
    pub model: String,
    #[arg(long)]
    pub year: i32,
    #[arg(long)]
    pub price: f64,
    #[arg(long, default_value = "Available")]
    pub status: String,
    /// Image file to upload
    #[arg(long)]
    pub image: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum ReservationsAction {
    /// Your reservations
    Mine,
    /// Every reservation (admin)
    All,
    /// Book a car without paying yet
    Create(Booking),
    /// Cancel a reservation
    Cancel { id: i64 },
}

#[derive(Args)]
pub struct Booking {
    pub car_id: i64,
    /// Pickup date (YYYY-MM-DD)
    pub start: NaiveDate,
    /// Return date (YYYY-MM-DD)
    pub end: NaiveDate,
}

#[derive(Subcommand)]
pub enum NotificationsAction {
    /// Current notifications
    List,
    /// Mark one notification as read
    Read { id: i64 },
    /// Mark every notification as read
    ReadAll,
    /// Keep printing the notification list until interrupted
    Watch {
        /// Seconds between refreshes (CARRENT_POLL_INTERVAL_SECS)
        #[arg(long)]
        interval: Option<u64>,
    },
}

#[derive(Args)]
#[group(required = true, multiple = false)]
pub struct VerifyArgs {
    /// Checkout session id
    #[arg(long)]
    pub session: Option<String>,
    /// Reservation id
    #[arg(long)]
    pub reservation: Option<i64>,
    /// Full URL the provider redirected to
    #[arg(long)]
    pub return_url: Option<String>,
}

#[derive(Subcommand)]
pub enum ReportAction {
    /// Headline figures
    Stats,
    /// Most rented cars
    Top {
        #[arg(long)]
        take: Option<u32>,
    },
    /// Revenue per day
    Daily {
        #[arg(long)]
        days: Option<u32>,
    },
    /// Revenue per month
    Monthly {
        #[arg(long)]
        months: Option<u32>,
    },
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_checkout_dates() {
        let cli = Cli::try_parse_from(["carrent", "checkout", "3", "2025-06-01", "2025-06-04"]).unwrap();
        let Command::Checkout(booking) = cli.command else {
            panic!("expected checkout");
        };
        assert_eq!(booking.car_id, 3);
        assert_eq!(booking.end, NaiveDate::from_ymd_opt(2025, 6, 4).unwrap());
    }

    #[test]
    fn test_verify_needs_exactly_one_source() {
        assert!(Cli::try_parse_from(["carrent", "verify"]).is_err());
        assert!(Cli::try_parse_from(["carrent", "verify", "--session", "cs_1", "--reservation", "2"]).is_err());
        assert!(Cli::try_parse_from(["carrent", "verify", "--reservation", "2"]).is_ok());
    }
}
