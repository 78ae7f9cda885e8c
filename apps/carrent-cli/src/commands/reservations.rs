use anyhow::Result;
use serde_json::json;

use carrent_core::domain::NewReservation;

use super::print_json;
use crate::app::App;
use crate::cli::ReservationsAction;

pub async fn run(app: &App, action: ReservationsAction) -> Result<()> {
    let auth = app.client.auth();
    if matches!(action, ReservationsAction::All) {
        auth.require_admin()?;
    } else {
        auth.require_authenticated()?;
    }
    let reservations = app.client.reservations();

    match action {
        ReservationsAction::Mine => print_json(&reservations.mine().await?),
        ReservationsAction::All => print_json(&reservations.all().await?),
        ReservationsAction::Create(booking) => {
            let new = NewReservation::new(booking.car_id, booking.start, booking.end);
            let payload = reservations.create(&new).await?;
            tracing::info!(car_id = new.car_id, days = new.days(), "Reservation created");
            print_json(&payload.into_value())
        }
        ReservationsAction::Cancel { id } => {
            reservations.cancel(id).await?;
            print_json(&json!({ "cancelled": id }))
        }
    }
}
