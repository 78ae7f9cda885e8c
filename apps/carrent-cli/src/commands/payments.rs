use anyhow::Result;
use serde_json::json;

use carrent_core::domain::{NewReservation, PaymentReturn, PaymentState};

use super::print_json;
use crate::app::App;
use crate::cli::{Booking, VerifyArgs};

pub async fn checkout(app: &App, booking: Booking) -> Result<()> {
    app.client.auth().require_authenticated()?;
    let reservation = NewReservation::new(booking.car_id, booking.start, booking.end);
    let checkout = app.client.payments().checkout(&reservation).await?;

    eprintln!("Open this page to pay: {}", checkout.checkout_url);
    print_json(&checkout)
}

pub async fn pay(app: &App, reservation_id: i64) -> Result<()> {
    app.client.auth().require_authenticated()?;
    let session = app.client.payments().create_session(reservation_id).await?;

    eprintln!("Open this page to pay: {}", session.checkout_url);
    print_json(&json!({
        "reservationId": reservation_id,
        "checkoutUrl": session.checkout_url,
    }))
}

pub async fn verify(app: &App, args: VerifyArgs) -> Result<()> {
    app.client.auth().require_authenticated()?;
    let ret = match (args.session, args.reservation, args.return_url) {
        (Some(session_id), _, _) => PaymentReturn {
            session_id: Some(session_id),
            reservation_id: None,
        },
        (None, Some(id), _) => PaymentReturn {
            session_id: None,
            reservation_id: Some(id.to_string()),
        },
        (None, None, Some(url)) => PaymentReturn::from_url(&url),
        (None, None, None) => PaymentReturn::default(),
    };

    let verification = app.client.payments().verify_return(&ret).await?;
    match verification.state {
        PaymentState::Succeeded => tracing::info!("Payment confirmed"),
        PaymentState::Pending => tracing::info!("Payment still processing"),
        PaymentState::Failed => tracing::warn!(status = %verification.status, "Payment not completed"),
    }
    print_json(&verification)
}
