//! Notification poller driven by the manual and tokio tickers.

mod common;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use carrent_core::domain::{Notification, unread_count};
use carrent_core::ports::TransportError;
use carrent_core::{NotificationPoller, PollerConfig};
use carrent_infra::{ManualTicker, TokioTicker};

use common::{TestClient, client};

const INTERVAL: Duration = Duration::from_secs(10);

type Snapshots = Arc<Mutex<Vec<Vec<Notification>>>>;

fn recorder() -> (Snapshots, impl Fn(Vec<Notification>) + Send + Sync + 'static) {
    let snapshots: Snapshots = Arc::default();
    let sink = snapshots.clone();
    (snapshots, move |list| sink.lock().unwrap().push(list))
}

fn manual_poller(t: &TestClient) -> (NotificationPoller, ManualTicker) {
    let ticker = ManualTicker::new();
    let poller = t
        .client
        .notification_poller(Arc::new(ticker.clone()), PollerConfig { interval: INTERVAL });
    (poller, ticker)
}

#[tokio::test]
async fn first_fetch_runs_immediately_and_reports_unread() {
    let t = client();
    t.transport.push(
        200,
        r#"[{"id":1,"title":"Booked","message":"Reservation confirmed","read":false},
            {"id":2,"title":"Paid","message":"Payment received","read":true}]"#,
    );
    let (poller, ticker) = manual_poller(&t);
    let (snapshots, callback) = recorder();

    poller.start_polling(callback).await;

    let snapshots = snapshots.lock().unwrap();
    assert_eq!(snapshots.len(), 1);
    assert_eq!(unread_count(&snapshots[0]), 1);
    assert!(t.transport.requests()[0].url.ends_with("/Notification/my"));
    assert!(poller.is_polling());
    assert_eq!(ticker.active_timers(), 1);
}

#[tokio::test]
async fn ticks_follow_the_interval() {
    let t = client();
    t.transport.respond_always(200, "[]");
    let (poller, ticker) = manual_poller(&t);
    let (snapshots, callback) = recorder();

    poller.start_polling(callback).await;
    ticker.advance(Duration::from_secs(9)).await;
    assert_eq!(snapshots.lock().unwrap().len(), 1);

    ticker.advance(Duration::from_secs(21)).await;
    assert_eq!(snapshots.lock().unwrap().len(), 4);
}

#[tokio::test]
async fn restart_keeps_a_single_timer() {
    let t = client();
    t.transport.respond_always(200, "[]");
    let (poller, ticker) = manual_poller(&t);
    let (snapshots, callback) = recorder();
    let callback = Arc::new(callback);

    let cb = callback.clone();
    poller.start_polling(move |list| cb(list)).await;
    let cb = callback.clone();
    poller.start_polling(move |list| cb(list)).await;

    assert_eq!(snapshots.lock().unwrap().len(), 2);
    assert_eq!(ticker.active_timers(), 1);

    ticker.advance(INTERVAL).await;
    assert_eq!(snapshots.lock().unwrap().len(), 3);
}

#[tokio::test]
async fn stop_means_no_more_callbacks() {
    let t = client();
    t.transport.respond_always(200, "[]");
    let (poller, ticker) = manual_poller(&t);
    let (snapshots, callback) = recorder();

    poller.start_polling(callback).await;
    poller.stop_polling();
    poller.stop_polling();

    ticker.advance(INTERVAL * 6).await;
    assert_eq!(snapshots.lock().unwrap().len(), 1);
    assert_eq!(t.transport.request_count(), 1);
    assert!(!poller.is_polling());
    assert_eq!(ticker.active_timers(), 0);
}

#[tokio::test]
async fn failed_ticks_are_skipped() {
    let t = client();
    t.transport.push(200, "[]");
    t.transport.push(500, "Internal Server Error");
    t.transport.push_error(TransportError::Timeout);
    t.transport.respond_always(200, r#"[{"id":5,"message":"Reminder"}]"#);
    let (poller, ticker) = manual_poller(&t);
    let (snapshots, callback) = recorder();

    poller.start_polling(callback).await;
    ticker.advance(INTERVAL * 3).await;

    let snapshots = snapshots.lock().unwrap();
    assert_eq!(snapshots.len(), 2);
    assert_eq!(snapshots[1][0].id, 5);
    assert_eq!(t.transport.request_count(), 4);
    assert!(poller.is_polling());
}

#[tokio::test]
async fn panicking_callback_does_not_stop_polling() {
    let t = client();
    t.transport.respond_always(200, "[]");
    let (poller, ticker) = manual_poller(&t);
    let calls = Arc::new(Mutex::new(0usize));

    let counter = calls.clone();
    poller
        .start_polling(move |_| {
            let mut calls = counter.lock().unwrap();
            *calls += 1;
            if *calls == 2 {
                drop(calls);
                panic!("render failed");
            }
        })
        .await;

    ticker.advance(INTERVAL * 2).await;
    assert_eq!(*calls.lock().unwrap(), 3);
    assert_eq!(ticker.active_timers(), 1);
}

#[tokio::test]
async fn stop_during_first_fetch_discards_it() {
    let t = client();
    t.transport.respond_always(200, r#"[{"id":1}]"#);
    let gate = t.transport.hold_responses();
    let (poller, ticker) = manual_poller(&t);
    let poller = Arc::new(poller);
    let (snapshots, callback) = recorder();

    let starting = tokio::spawn({
        let poller = poller.clone();
        async move { poller.start_polling(callback).await }
    });

    while t.transport.request_count() == 0 {
        tokio::task::yield_now().await;
    }
    poller.stop_polling();
    gate.add_permits(1);
    starting.await.unwrap();

    assert!(snapshots.lock().unwrap().is_empty());
    assert!(!poller.is_polling());
    assert_eq!(ticker.active_timers(), 0);
}

#[tokio::test]
async fn dropping_the_poller_cancels_its_timer() {
    let t = client();
    t.transport.respond_always(200, "[]");
    let (poller, ticker) = manual_poller(&t);
    let (snapshots, callback) = recorder();

    poller.start_polling(callback).await;
    drop(poller);

    ticker.advance(INTERVAL * 2).await;
    assert_eq!(snapshots.lock().unwrap().len(), 1);
    assert_eq!(ticker.active_timers(), 0);
}

#[tokio::test(start_paused = true)]
async fn tokio_ticker_drives_the_poller() {
    let t = client();
    t.transport.respond_always(200, "[]");
    let poller = t
        .client
        .notification_poller(Arc::new(TokioTicker::new()), PollerConfig { interval: INTERVAL });
    let (snapshots, callback) = recorder();

    poller.start_polling(callback).await;
    tokio::time::sleep(Duration::from_secs(25)).await;
    assert_eq!(snapshots.lock().unwrap().len(), 3);

    poller.stop_polling();
    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(snapshots.lock().unwrap().len(), 3);
}
