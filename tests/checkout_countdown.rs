//! Countdown controller scenarios on tokio's paused clock.

use std::time::Duration;

use grocery_checkout::{state::CheckoutPhase, CheckoutController};
use tokio::time::sleep;

#[tokio::test(start_paused = true)]
async fn full_window_without_cancel_places_order() {
    let controller = CheckoutController::with_duration(120);
    assert!(controller.start_checkout());
    assert_eq!(controller.snapshot().remaining_seconds, 120);

    sleep(Duration::from_millis(119_500)).await;
    let session = controller.snapshot();
    assert_eq!(session.phase(), CheckoutPhase::Confirming);
    assert_eq!(session.remaining_seconds, 1);

    sleep(Duration::from_secs(1)).await;
    let session = controller.snapshot();
    assert_eq!(session.phase(), CheckoutPhase::Placed);
    assert!(session.order_placed);
    assert!(!session.overlay_visible);
    assert_eq!(session.remaining_seconds, 0);
    assert!(!controller.has_pending_tick());
}

#[tokio::test(start_paused = true)]
async fn cancel_after_five_ticks_resets_and_stops() {
    let controller = CheckoutController::with_duration(120);
    controller.start_checkout();

    sleep(Duration::from_millis(5_500)).await;
    assert_eq!(controller.snapshot().remaining_seconds, 115);

    assert!(controller.cancel());
    let session = controller.snapshot();
    assert_eq!(session.phase(), CheckoutPhase::Idle);
    assert_eq!(session.remaining_seconds, 120);
    assert!(!controller.has_pending_tick());

    sleep(Duration::from_secs(30)).await;
    assert_eq!(controller.snapshot().remaining_seconds, 120);
    assert_eq!(controller.phase(), CheckoutPhase::Idle);
}

#[tokio::test(start_paused = true)]
async fn repeated_start_cancel_cycles_do_not_leak_ticks() {
    let controller = CheckoutController::with_duration(120);

    for _ in 0..25 {
        assert!(controller.start_checkout());
        sleep(Duration::from_millis(300)).await;
        assert!(controller.cancel());
    }

    controller.start_checkout();
    sleep(Duration::from_millis(3_500)).await;
    // A leaked ticker would have taken extra seconds off
    assert_eq!(controller.snapshot().remaining_seconds, 117);
}

#[tokio::test(start_paused = true)]
async fn cancel_is_a_noop_when_idle_or_placed() {
    let controller = CheckoutController::with_duration(2);
    assert!(!controller.cancel());
    assert_eq!(controller.phase(), CheckoutPhase::Idle);

    controller.start_checkout();
    sleep(Duration::from_millis(2_500)).await;
    assert_eq!(controller.phase(), CheckoutPhase::Placed);

    assert!(!controller.cancel());
    assert_eq!(controller.phase(), CheckoutPhase::Placed);
    assert!(!controller.start_checkout());
}

#[tokio::test(start_paused = true)]
async fn acknowledged_order_can_start_again() {
    let controller = CheckoutController::with_duration(1);
    controller.start_checkout();
    sleep(Duration::from_millis(1_500)).await;
    assert_eq!(controller.phase(), CheckoutPhase::Placed);

    assert!(controller.acknowledge());
    assert!(controller.start_checkout());
    assert_eq!(controller.snapshot().remaining_seconds, 1);
    assert!(controller.has_pending_tick());
}

#[tokio::test(start_paused = true)]
async fn every_published_tick_is_one_lower() {
    let controller = CheckoutController::with_duration(10);
    let mut rx = controller.subscribe();
    controller.start_checkout();

    rx.changed().await.unwrap();
    let mut previous = rx.borrow_and_update().remaining_seconds;
    assert_eq!(previous, 10);

    loop {
        rx.changed().await.unwrap();
        let session = rx.borrow_and_update().clone();
        assert!(!(session.overlay_visible && session.order_placed));
        assert_eq!(session.remaining_seconds, previous - 1);
        previous = session.remaining_seconds;
        if session.order_placed {
            break;
        }
    }
    assert_eq!(previous, 0);
}
