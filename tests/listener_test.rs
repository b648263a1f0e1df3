//! Message loop integration tests
//! Run with: cargo test --test listener_test

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{harness, harness_with, message, MockTransport, BOT_NAME, CHANNEL};
use pasta_bot::application::messaging::{run_message_loop, LoopExit};
use pasta_bot::domain::traits::Transport;

fn help_reply() -> (String, String) {
    (CHANNEL.to_string(), "try !list".to_string())
}

#[tokio::test]
async fn test_delayed_reply_is_sent_before_input_close_returns() {
    let h = harness_with(false, Duration::ZERO, Duration::from_millis(50));
    let transport = Arc::new(MockTransport::new());
    transport.push(message(BOT_NAME, "!help"));

    let exit = run_message_loop(
        Arc::clone(&h.dispatcher),
        Arc::clone(&transport) as Arc<dyn Transport>,
        std::future::pending(),
    )
    .await;

    assert_eq!(exit, LoopExit::InputClosed);
    assert_eq!(transport.sent(), vec![help_reply()]);
}

#[tokio::test]
async fn test_shutdown_waits_for_in_flight_dispatch() {
    let h = harness_with(false, Duration::ZERO, Duration::from_millis(100));
    let transport = Arc::new(MockTransport::held_open());
    transport.push(message(BOT_NAME, "!help"));

    let exit = run_message_loop(
        Arc::clone(&h.dispatcher),
        Arc::clone(&transport) as Arc<dyn Transport>,
        tokio::time::sleep(Duration::from_millis(10)),
    )
    .await;

    assert_eq!(exit, LoopExit::Shutdown);
    assert_eq!(transport.sent(), vec![help_reply()]);
}

#[tokio::test]
async fn test_every_message_is_dispatched() {
    let h = harness(false, Duration::ZERO);
    let transport = Arc::new(MockTransport::new());
    for i in 0..3 {
        transport.push(message(&format!("viewer{}", i), "!help"));
    }
    transport.push(message("viewer", "just chatting"));

    let exit = run_message_loop(
        Arc::clone(&h.dispatcher),
        Arc::clone(&transport) as Arc<dyn Transport>,
        std::future::pending(),
    )
    .await;

    assert_eq!(exit, LoopExit::InputClosed);
    assert_eq!(transport.sent().len(), 3);
}

#[tokio::test]
async fn test_send_failure_does_not_stop_the_loop() {
    let h = harness(false, Duration::ZERO);
    let transport = Arc::new(MockTransport::failing());
    transport.push(message("viewer", "!help"));
    transport.push(message("viewer", "!help"));

    let exit = run_message_loop(
        Arc::clone(&h.dispatcher),
        Arc::clone(&transport) as Arc<dyn Transport>,
        std::future::pending(),
    )
    .await;

    assert_eq!(exit, LoopExit::InputClosed);
    assert!(transport.sent().is_empty());
}
