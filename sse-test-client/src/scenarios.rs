use crate::api_client::ApiClient;
use crate::output::{
    print_failure, print_scenario_header, print_step, print_success, TestResult,
};
use crate::sse_client::Connection;
use anyhow::Result;
use std::time::{Duration, Instant};

const MESSAGE_TIMEOUT: Duration = Duration::from_secs(5);
const SILENCE_PERIOD: Duration = Duration::from_secs(2);

/// Both clients open cleanly and are counted by the hub.
pub async fn test_connection(
    api_client: &ApiClient,
    expected_count: usize,
    client_a: &mut Connection,
    client_b: &mut Connection,
) -> Result<TestResult> {
    const NAME: &str = "connection";
    print_scenario_header(NAME);
    let start = Instant::now();

    for client in [&mut *client_a, &mut *client_b] {
        print_step(&format!("Waiting for the opening keep-alive on {}", client.label));
        if let Err(e) = client.wait_for_keep_alive(MESSAGE_TIMEOUT).await {
            print_failure(&format!("{}: {}", client.label, e));
            return Ok(TestResult::fail(NAME, e.to_string(), start.elapsed()));
        }
        print_success(&format!("{} is streaming", client.label));
    }

    print_step(&format!("Expecting {} subscriptions", expected_count));
    if let Err(e) = api_client
        .wait_for_subscription_count(expected_count, MESSAGE_TIMEOUT)
        .await
    {
        print_failure(&e.to_string());
        return Ok(TestResult::fail(NAME, e.to_string(), start.elapsed()));
    }
    print_success("Subscription count matches");

    Ok(TestResult::pass(NAME, start.elapsed()))
}

/// A trigger event reaches every connected client.
pub async fn test_broadcast(
    api_client: &ApiClient,
    trigger_event: &str,
    client_a: &mut Connection,
    client_b: &mut Connection,
) -> Result<TestResult> {
    const NAME: &str = "broadcast";
    print_scenario_header(NAME);
    let start = Instant::now();

    print_step(&format!("Publishing {:?}", trigger_event));
    api_client.publish(trigger_event).await?;

    for client in [&mut *client_a, &mut *client_b] {
        match client.wait_for_message(MESSAGE_TIMEOUT).await {
            Ok(event) if event.data == trigger_event => {
                print_success(&format!(
                    "{} received {:?} as a {:?} event after {}ms",
                    client.label,
                    event.data,
                    event.event_type,
                    event.timestamp.duration_since(start).as_millis()
                ));
            }
            Ok(event) => {
                let message = format!(
                    "{} received {:?}, expected {:?}",
                    client.label, event.data, trigger_event
                );
                print_failure(&message);
                return Ok(TestResult::fail(NAME, message, start.elapsed()));
            }
            Err(e) => {
                let message = format!("{}: {}", client.label, e);
                print_failure(&message);
                return Ok(TestResult::fail(NAME, message, start.elapsed()));
            }
        }
    }

    Ok(TestResult::pass(NAME, start.elapsed()))
}

/// An event outside the trigger set is acknowledged but never broadcast.
pub async fn test_trigger_filter(
    api_client: &ApiClient,
    ignored_event: &str,
    client_a: &mut Connection,
    client_b: &mut Connection,
) -> Result<TestResult> {
    const NAME: &str = "trigger filter";
    print_scenario_header(NAME);
    let start = Instant::now();

    print_step(&format!("Publishing {:?}", ignored_event));
    api_client.publish(ignored_event).await?;

    for client in [&mut *client_a, &mut *client_b] {
        if let Some(event) = client.message_within(SILENCE_PERIOD).await {
            let message = format!("{} unexpectedly received {:?}", client.label, event.data);
            print_failure(&message);
            return Ok(TestResult::fail(NAME, message, start.elapsed()));
        }
        print_success(&format!("{} stayed silent", client.label));
    }

    Ok(TestResult::pass(NAME, start.elapsed()))
}

/// Closing one client unregisters it while the other keeps receiving.
///
/// Takes ownership of `client_a` since it is closed.
pub async fn test_disconnect(
    api_client: &ApiClient,
    trigger_event: &str,
    expected_count: usize,
    disconnect_timeout: Duration,
    client_a: Connection,
    client_b: &mut Connection,
) -> Result<TestResult> {
    const NAME: &str = "disconnect";
    print_scenario_header(NAME);
    let start = Instant::now();

    print_step(&format!("Closing {}", client_a.label));
    client_a.close();

    print_step(&format!("Waiting for the hub to report {} subscriptions", expected_count));
    if let Err(e) = api_client
        .wait_for_subscription_count(expected_count, disconnect_timeout)
        .await
    {
        print_failure(&e.to_string());
        return Ok(TestResult::fail(NAME, e.to_string(), start.elapsed()));
    }
    print_success("Closed client was unregistered");

    print_step(&format!("Publishing {:?}", trigger_event));
    api_client.publish(trigger_event).await?;

    match client_b.wait_for_message(MESSAGE_TIMEOUT).await {
        Ok(event) if event.data == trigger_event => {
            print_success(&format!("{} still receives messages", client_b.label));
            Ok(TestResult::pass(NAME, start.elapsed()))
        }
        Ok(event) => {
            let message = format!("{} received {:?}", client_b.label, event.data);
            print_failure(&message);
            Ok(TestResult::fail(NAME, message, start.elapsed()))
        }
        Err(e) => {
            let message = format!("{}: {}", client_b.label, e);
            print_failure(&message);
            Ok(TestResult::fail(NAME, message, start.elapsed()))
        }
    }
}
