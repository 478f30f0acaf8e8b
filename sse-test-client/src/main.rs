use anyhow::Result;
use clap::Parser;
use colored::*;
use std::time::Duration;

mod api_client;
mod auth;
mod output;
mod scenarios;
mod sse_client;

use api_client::ApiClient;
use auth::Credentials;
use output::print_test_summary;
use sse_client::Connection;

#[derive(Parser)]
#[command(name = "sse-test-client")]
#[command(about = "End-to-end tester for the SSE hub")]
struct Cli {
    /// Base URL of the hub (e.g., http://127.0.0.1:4000)
    #[arg(long)]
    base_url: String,

    /// Basic auth credentials for /stream (format: username:password)
    #[arg(long)]
    credentials: Option<String>,

    /// Test scenario to run
    #[arg(long, value_enum)]
    scenario: ScenarioChoice,

    /// An event name in the hub's trigger set
    #[arg(long, default_value = "Completed Order")]
    trigger_event: String,

    /// An event name outside the hub's trigger set
    #[arg(long, default_value = "Viewed Page")]
    ignored_event: String,

    /// How long to wait for the hub to notice a closed stream.
    /// Should exceed the hub's keep-alive interval.
    #[arg(long, default_value_t = 30)]
    disconnect_timeout_secs: u64,

    /// Enable verbose output
    #[arg(long, short)]
    verbose: bool,
}

#[derive(clap::ValueEnum, Clone)]
enum ScenarioChoice {
    /// Open two streams and check the subscription count
    ConnectionTest,
    /// Publish a trigger event and expect it on both streams
    Broadcast,
    /// Publish a non-trigger event and expect silence
    TriggerFilter,
    /// Close one stream and check the other still receives
    Disconnect,
    /// Run every scenario in order
    All,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    }

    println!("{}", "=== SETUP PHASE ===".bright_white().bold());

    let credentials = cli
        .credentials
        .as_deref()
        .map(Credentials::parse)
        .transpose()?;

    let client = reqwest::Client::new();
    let api_client = ApiClient::new(client, cli.base_url.clone());

    let baseline = api_client.subscription_count().await?;
    println!(
        "{} Hub reachable, {} existing subscriptions",
        "✓".green(),
        baseline
    );

    println!("\n{} Establishing SSE connections...", "→".blue());
    let mut client_a =
        Connection::establish(&cli.base_url, credentials.as_ref(), "Client A".to_string())
            .await?;
    let mut client_b =
        Connection::establish(&cli.base_url, credentials.as_ref(), "Client B".to_string())
            .await?;

    // Every scenario expects both streams to be registered first.
    let connection =
        scenarios::test_connection(&api_client, baseline + 2, &mut client_a, &mut client_b)
            .await?;

    println!("\n{}", "=== TEST PHASE ===".bright_white().bold());

    let disconnect_timeout = Duration::from_secs(cli.disconnect_timeout_secs);
    let mut results = vec![connection];

    match cli.scenario {
        ScenarioChoice::ConnectionTest => {}
        ScenarioChoice::Broadcast => {
            results.push(
                scenarios::test_broadcast(
                    &api_client,
                    &cli.trigger_event,
                    &mut client_a,
                    &mut client_b,
                )
                .await?,
            );
        }
        ScenarioChoice::TriggerFilter => {
            results.push(
                scenarios::test_trigger_filter(
                    &api_client,
                    &cli.ignored_event,
                    &mut client_a,
                    &mut client_b,
                )
                .await?,
            );
        }
        ScenarioChoice::Disconnect => {
            results.push(
                scenarios::test_disconnect(
                    &api_client,
                    &cli.trigger_event,
                    baseline + 1,
                    disconnect_timeout,
                    client_a,
                    &mut client_b,
                )
                .await?,
            );
        }
        ScenarioChoice::All => {
            results.push(
                scenarios::test_broadcast(
                    &api_client,
                    &cli.trigger_event,
                    &mut client_a,
                    &mut client_b,
                )
                .await?,
            );
            results.push(
                scenarios::test_trigger_filter(
                    &api_client,
                    &cli.ignored_event,
                    &mut client_a,
                    &mut client_b,
                )
                .await?,
            );
            results.push(
                scenarios::test_disconnect(
                    &api_client,
                    &cli.trigger_event,
                    baseline + 1,
                    disconnect_timeout,
                    client_a,
                    &mut client_b,
                )
                .await?,
            );
        }
    }

    println!("\n{}", "=== RESULTS ===".bright_white().bold());
    print_test_summary(&results);

    let all_passed = results.iter().all(|r| r.passed);

    if all_passed {
        println!("\n{}", "All tests passed! ✓".bright_green().bold());
    } else {
        println!("\n{}", "Some tests failed! ✗".bright_red().bold());
    }

    std::process::exit(if all_passed { 0 } else { 1 });
}
