use anyhow::{Context, Result};
use reqwest::Client;
use serde_json::json;
use std::time::{Duration, Instant};

const COUNT_PREFIX: &str = "Current subscription count:";

pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(client: Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    /// Deliver a webhook payload naming `event_name` to `/publish`.
    pub async fn publish(&self, event_name: &str) -> Result<()> {
        let url = format!("{}/publish", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&json!({ "event": event_name }))
            .send()
            .await
            .context("Failed to send publish request")?;

        if !response.status().is_success() {
            anyhow::bail!("Publish failed: {}", response.status());
        }

        Ok(())
    }

    pub async fn subscription_count(&self) -> Result<usize> {
        let url = format!("{}/subscriptions", self.base_url);

        let body = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to fetch subscription count")?
            .error_for_status()?
            .text()
            .await?;

        parse_count(&body)
    }

    /// Poll `/subscriptions` until it reports `expected` or `timeout` passes.
    ///
    /// The hub only notices a closed stream once it next writes to it, so a
    /// drop can take up to one keep-alive interval to show up.
    pub async fn wait_for_subscription_count(
        &self,
        expected: usize,
        timeout: Duration,
    ) -> Result<usize> {
        let deadline = Instant::now() + timeout;

        loop {
            let count = self.subscription_count().await?;
            if count == expected {
                return Ok(count);
            }
            if Instant::now() >= deadline {
                anyhow::bail!("Expected {} subscriptions, hub reports {}", expected, count);
            }
            tokio::time::sleep(Duration::from_millis(250)).await;
        }
    }
}

fn parse_count(body: &str) -> Result<usize> {
    body.trim()
        .strip_prefix(COUNT_PREFIX)
        .context("Unexpected subscription count response")?
        .trim()
        .parse()
        .context("Subscription count is not a number")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_count_response() {
        assert_eq!(parse_count("Current subscription count: 2").unwrap(), 2);
        assert!(parse_count("healthy").is_err());
        assert!(parse_count("Current subscription count: many").is_err());
    }
}
