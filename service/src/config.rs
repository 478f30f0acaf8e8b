use clap::builder::TypedValueParser as _;
use clap::Parser;
use dotenvy::dotenv;
use events::TriggerSet;
use log::LevelFilter;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Event names that trigger a broadcast unless `TRIGGER_EVENTS` says otherwise.
pub const DEFAULT_TRIGGER_EVENTS: &str =
    "edx.course.enrollment.activated,edx.bi.user.account.registered,Completed Order";

#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// The host interface to listen for incoming connections
    #[arg(short, long, env, default_value = "127.0.0.1")]
    pub interface: Option<String>,

    /// The host TCP port to listen for incoming connections
    #[arg(short, long, env, default_value_t = 4000)]
    pub port: u16,

    /// Set the log level verbosity threshold (level) to control what gets displayed on console output
    #[arg(
        short,
        long,
        env,
        default_value_t = LevelFilter::Info,
        value_parser = clap::builder::PossibleValuesParser::new(["OFF", "ERROR", "WARN", "INFO", "DEBUG", "TRACE"])
            .map(|s| s.parse::<LevelFilter>().unwrap()),
        )]
    pub log_level_filter: LevelFilter,

    /// Webhook event names that cause a broadcast. An empty value broadcasts every event.
    #[arg(
        short,
        long,
        env,
        value_delimiter = ',',
        default_value = DEFAULT_TRIGGER_EVENTS
    )]
    trigger_events: Vec<String>,

    /// Username required (with the password) on the index page and event stream
    #[arg(long, env)]
    username: Option<String>,

    /// Password required (with the username) on the index page and event stream
    #[arg(long, env, hide_env_values = true)]
    password: Option<String>,

    /// Seconds a stream may sit idle before a keep-alive comment is sent. 0 disables it.
    #[arg(long, env, default_value_t = 15)]
    pub keep_alive_secs: u64,

    /// Maximum number of undelivered messages buffered per subscriber. Broadcasts that
    /// arrive while a subscriber's queue is full are dropped for that subscriber.
    #[arg(
        long,
        env,
        default_value_t = 1024,
        value_parser = clap::value_parser!(u64).range(1..).map(|n| n as usize)
    )]
    pub subscriber_queue_capacity: usize,

    /// Directory holding `index.html` and the static assets it loads
    #[arg(long, env, default_value = "./static")]
    static_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        // Load .env file first
        dotenv().ok();
        // Then parse the command line parameters and flags
        Config::parse()
    }

    pub fn interface(&self) -> &str {
        self.interface.as_deref().unwrap_or("127.0.0.1")
    }

    /// `interface:port`, as handed to the TCP listener.
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.interface(), self.port)
    }

    pub fn trigger_set(&self) -> TriggerSet {
        TriggerSet::new(self.trigger_events.iter().map(|name| name.trim()))
    }

    /// Basic auth credentials, when both a username and a password are set.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(username), Some(password)) => Some((username, password)),
            _ => None,
        }
    }

    pub fn keep_alive_interval(&self) -> Option<Duration> {
        (self.keep_alive_secs > 0).then(|| Duration::from_secs(self.keep_alive_secs))
    }

    pub fn static_dir(&self) -> &Path {
        &self.static_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use events::WebhookEvent;

    fn parse(args: &[&str]) -> Config {
        Config::parse_from(std::iter::once("sse_hub").chain(args.iter().copied()))
    }

    #[test]
    fn defaults() {
        let config = parse(&[]);
        assert_eq!(config.keep_alive_interval(), Some(Duration::from_secs(15)));
        assert_eq!(config.subscriber_queue_capacity, 1024);
        assert_eq!(config.static_dir(), Path::new("./static"));
    }

    #[test]
    fn listen_address_joins_interface_and_port() {
        let config = parse(&["--interface", "0.0.0.0", "--port", "8080"]);
        assert_eq!(config.listen_address(), "0.0.0.0:8080");
    }

    #[test]
    fn default_trigger_set_is_the_three_known_events() {
        let triggers = parse(&[]).trigger_set();
        assert_eq!(triggers.len(), 3);
        assert!(triggers.matches(&WebhookEvent::new("edx.course.enrollment.activated")));
        assert!(triggers.matches(&WebhookEvent::new("edx.bi.user.account.registered")));
        assert!(triggers.matches(&WebhookEvent::new("Completed Order")));
        assert!(!triggers.matches(&WebhookEvent::new("Viewed Page")));
    }

    #[test]
    fn empty_trigger_events_match_everything() {
        let config = parse(&["--trigger-events", ""]);
        assert!(config.trigger_set().is_match_all());
    }

    #[test]
    fn trigger_events_are_comma_delimited_and_trimmed() {
        let triggers = parse(&["--trigger-events", "a, b"]).trigger_set();
        assert_eq!(triggers.len(), 2);
        assert!(triggers.matches(&WebhookEvent::new("b")));
    }

    #[test]
    fn credentials_require_both_parts() {
        assert_eq!(parse(&["--username", "admin"]).credentials(), None);
        assert_eq!(
            parse(&["--username", "admin", "--password", "secret"]).credentials(),
            Some(("admin", "secret"))
        );
    }

    #[test]
    fn zero_keep_alive_disables_it() {
        assert_eq!(parse(&["--keep-alive-secs", "0"]).keep_alive_interval(), None);
    }

    #[test]
    fn queue_capacity_must_be_positive() {
        let result = Config::try_parse_from(["sse_hub", "--subscriber-queue-capacity", "0"]);
        assert!(result.is_err());
    }
}
