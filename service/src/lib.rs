use config::Config;
use events::{EventPublisher, TriggerSet};
use log::info;
use sse::{Manager, SseBroadcastHandler};
use std::sync::Arc;

pub mod config;
pub mod error;
pub mod logging;

// Service-level state shared by every request handler
// Needs to implement Clone to be able to be passed into Router as State
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub sse_manager: Arc<Manager>,
    pub event_publisher: EventPublisher,
    pub trigger_set: Arc<TriggerSet>,
}

impl AppState {
    pub fn new(app_config: Config) -> Self {
        let sse_manager = Arc::new(Manager::with_queue_capacity(
            app_config.subscriber_queue_capacity,
        ));
        let event_publisher = EventPublisher::new()
            .with_handler(Arc::new(SseBroadcastHandler::new(Arc::clone(&sse_manager))));
        let trigger_set = app_config.trigger_set();

        if trigger_set.is_match_all() {
            info!("No trigger events configured, every webhook event will be broadcast");
        } else {
            info!("Broadcasting {} trigger event(s)", trigger_set.len());
        }

        Self {
            config: Arc::new(app_config),
            sse_manager,
            event_publisher,
            trigger_set: Arc::new(trigger_set),
        }
    }
}
