//! Shared fixtures for the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

use pasta_bot::application::errors::BotError;
use pasta_bot::application::messaging::{DispatchSettings, MessageDispatcher};
use pasta_bot::application::services::GlobalCooldown;
use pasta_bot::domain::entities::{BotIdentity, Command, CommandTable, IncomingMessage};
use pasta_bot::domain::traits::Transport;

pub const BOT_NAME: &str = "BotName";
pub const CHANNEL: &str = "streamer";

/// Transport that records outgoing messages
#[derive(Default)]
pub struct MockTransport {
    pub sent: Mutex<Vec<(String, String)>>,
    incoming: Mutex<VecDeque<IncomingMessage>>,
    fail_sends: bool,
    hold_open: bool,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail_sends: true,
            ..Self::default()
        }
    }

    /// Never reports the input as closed once the queue is empty
    pub fn held_open() -> Self {
        Self {
            hold_open: true,
            ..Self::default()
        }
    }

    pub fn push(&self, message: IncomingMessage) {
        self.incoming.lock().unwrap().push_back(message);
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn join(&self, _channel: &str) -> Result<(), BotError> {
        Ok(())
    }

    async fn receive(&self) -> Option<IncomingMessage> {
        let next = self.incoming.lock().unwrap().pop_front();
        match next {
            None if self.hold_open => std::future::pending().await,
            next => next,
        }
    }

    async fn send(&self, channel: &str, text: &str) -> Result<(), BotError> {
        if self.fail_sends {
            return Err(BotError::Send("connection reset".to_string()));
        }
        self.sent.lock().unwrap().push((channel.to_string(), text.to_string()));
        Ok(())
    }

    fn platform_name(&self) -> &str {
        "mock"
    }
}

pub fn help_table() -> Arc<CommandTable> {
    Arc::new(CommandTable::build(vec![Command::new("!help", "try !list")]))
}

pub struct Harness {
    pub dispatcher: Arc<MessageDispatcher>,
    pub cooldown: Arc<GlobalCooldown>,
}

pub fn harness(mention_only: bool, cooldown: Duration) -> Harness {
    harness_with(mention_only, cooldown, Duration::ZERO)
}

pub fn harness_with(mention_only: bool, cooldown: Duration, self_delay: Duration) -> Harness {
    let identity = BotIdentity::new(BOT_NAME, CHANNEL)
        .with_mention_only(mention_only)
        .with_cooldown(cooldown);
    let gate = Arc::new(GlobalCooldown::new(cooldown));
    let dispatcher = MessageDispatcher::new(help_table(), Arc::clone(&gate), identity)
        .with_settings(DispatchSettings {
            self_delay,
            notice_delay: Duration::ZERO,
        });
    Harness {
        dispatcher: Arc::new(dispatcher),
        cooldown: gate,
    }
}

pub fn message(sender: &str, text: &str) -> IncomingMessage {
    IncomingMessage::new(sender, text, CHANNEL)
}

/// Fields of every event seen while the guard is alive
#[derive(Clone, Default)]
pub struct CapturedLogs {
    events: Arc<Mutex<Vec<HashMap<String, String>>>>,
}

impl CapturedLogs {
    /// Install a capturing subscriber for the current thread
    pub fn install() -> (Self, tracing::subscriber::DefaultGuard) {
        let logs = Self::default();
        let subscriber = tracing_subscriber::registry().with(CaptureLayer(logs.clone()));
        let guard = tracing::subscriber::set_default(subscriber);
        (logs, guard)
    }

    pub fn events(&self) -> Vec<HashMap<String, String>> {
        self.events.lock().unwrap().clone()
    }

    pub fn find(&self, message: &str) -> Option<HashMap<String, String>> {
        self.events()
            .into_iter()
            .find(|event| event.get("message").map(String::as_str) == Some(message))
    }
}

struct CaptureLayer(CapturedLogs);

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = HashMap::new();
        fields.insert("level".to_string(), event.metadata().level().to_string());
        event.record(&mut FieldVisitor(&mut fields));
        self.0.events.lock().unwrap().push(fields);
    }
}

struct FieldVisitor<'a>(&'a mut HashMap<String, String>);

impl Visit for FieldVisitor<'_> {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.insert(field.name().to_string(), format!("{:?}", value));
    }
}
