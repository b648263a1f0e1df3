use chrono::{DateTime, Utc};

/// A chat line received from the platform
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    pub id: String,
    pub sender: String,
    pub text: String,
    pub channel: String,
    pub received_at: DateTime<Utc>,
}

impl IncomingMessage {
    pub fn new(
        sender: impl Into<String>,
        text: impl Into<String>,
        channel: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            sender: sender.into(),
            text: text.into(),
            channel: channel.into(),
            received_at: Utc::now(),
        }
    }
}

/// What the dispatcher decided to do with one message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Nothing is sent
    NoReply,
    /// Reply text of a matched command
    Reply { channel: String, text: String },
    /// Unknown-command hint addressed to the sender
    Notice { channel: String, text: String },
}
