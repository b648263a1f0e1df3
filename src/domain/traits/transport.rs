use async_trait::async_trait;
use crate::domain::entities::IncomingMessage;
use crate::application::errors::BotError;

/// Transport trait - abstraction for chat platform connections
#[async_trait]
pub trait Transport: Send + Sync {
    /// Join the channel the bot answers in. Called once at startup.
    async fn join(&self, channel: &str) -> Result<(), BotError>;

    /// Next incoming chat message, `None` once the connection is gone
    async fn receive(&self) -> Option<IncomingMessage>;

    /// Send a chat message to a channel
    async fn send(&self, channel: &str, text: &str) -> Result<(), BotError>;

    /// Platform identifier used in logs
    fn platform_name(&self) -> &str;
}
