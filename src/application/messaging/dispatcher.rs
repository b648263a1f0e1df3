//! Message dispatcher - Decides the reply for each incoming chat message

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use crate::application::errors::BotError;
use crate::application::services::GlobalCooldown;
use crate::domain::entities::{Action, BotIdentity, CommandTable, IncomingMessage, LIST_TRIGGER};
use crate::domain::traits::Transport;
use super::parser::MessageParser;

/// Hint sent in mention-only mode when the trigger is unknown
pub fn unknown_command_notice(sender: &str) -> String {
    format!("@{} Unknown command. Use {} to see available commands.", sender, LIST_TRIGGER)
}

/// Fixed delays applied inside a single dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchSettings {
    /// Wait before handling a message the bot sent itself
    pub self_delay: Duration,
    /// Wait before returning the unknown-command notice
    pub notice_delay: Duration,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            self_delay: Duration::from_secs(1),
            notice_delay: Duration::ZERO,
        }
    }
}

/// Message dispatcher - shared by every in-flight message task
pub struct MessageDispatcher {
    table: Arc<CommandTable>,
    cooldown: Arc<GlobalCooldown>,
    identity: BotIdentity,
    parser: MessageParser,
    settings: DispatchSettings,
}

impl MessageDispatcher {
    pub fn new(table: Arc<CommandTable>, cooldown: Arc<GlobalCooldown>, identity: BotIdentity) -> Self {
        Self {
            parser: MessageParser::new(&identity),
            table,
            cooldown,
            identity,
            settings: DispatchSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: DispatchSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Decide what to do with one message.
    ///
    /// While the cooldown is running nothing is processed at all, not even the
    /// unknown-command notice. A matched command arms the cooldown before the
    /// reply is handed back. The check and the arm are separate critical
    /// sections, so two messages racing through the gap can both reply.
    pub async fn on_message(&self, message: &IncomingMessage) -> Action {
        if !self.cooldown.can_use() {
            tracing::debug!(
                id = %message.id,
                sender = %message.sender,
                remaining_ms = self.cooldown.remaining().as_millis() as u64,
                "Bot in cooldown"
            );
            return Action::NoReply;
        }

        if self.identity.is_self(&message.sender) && !self.settings.self_delay.is_zero() {
            tokio::time::sleep(self.settings.self_delay).await;
        }

        let Some(command) = self.parser.parse(&message.text) else {
            return Action::NoReply;
        };

        match self.table.get(&command) {
            Some(reply) => {
                self.cooldown.mark_used();
                tracing::info!(
                    id = %message.id,
                    sender = %message.sender,
                    command = %command,
                    reply = %reply,
                    latency_ms = (Utc::now() - message.received_at).num_milliseconds(),
                    "Command executed"
                );
                Action::Reply {
                    channel: self.identity.channel.clone(),
                    text: reply.to_string(),
                }
            }
            None => {
                tracing::debug!(id = %message.id, sender = %message.sender, command = %command, "Unknown command");
                if !self.identity.mention_only {
                    return Action::NoReply;
                }
                if !self.settings.notice_delay.is_zero() {
                    tokio::time::sleep(self.settings.notice_delay).await;
                }
                Action::Notice {
                    channel: self.identity.channel.clone(),
                    text: unknown_command_notice(&message.sender),
                }
            }
        }
    }

    /// Dispatch a message and deliver the outcome. Send failures are returned
    /// once; the cooldown stays armed and nothing is retried.
    pub async fn handle(&self, message: &IncomingMessage, transport: &dyn Transport) -> Result<Action, BotError> {
        let action = self.on_message(message).await;

        if let Action::Reply { channel, text } | Action::Notice { channel, text } = &action {
            transport.send(channel, text).await.map_err(|e| match e {
                BotError::Send(_) => e,
                other => BotError::Send(other.to_string()),
            })?;
        }

        Ok(action)
    }
}
