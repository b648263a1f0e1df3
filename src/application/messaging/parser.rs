//! Message parser - Addressing rules and command extraction

use crate::domain::entities::{BotIdentity, COMMAND_MARKER};

/// Decides whether a chat line is meant for the bot and pulls out the trigger
#[derive(Debug, Clone)]
pub struct MessageParser {
    mention: String,
    mention_only: bool,
}

impl MessageParser {
    pub fn new(identity: &BotIdentity) -> Self {
        Self {
            mention: identity.mention(),
            mention_only: identity.mention_only,
        }
    }

    /// Mention-only mode needs `@<bot_name>`; otherwise a leading `!` is enough
    pub fn is_addressed(&self, text: &str) -> bool {
        let mentioned = text.contains(&self.mention);
        if self.mention_only {
            mentioned
        } else {
            mentioned || text.trim().starts_with(COMMAND_MARKER)
        }
    }

    /// First whitespace-separated token once the first mention is removed
    pub fn extract_command(&self, text: &str) -> Option<String> {
        let cleaned = text.replacen(&self.mention, "", 1);
        cleaned.split_whitespace().next().map(str::to_string)
    }

    /// Candidate trigger of an addressed message
    pub fn parse(&self, text: &str) -> Option<String> {
        if !self.is_addressed(text) {
            return None;
        }
        self.extract_command(text)
    }
}
