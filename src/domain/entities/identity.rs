use std::time::Duration;

/// Who the bot is and where it speaks. Resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotIdentity {
    pub bot_name: String,
    pub channel: String,
    pub mention_only: bool,
    pub cooldown: Duration,
}

impl BotIdentity {
    pub fn new(bot_name: impl Into<String>, channel: impl Into<String>) -> Self {
        Self {
            bot_name: bot_name.into(),
            channel: channel.into(),
            mention_only: false,
            cooldown: Duration::from_secs(15),
        }
    }

    pub fn with_mention_only(mut self, mention_only: bool) -> Self {
        self.mention_only = mention_only;
        self
    }

    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    /// `@<bot_name>` as it appears in chat
    pub fn mention(&self) -> String {
        format!("@{}", self.bot_name)
    }

    /// ASCII case-insensitive, unlike an exact name comparison: Twitch
    /// logins are lowercase while configured names may not be
    pub fn is_self(&self, sender: &str) -> bool {
        sender.eq_ignore_ascii_case(&self.bot_name)
    }
}
