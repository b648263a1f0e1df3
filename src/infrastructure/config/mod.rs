//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use crate::application::errors::ConfigError;
use crate::domain::entities::{BotIdentity, Command};

pub const ENV_BOT_USERNAME: &str = "TWITCH_BOT_USERNAME";
pub const ENV_OAUTH_TOKEN: &str = "TWITCH_OAUTH_TOKEN";
pub const ENV_CHANNEL: &str = "TWITCH_CHANNEL";
pub const ENV_MENTION_ONLY: &str = "MENTION_ONLY";
pub const ENV_COOLDOWN_SECONDS: &str = "COOLDOWN_SECONDS";
pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";
pub const ENV_LOG_FILE: &str = "LOG_FILE";
pub const ENV_COMMANDS_FILE: &str = "COMMANDS_FILE";

pub const DEFAULT_COOLDOWN_SECONDS: u64 = 15;
pub const DEFAULT_COMMANDS_FILE: &str = "commands.yaml";

/// Log verbosity accepted in `LOG_LEVEL`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Case-insensitive; anything unrecognized is `Info`
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "DEBUG" => LogLevel::Debug,
            "WARN" => LogLevel::Warn,
            "ERROR" => LogLevel::Error,
            _ => LogLevel::Info,
        }
    }

    pub fn as_tracing(self) -> tracing::Level {
        match self {
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

/// Where and how much to log
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogConfig {
    pub level: LogLevel,
    pub file: Option<PathBuf>,
}

impl LogConfig {
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            level: lookup(ENV_LOG_LEVEL)
                .map(|v| LogLevel::parse(&v))
                .unwrap_or_default(),
            file: lookup(ENV_LOG_FILE).map(PathBuf::from),
        }
    }
}

/// Settings resolved once from the environment
#[derive(Debug, Clone)]
pub struct Settings {
    pub bot_name: String,
    pub oauth_token: Option<String>,
    pub channel: String,
    pub mention_only: bool,
    pub cooldown_seconds: u64,
    pub commands_file: PathBuf,
    pub log: LogConfig,
}

impl Settings {
    pub fn load_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_value)
    }

    /// Resolve settings through `lookup`. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bot_name = lookup(ENV_BOT_USERNAME)
            .ok_or_else(|| ConfigError::MissingVar(ENV_BOT_USERNAME.to_string()))?;
        let channel = lookup(ENV_CHANNEL)
            .map(|c| c.trim().trim_start_matches('#').to_string())
            .ok_or_else(|| ConfigError::MissingVar(ENV_CHANNEL.to_string()))?;

        let mention_only = lookup(ENV_MENTION_ONLY)
            .map(|v| v.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let cooldown_seconds = match lookup(ENV_COOLDOWN_SECONDS) {
            Some(value) => value.trim().parse().unwrap_or_else(|_| {
                tracing::warn!(
                    value = %value,
                    "Invalid {}, using default of {}s",
                    ENV_COOLDOWN_SECONDS,
                    DEFAULT_COOLDOWN_SECONDS
                );
                DEFAULT_COOLDOWN_SECONDS
            }),
            None => DEFAULT_COOLDOWN_SECONDS,
        };

        Ok(Self {
            bot_name: bot_name.trim().to_string(),
            oauth_token: lookup(ENV_OAUTH_TOKEN).map(|t| t.trim().to_string()),
            channel,
            mention_only,
            cooldown_seconds,
            commands_file: commands_file_from_lookup(lookup),
            log: LogConfig::from_lookup(lookup),
        })
    }

    /// The token is only needed when connecting to Twitch
    pub fn require_token(&self) -> Result<&str, ConfigError> {
        self.oauth_token
            .as_deref()
            .ok_or_else(|| ConfigError::MissingVar(ENV_OAUTH_TOKEN.to_string()))
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_seconds)
    }

    pub fn identity(&self) -> BotIdentity {
        BotIdentity::new(&self.bot_name, &self.channel)
            .with_mention_only(self.mention_only)
            .with_cooldown(self.cooldown())
    }
}

/// `COMMANDS_FILE`, or the default when unset or empty
pub fn commands_file_from_lookup(lookup: impl Fn(&str) -> Option<String>) -> PathBuf {
    lookup(ENV_COMMANDS_FILE)
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_COMMANDS_FILE))
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// One `{command, text}` pair of the command file
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CommandEntry {
    pub command: String,
    pub text: String,
}

/// Command file layout: an ordered list under `messages`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CommandFile {
    #[serde(default)]
    pub messages: Option<Vec<CommandEntry>>,
}

impl CommandFile {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse command file: {}", e)))
    }

    /// Commands in file order
    pub fn into_commands(self) -> Vec<Command> {
        self.messages
            .unwrap_or_default()
            .into_iter()
            .map(|entry| Command::new(entry.command, entry.text))
            .collect()
    }

    pub fn sample() -> Self {
        Self {
            messages: Some(vec![
                CommandEntry {
                    command: "!help".to_string(),
                    text: "Type !list to see every command".to_string(),
                },
                CommandEntry {
                    command: "!discord".to_string(),
                    text: "Join the community: https://discord.gg/example".to_string(),
                },
            ]),
        }
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}
