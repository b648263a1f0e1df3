use std::path::Path;
use crate::application::errors::ConfigError;
use crate::domain::entities::{Command, CommandTable, LIST_TRIGGER};
use crate::infrastructure::config::CommandFile;

/// Service for building the command table at startup
pub struct CommandService;

impl CommandService {
    /// Read the command file and freeze it into a table with the listing entry
    pub fn load(path: impl AsRef<Path>) -> Result<CommandTable, ConfigError> {
        let path = path.as_ref();
        let commands = CommandFile::load(path)?.into_commands();
        tracing::info!(path = %path.display(), count = commands.len(), "Commands loaded");
        Ok(Self::build(commands))
    }

    pub fn build(commands: Vec<Command>) -> CommandTable {
        for command in &commands {
            tracing::debug!(command = %command.trigger, "Loaded command");
        }

        let table = CommandTable::build(commands);
        tracing::debug!(command = LIST_TRIGGER, reply = table.get(LIST_TRIGGER).unwrap_or_default(), "Listing command registered");
        table
    }
}
