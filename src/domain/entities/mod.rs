//! Domain entities - Core business objects with no external dependencies

pub mod command;
pub mod identity;
pub mod message;

pub use command::{Command, CommandTable, COMMAND_MARKER, LIST_HEADER, LIST_TRIGGER};
pub use identity::BotIdentity;
pub use message::{Action, IncomingMessage};
