//! Platform transports

pub mod console;
pub mod twitch;

pub use console::ConsoleTransport;
pub use twitch::{TwitchConfig, TwitchTransport};
