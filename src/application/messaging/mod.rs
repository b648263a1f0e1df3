//! Message handling - Event-driven message processing

pub mod dispatcher;
pub mod listener;
pub mod parser;

pub use dispatcher::{unknown_command_notice, DispatchSettings, MessageDispatcher};
pub use listener::{run_message_loop, LoopExit};
pub use parser::MessageParser;
