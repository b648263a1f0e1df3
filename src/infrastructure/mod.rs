//! Infrastructure layer - External concerns
//! 
//! This layer contains:
//! - Config: Environment settings and the command file
//! - Logging: Subscriber setup
//! - Adapters: Platform transports (Twitch, console)

pub mod config;
pub mod logging;
pub mod adapters;
