//! pasta-bot - canned-reply auto-responder for Twitch chat

pub mod domain;
pub mod application;
pub mod infrastructure;
