//! Domain layer - Core business logic with no external dependencies
//! 
//! This layer contains:
//! - Entities: Core business objects (Command table, incoming message, identity)
//! - Traits: Abstractions for infrastructure (Transport)

pub mod entities;
pub mod traits;
