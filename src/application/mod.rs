//! Application layer - Use cases and business logic
//! 
//! This layer contains:
//! - Services: Command table loading, global cooldown
//! - Errors: Domain-specific errors
//! - Messaging: Addressing rules and the dispatch engine

pub mod errors;
pub mod services;
pub mod messaging;
