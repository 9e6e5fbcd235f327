//! # Application Layer
//!
//! Contains the core business logic and orchestration of the bot.
//! This includes the balance engine, command routing, the registry store and the in-memory trackers.

pub mod engine;
pub mod registry;
pub mod router;
pub mod session;
pub mod trackers;

#[cfg(test)]
pub mod testing;
