//! # Domain Traits
//!
//! Abstract interfaces for core system components (Chat, Balance lookup).
//! Allows for pluggable implementations in the Infrastructure layer.

use async_trait::async_trait;

/// Abstract interface for a Chat Provider (e.g., Matrix, Console)
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Send a message to the room
    async fn send_message(&self, content: &str) -> Result<String, String>;

    /// Send a notification (not tracked)
    async fn send_notification(&self, content: &str) -> Result<(), String>;

    /// Send a typing indicator
    async fn typing(&self, active: bool) -> Result<(), String>;

    /// Get the current room ID
    fn room_id(&self) -> String;
}

/// Abstract interface for the wallet balance lookup.
///
/// Implementations never fail towards the caller: any transport or parse
/// problem is logged and reported as a zero balance.
#[async_trait]
pub trait BalanceSource: Send + Sync {
    /// Current amount of the tracked asset held by `wallet`, already scaled by its decimals.
    async fn fetch(&self, wallet: &str) -> f64;
}
