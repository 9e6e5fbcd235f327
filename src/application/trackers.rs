//! # Balance Trackers
//!
//! In-memory baselines for the delta shown by the summary and listing reports.
//! Independent of the balances stored in the registry and never persisted.

use std::collections::HashMap;
use tokio::sync::Mutex;

#[derive(Default)]
pub struct BalanceTrackers {
    last_total_balance: Mutex<f64>,
    last_user_balances: Mutex<HashMap<String, f64>>,
}

impl BalanceTrackers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `total` as the new summary baseline and returns the change since the previous one.
    /// The first baseline is zero.
    pub async fn record_total(&self, total: f64) -> f64 {
        let mut last = self.last_total_balance.lock().await;
        let delta = total - *last;
        *last = total;
        delta
    }

    /// Records `balance` for `username` and returns the change since the last listing.
    /// A username seen for the first time reports no change.
    pub async fn record_user(&self, username: &str, balance: f64) -> f64 {
        let mut last = self.last_user_balances.lock().await;
        let previous = last.insert(username.to_string(), balance).unwrap_or(balance);
        balance - previous
    }
}
