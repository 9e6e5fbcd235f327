//! In-memory fakes for the domain traits, shared by the unit tests.

use crate::domain::traits::{BalanceSource, ChatProvider};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// Balance source backed by a map. Unknown wallets report zero, like a failed lookup.
#[derive(Default)]
pub struct FakeBalances {
    balances: Mutex<HashMap<String, f64>>,
}

impl FakeBalances {
    pub fn new(entries: &[(&str, f64)]) -> Self {
        let balances = entries
            .iter()
            .map(|(wallet, balance)| (wallet.to_string(), *balance))
            .collect();
        Self {
            balances: Mutex::new(balances),
        }
    }

    pub fn set(&self, wallet: &str, balance: f64) {
        self.balances
            .lock()
            .unwrap()
            .insert(wallet.to_string(), balance);
    }
}

#[async_trait]
impl BalanceSource for FakeBalances {
    async fn fetch(&self, wallet: &str) -> f64 {
        self.balances
            .lock()
            .unwrap()
            .get(wallet)
            .copied()
            .unwrap_or(0.0)
    }
}

/// Chat provider that records everything the bot sends.
#[derive(Default, Clone)]
pub struct RecordingChat {
    sent: std::sync::Arc<Mutex<Vec<String>>>,
}

impl RecordingChat {
    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<String> {
        self.sent.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl ChatProvider for RecordingChat {
    async fn send_message(&self, content: &str) -> Result<String, String> {
        let mut sent = self.sent.lock().unwrap();
        sent.push(content.to_string());
        Ok(format!("$event{}", sent.len()))
    }

    async fn send_notification(&self, content: &str) -> Result<(), String> {
        self.sent.lock().unwrap().push(content.to_string());
        Ok(())
    }

    async fn typing(&self, _active: bool) -> Result<(), String> {
        Ok(())
    }

    fn room_id(&self) -> String {
        "!room:test".to_string()
    }
}
