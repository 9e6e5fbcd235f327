//! # Domain Types
//!
//! The registry document, its user records, and the per-actor conversation state.

use serde::{Deserialize, Serialize};

/// A registered user and the last balance observed for their wallet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserRecord {
    pub username: String,
    pub wallet: String,
    #[serde(default)]
    pub balance: f64,
}

/// The durable set of registered users.
/// Saved to `data/users.json` as `{"users": [...]}`.
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
pub struct Registry {
    #[serde(default)]
    pub users: Vec<UserRecord>,
}

impl Registry {
    /// Overwrites wallet and balance of the record named `username`, or appends a new one.
    /// Returns `true` when an existing record was replaced.
    pub fn upsert(&mut self, username: &str, wallet: &str, balance: f64) -> bool {
        if let Some(user) = self.users.iter_mut().find(|u| u.username == username) {
            user.wallet = wallet.to_string();
            user.balance = balance;
            return true;
        }

        self.users.push(UserRecord {
            username: username.to_string(),
            wallet: wallet.to_string(),
            balance,
        });
        false
    }

    /// Drops every record named `username`. Returns how many were removed.
    pub fn remove(&mut self, username: &str) -> usize {
        let before = self.users.len();
        self.users.retain(|u| u.username != username);
        before - self.users.len()
    }

    #[cfg(test)]
    pub fn get(&self, username: &str) -> Option<&UserRecord> {
        self.users.iter().find(|u| u.username == username)
    }

    /// Sum of the stored balances.
    pub fn total_balance(&self) -> f64 {
        self.users.iter().map(|u| u.balance).sum()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

/// Where an actor is in the add/erase conversation.
/// No entry in the session store means the actor is idle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversationState {
    AwaitingNickname,
    AwaitingWallet { nickname: String },
    AwaitingEraseNickname,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> Registry {
        Registry {
            users: vec![
                UserRecord {
                    username: "alice".to_string(),
                    wallet: "W1".to_string(),
                    balance: 10.0,
                },
                UserRecord {
                    username: "bob".to_string(),
                    wallet: "W2".to_string(),
                    balance: 2.5,
                },
            ],
        }
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let mut reg = registry();
        assert!(reg.upsert("alice", "W9", 1.0));
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.users[0].wallet, "W9");
        assert_eq!(reg.users[0].balance, 1.0);
    }

    #[test]
    fn test_upsert_appends_new_user() {
        let mut reg = registry();
        assert!(!reg.upsert("carol", "W1", 0.0));
        assert_eq!(reg.len(), 3);
        assert_eq!(reg.users[2].username, "carol");
    }

    #[test]
    fn test_remove_missing_user_is_noop() {
        let mut reg = registry();
        assert_eq!(reg.remove("nobody"), 0);
        assert_eq!(reg, registry());
        assert_eq!(reg.remove("bob"), 1);
        assert!(reg.get("bob").is_none());
    }

    #[test]
    fn test_total_balance() {
        assert_eq!(registry().total_balance(), 12.5);
        assert_eq!(Registry::default().total_balance(), 0.0);
    }

    #[test]
    fn test_missing_balance_defaults_to_zero() {
        let reg: Registry =
            serde_json::from_str(r#"{"users":[{"username":"a","wallet":"w"}]}"#).unwrap();
        assert_eq!(reg.users[0].balance, 0.0);

        let empty: Registry = serde_json::from_str("{}").unwrap();
        assert!(empty.is_empty());
    }
}
