//! # Balance Engine
//!
//! Owns the registry store, the per-actor sessions and the delta trackers, and implements
//! every user-facing operation: the two-step add/erase conversation and the three reports.
//! Operations return structured outcomes; wording lives in `strings::messages`.

use crate::application::registry::RegistryStore;
use crate::application::session::SessionStore;
use crate::application::trackers::BalanceTrackers;
use crate::domain::traits::BalanceSource;
use crate::domain::types::ConversationState;
use anyhow::Result;
use std::sync::Arc;

/// Result of feeding a message into an active conversation.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// Nickname captured, waiting for the wallet.
    AwaitingWallet { nickname: String },
    /// Record written (inserted or overwritten).
    Saved {
        nickname: String,
        wallet: String,
        balance: f64,
    },
    /// Erase applied. Reported even when nothing matched.
    Removed { username: String },
}

/// One line of the `check` report.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckLine {
    pub username: String,
    pub wallet: String,
    pub balance: f64,
    pub delta: f64,
}

/// Output of the `sum` report.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub total: f64,
    pub delta: f64,
}

/// One block of the `list` report.
#[derive(Debug, Clone, PartialEq)]
pub struct ListEntry {
    pub username: String,
    pub wallet: String,
    pub balance: f64,
    pub delta: f64,
}

pub struct BalanceEngine {
    registry: RegistryStore,
    sessions: SessionStore,
    trackers: BalanceTrackers,
    source: Arc<dyn BalanceSource>,
}

impl BalanceEngine {
    pub fn new(registry: RegistryStore, source: Arc<dyn BalanceSource>) -> Self {
        Self {
            registry,
            sessions: SessionStore::new(),
            trackers: BalanceTrackers::new(),
            source,
        }
    }

    #[cfg(test)]
    pub fn registry(&self) -> &RegistryStore {
        &self.registry
    }

    pub async fn start_add(&self, actor: &str) {
        tracing::info!("{} started adding a user", actor);
        self.sessions
            .set(actor, ConversationState::AwaitingNickname)
            .await;
    }

    pub async fn start_erase(&self, actor: &str) {
        tracing::info!("{} started erasing a user", actor);
        self.sessions
            .set(actor, ConversationState::AwaitingEraseNickname)
            .await;
    }

    /// Feeds free text into the actor's conversation. `Ok(None)` means the actor is idle
    /// and the message is not for us.
    ///
    /// The text is taken verbatim as nickname or wallet. Once a terminal step starts, the
    /// actor is idle again even if saving fails.
    pub async fn continue_flow(&self, actor: &str, text: &str) -> Result<Option<StepOutcome>> {
        let Some(state) = self.sessions.take(actor).await else {
            return Ok(None);
        };

        match state {
            ConversationState::AwaitingNickname => {
                self.sessions
                    .set(
                        actor,
                        ConversationState::AwaitingWallet {
                            nickname: text.to_string(),
                        },
                    )
                    .await;
                Ok(Some(StepOutcome::AwaitingWallet {
                    nickname: text.to_string(),
                }))
            }
            ConversationState::AwaitingWallet { nickname } => {
                let balance = self.source.fetch(text).await;

                let mut txn = self.registry.begin().await;
                let replaced = txn.upsert(&nickname, text, balance);
                txn.commit().await?;

                tracing::info!(
                    "{} {} user {} (wallet {}, balance {})",
                    actor,
                    if replaced { "updated" } else { "added" },
                    nickname,
                    text,
                    balance
                );
                Ok(Some(StepOutcome::Saved {
                    nickname,
                    wallet: text.to_string(),
                    balance,
                }))
            }
            ConversationState::AwaitingEraseNickname => {
                let mut txn = self.registry.begin().await;
                let removed = txn.remove(text);
                txn.commit().await?;

                tracing::info!("{} erased {} record(s) named {}", actor, removed, text);
                Ok(Some(StepOutcome::Removed {
                    username: text.to_string(),
                }))
            }
        }
    }

    /// Fetches every wallet, reports the change against the stored balance and stores the
    /// new balance. An empty registry yields no lines and is not written.
    pub async fn check_all(&self) -> Result<Vec<CheckLine>> {
        let mut txn = self.registry.begin().await;
        if txn.is_empty() {
            return Ok(Vec::new());
        }

        let mut lines = Vec::with_capacity(txn.len());
        for user in txn.users.iter_mut() {
            let balance = self.source.fetch(&user.wallet).await;
            let delta = balance - user.balance;
            user.balance = balance;
            lines.push(CheckLine {
                username: user.username.clone(),
                wallet: user.wallet.clone(),
                balance,
                delta,
            });
        }

        txn.commit().await?;
        tracing::info!("Checked {} wallets", lines.len());
        Ok(lines)
    }

    /// Count and total of the stored balances, with the change since the previous summary.
    pub async fn summarize(&self) -> Summary {
        let registry = self.registry.load().await;
        let total = registry.total_balance();
        let delta = self.trackers.record_total(total).await;
        Summary {
            count: registry.len(),
            total,
            delta,
        }
    }

    /// Fresh balance for every user, with the change since the previous listing.
    /// The registry is left untouched.
    pub async fn list_all(&self) -> Vec<ListEntry> {
        let registry = self.registry.load().await;

        let mut entries = Vec::with_capacity(registry.len());
        for user in registry.users {
            let balance = self.source.fetch(&user.wallet).await;
            let delta = self.trackers.record_user(&user.username, balance).await;
            entries.push(ListEntry {
                username: user.username,
                wallet: user.wallet,
                balance,
                delta,
            });
        }
        entries
    }
}
