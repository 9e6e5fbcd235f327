//! # Session Store
//!
//! Per-actor conversation state for the add/erase flows.
//! Lives for the process lifetime only; a restart drops every in-flight conversation.

use crate::domain::types::ConversationState;
use std::collections::HashMap;
use tokio::sync::Mutex;

#[derive(Default)]
pub struct SessionStore {
    states: Mutex<HashMap<String, ConversationState>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Puts `actor` into `state`, replacing whatever flow it was in.
    pub async fn set(&self, actor: &str, state: ConversationState) {
        self.states.lock().await.insert(actor.to_string(), state);
    }

    #[cfg(test)]
    pub async fn get(&self, actor: &str) -> Option<ConversationState> {
        self.states.lock().await.get(actor).cloned()
    }

    /// Removes and returns the actor's state, leaving it idle.
    pub async fn take(&self, actor: &str) -> Option<ConversationState> {
        self.states.lock().await.remove(actor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_actors_are_independent() {
        let sessions = SessionStore::new();
        sessions.set("@a:x", ConversationState::AwaitingNickname).await;
        sessions.set("@b:x", ConversationState::AwaitingEraseNickname).await;

        assert_eq!(
            sessions.take("@a:x").await,
            Some(ConversationState::AwaitingNickname)
        );
        assert_eq!(sessions.get("@a:x").await, None);
        assert_eq!(
            sessions.get("@b:x").await,
            Some(ConversationState::AwaitingEraseNickname)
        );
    }

    #[tokio::test]
    async fn test_set_replaces_previous_flow() {
        let sessions = SessionStore::new();
        sessions
            .set(
                "@a:x",
                ConversationState::AwaitingWallet {
                    nickname: "alice".to_string(),
                },
            )
            .await;
        sessions.set("@a:x", ConversationState::AwaitingEraseNickname).await;
        assert_eq!(
            sessions.get("@a:x").await,
            Some(ConversationState::AwaitingEraseNickname)
        );
    }
}
