//! # User Registration Commands
//!
//! Handles `add` and `erase`, and every free-text reply that continues one of their
//! two-step conversations. Conversation state is kept per actor by the engine.

use crate::application::engine::{BalanceEngine, StepOutcome};
use crate::domain::traits::ChatProvider;
use crate::strings::messages;
use anyhow::Result;

pub async fn handle_add(engine: &BalanceEngine, chat: &impl ChatProvider, actor: &str) -> Result<()> {
    engine.start_add(actor).await;
    chat.send_notification(messages::ASK_NICKNAME)
        .await
        .map_err(|e| anyhow::anyhow!(e))
}

pub async fn handle_erase(
    engine: &BalanceEngine,
    chat: &impl ChatProvider,
    actor: &str,
) -> Result<()> {
    engine.start_erase(actor).await;
    chat.send_notification(messages::ASK_ERASE_NICKNAME)
        .await
        .map_err(|e| anyhow::anyhow!(e))
}

/// Continues the actor's conversation. Idle actors get no reply.
pub async fn handle_reply(
    engine: &BalanceEngine,
    chat: &impl ChatProvider,
    actor: &str,
    text: &str,
) -> Result<()> {
    let reply = match engine.continue_flow(actor, text).await {
        Ok(None) => return Ok(()),
        Ok(Some(StepOutcome::AwaitingWallet { .. })) => messages::ASK_WALLET.to_string(),
        Ok(Some(StepOutcome::Saved {
            nickname,
            wallet,
            balance,
        })) => messages::user_saved(&nickname, &wallet, balance),
        Ok(Some(StepOutcome::Removed { username })) => messages::user_removed(&username),
        Err(e) => {
            tracing::error!("Failed to update registry for {}: {:#}", actor, e);
            messages::operation_failed(&e.to_string())
        }
    };

    chat.send_message(&reply)
        .await
        .map(|_| ())
        .map_err(|e| anyhow::anyhow!(e))
}
