//! # Report Commands
//!
//! Handles `check`, `sum` and `list`.
//! `check` and `list` query every wallet, so a typing notice is shown while they run.

use crate::application::engine::BalanceEngine;
use crate::domain::traits::ChatProvider;
use crate::strings::messages;
use anyhow::Result;

pub async fn handle_check(engine: &BalanceEngine, chat: &impl ChatProvider) -> Result<()> {
    let _ = chat.typing(true).await;
    let result = engine.check_all().await;
    let _ = chat.typing(false).await;

    let reply = match result {
        Ok(lines) if lines.is_empty() => messages::NO_USERS_TO_CHECK.to_string(),
        Ok(lines) => messages::check_report(&lines),
        Err(e) => {
            tracing::error!("Balance check failed: {:#}", e);
            messages::operation_failed(&e.to_string())
        }
    };

    chat.send_message(&reply)
        .await
        .map(|_| ())
        .map_err(|e| anyhow::anyhow!(e))
}

pub async fn handle_sum(engine: &BalanceEngine, chat: &impl ChatProvider) -> Result<()> {
    let summary = engine.summarize().await;
    chat.send_message(&messages::summary(&summary))
        .await
        .map(|_| ())
        .map_err(|e| anyhow::anyhow!(e))
}

pub async fn handle_list(engine: &BalanceEngine, chat: &impl ChatProvider) -> Result<()> {
    let _ = chat.typing(true).await;
    let entries = engine.list_all().await;
    let _ = chat.typing(false).await;

    let reply = if entries.is_empty() {
        messages::NO_USERS_TO_LIST.to_string()
    } else {
        messages::list_report(&entries)
    };

    chat.send_message(&reply)
        .await
        .map(|_| ())
        .map_err(|e| anyhow::anyhow!(e))
}
