//! # Help Command
//!
//! Displays the command overview using the configured command names.

use crate::domain::config::CommandsConfig;
use crate::domain::traits::ChatProvider;
use anyhow::Result;

pub async fn handle_help(commands: &CommandsConfig, chat: &impl ChatProvider) -> Result<()> {
    chat.send_message(&crate::strings::help::main(commands))
        .await
        .map(|_| ())
        .map_err(|e| anyhow::anyhow!(e))
}
