//! # Command Router
//!
//! Routes incoming messages to the appropriate command handler (in `interface/commands`).
//! It parses the command string (e.g., `/add`), applies the admin gate to the commands that
//! change or refresh the registry, and sends everything else into the sender's conversation.

use anyhow::Result;
use std::borrow::Cow;
use std::sync::Arc;

use crate::application::engine::BalanceEngine;
use crate::domain::config::{AppConfig, CommandsConfig};
use crate::domain::traits::ChatProvider;
use crate::interface::commands;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Add,
    Erase,
    Check,
    Sum,
    List,
    Help,
}

impl Command {
    /// Maps a command name (without prefix) to a command using the configured names.
    pub fn from_name(commands: &CommandsConfig, name: &str) -> Option<Self> {
        [
            (&commands.add, Command::Add),
            (&commands.erase, Command::Erase),
            (&commands.check, Command::Check),
            (&commands.sum, Command::Sum),
            (&commands.list, Command::List),
            (&commands.help, Command::Help),
        ]
        .into_iter()
        .find(|(n, _)| n.as_str() == name)
        .map(|(_, cmd)| cmd)
    }

    /// Commands that modify or refresh the registry require admin rights.
    pub fn is_gated(self) -> bool {
        matches!(self, Command::Add | Command::Erase | Command::Check)
    }
}

/// Splits `/name args` into `(name, args)`. Returns `None` when the prefix is missing.
pub fn parse_command<'a>(prefix: &str, message: &'a str) -> Option<(&'a str, &'a str)> {
    let rest = message.strip_prefix(prefix)?;
    if rest.is_empty() {
        return None;
    }
    Some(match rest.split_once(char::is_whitespace) {
        Some((cmd, args)) => (cmd, args.trim()),
        None => (rest, ""),
    })
}

pub struct CommandRouter {
    commands: CommandsConfig,
    admins: Vec<String>,
    admin_password: Option<String>,
    engine: Arc<BalanceEngine>,
}

impl CommandRouter {
    pub fn new(config: &AppConfig, engine: Arc<BalanceEngine>) -> Self {
        Self {
            commands: config.commands.clone(),
            admins: config.system.admin.clone(),
            admin_password: config.system.admin_password(),
            engine,
        }
    }

    #[cfg(test)]
    pub fn with_admin_password(mut self, password: Option<String>) -> Self {
        self.admin_password = password;
        self
    }

    /// Message text safe for the logs: arguments of gated commands carry the admin password.
    pub fn loggable<'a>(&self, message: &'a str) -> Cow<'a, str> {
        let gated = parse_command(&self.commands.prefix, message.trim()).and_then(|(name, args)| {
            Command::from_name(&self.commands, name)
                .filter(|c| c.is_gated() && !args.is_empty())
                .map(|_| name)
        });
        match gated {
            Some(name) => Cow::Owned(format!("{}{} <redacted>", self.commands.prefix, name)),
            None => Cow::Borrowed(message),
        }
    }

    pub async fn route<C>(&self, chat: &C, message: &str, sender: &str) -> Result<()>
    where
        C: ChatProvider,
    {
        let command = parse_command(&self.commands.prefix, message.trim())
            .and_then(|(name, args)| Command::from_name(&self.commands, name).map(|c| (c, args)));

        // Unknown commands and plain text both continue the sender's conversation, untrimmed
        let Some((command, args)) = command else {
            return commands::users::handle_reply(&self.engine, chat, sender, message).await;
        };

        tracing::info!(
            "Router dispatching cmd={:?} sender='{}' room='{}'",
            command,
            sender,
            chat.room_id()
        );

        if command.is_gated() && !self.authorize(chat, sender, args).await? {
            return Ok(());
        }

        match command {
            Command::Add => commands::users::handle_add(&self.engine, chat, sender).await?,
            Command::Erase => commands::users::handle_erase(&self.engine, chat, sender).await?,
            Command::Check => commands::reports::handle_check(&self.engine, chat).await?,
            Command::Sum => commands::reports::handle_sum(&self.engine, chat).await?,
            Command::List => commands::reports::handle_list(&self.engine, chat).await?,
            Command::Help => commands::help::handle_help(&self.commands, chat).await?,
        }

        Ok(())
    }

    /// Sender allow-list first, then the password argument. Replies on denial.
    async fn authorize(&self, chat: &impl ChatProvider, sender: &str, args: &str) -> Result<bool> {
        let is_admin = self.admins.is_empty()
            || self
                .admins
                .iter()
                .any(|a| a.to_lowercase() == sender.to_lowercase());
        if !is_admin {
            tracing::warn!("Denied gated command from {}", sender);
            chat.send_notification(crate::strings::messages::AUTH_DENIED)
                .await
                .map_err(|e| anyhow::anyhow!(e))?;
            return Ok(false);
        }

        if let Some(password) = &self.admin_password
            && args != password.as_str()
        {
            tracing::warn!("Wrong admin password from {}", sender);
            chat.send_notification(crate::strings::messages::WRONG_PASSWORD)
                .await
                .map_err(|e| anyhow::anyhow!(e))?;
            return Ok(false);
        }

        Ok(true)
    }
}
