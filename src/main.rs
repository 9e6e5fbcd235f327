#![recursion_limit = "256"]
//! # Main Entry Point
//!
//! Initializes the application:
//! - Domain: Configuration and Types
//! - Infrastructure: Matrix, Balance API
//! - Application: Router, Engine, Registry
//! - Interface: Command Handlers
//!

mod application;
mod domain;
mod infrastructure;
mod interface;
mod strings;

use anyhow::{Context, Result};
use clap::Parser;
use matrix_sdk::{
    Client,
    config::SyncSettings,
    room::Room,
    ruma::events::room::{
        member::{MembershipState, StrippedRoomMemberEvent},
        message::SyncRoomMessageEvent,
    },
};
use std::fs;
use std::sync::Arc;

use crate::application::engine::BalanceEngine;
use crate::application::registry::RegistryStore;
use crate::application::router::CommandRouter;
use crate::domain::config::AppConfig;
use crate::infrastructure::balance::JettonBalanceClient;
use crate::infrastructure::matrix::MatrixService;

#[derive(Parser, Debug)]
#[command(name = "balance-watch", about = "Matrix bot tracking jetton balances of registered wallets")]
struct Args {
    /// Path to the YAML configuration
    #[arg(long, default_value = "data/config.yaml")]
    config: String,

    /// Directory for `session.log`
    #[arg(long, default_value = "data")]
    log_dir: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // 1. Load Configuration
    let config = AppConfig::load(&args.config)?;

    // 2. Logging Setup
    fs::create_dir_all(&args.log_dir)
        .with_context(|| format!("Failed to create {}", args.log_dir))?;

    // Clear previous session log
    let log_path = std::path::Path::new(&args.log_dir).join("session.log");
    if log_path.exists() {
        let _ = fs::remove_file(&log_path);
    }

    let file_appender = tracing_appender::rolling::never(&args.log_dir, "session.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(
            "info,matrix_sdk=warn,matrix_sdk_base=warn,matrix_sdk_crypto=error,ruma=warn,hyper=warn",
        )
    });

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false);
    let console_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stdout);

    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .init();

    tracing::info!("Starting Balance Watch...");

    // 3. Initialize Infrastructure & Application
    let source = Arc::new(
        JettonBalanceClient::new(&config.services.balance_api)
            .context("Failed to configure balance API")?,
    );
    let registry = RegistryStore::new(&config.system.registry_path);
    tracing::info!("Using registry at {}", registry.path().display());

    let engine = Arc::new(BalanceEngine::new(registry, source));
    let router = Arc::new(CommandRouter::new(&config, engine));

    if config.system.admin.is_empty() && config.system.admin_password().is_none() {
        tracing::warn!("No admin list or admin password configured: every sender may add, erase and check users");
    }

    // 4. Matrix Setup
    let password = config.services.matrix.password()?;
    let client = Client::builder()
        .homeserver_url(&config.services.matrix.homeserver)
        .build()
        .await?;

    client
        .matrix_auth()
        .login_username(&config.services.matrix.username, &password)
        .send()
        .await
        .context("Matrix login failed")?;

    tracing::info!("Logged in as {}", config.services.matrix.username);

    if let Some(name) = &config.services.matrix.display_name {
        tracing::info!("Setting display name to: {}", name);
        if let Err(e) = client.account().set_display_name(Some(name.as_str())).await {
            tracing::warn!("Failed to set display name: {}", e);
        }
    }

    // 5. Event Handlers
    let start_time = std::time::SystemTime::now();

    client.add_event_handler(move |ev: SyncRoomMessageEvent, room: Room| {
        let router = router.clone();

        async move {
            let Some(original_msg) = ev.as_original() else {
                return;
            };

            // Ignore events older than start_time
            let ts = ev.origin_server_ts();
            let event_time =
                std::time::UNIX_EPOCH + std::time::Duration::from_millis(ts.get().into());
            if event_time < start_time {
                return;
            }

            if let matrix_sdk::ruma::events::room::message::MessageType::Text(text_content) =
                &original_msg.content.msgtype
            {
                if original_msg.sender == room.own_user_id() {
                    return;
                }
                tracing::info!(
                    "Received message from {}: {}",
                    original_msg.sender,
                    router.loggable(&text_content.body)
                );

                let chat = MatrixService::new(room);
                if let Err(e) = router
                    .route(&chat, &text_content.body, original_msg.sender.as_str())
                    .await
                {
                    tracing::error!("Failed to route message: {}", e);
                }
            }
        }
    });

    // Handle Invites
    client.add_event_handler(|ev: StrippedRoomMemberEvent, room: Room| async move {
        if ev.content.membership == MembershipState::Invite {
            tracing::info!("Received invite for room {}", room.room_id());
            if let Err(e) = room.join().await {
                tracing::error!("Failed to join room after invite: {}", e);
            }
        }
    });

    // 6. Sync until shutdown
    tokio::select! {
        res = client.sync(SyncSettings::default()) => {
            res.context("Matrix sync loop failed")?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutting down...");
        }
    }

    Ok(())
}
