//! # Configuration
//!
//! Manages the loading and parsing of the application's configuration file (`config.yaml`).
//! Defines the structs for the Matrix login, the balance API, command names and system settings.
//! Secrets can be given inline or through the name of an environment variable.

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use std::fs;

/// Main application configuration structure.
/// Matches the layout of `data/config.yaml`.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub services: ServicesConfig,
    #[serde(default)]
    pub commands: CommandsConfig,
    #[serde(default)]
    pub system: SystemConfig,
}

impl AppConfig {
    /// Reads and parses the YAML file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))?;
        Self::from_yaml(&content).with_context(|| format!("Failed to parse {}", path))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }
}

/// Configuration for the connected services.
#[derive(Debug, Deserialize, Clone)]
pub struct ServicesConfig {
    pub matrix: MatrixConfig,
    pub balance_api: BalanceApiConfig,
}

/// Specific configuration for the Matrix service.
#[derive(Debug, Deserialize, Clone)]
pub struct MatrixConfig {
    pub homeserver: String,
    pub username: String,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default = "default_matrix_password_env")]
    pub password_env: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl MatrixConfig {
    pub fn password(&self) -> Result<String> {
        require(
            "matrix password",
            resolve_secret(self.password.as_deref(), self.password_env.as_deref(), env_lookup),
        )
    }
}

/// Third-party balance API (tonapi-compatible).
#[derive(Debug, Deserialize, Clone)]
pub struct BalanceApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: Option<String>, // e.g. "TON_API_KEY"
    /// Address of the tracked jetton.
    #[serde(default)]
    pub asset: Option<String>,
    #[serde(default = "default_asset_env")]
    pub asset_env: Option<String>,
    /// Request timeout in seconds
    #[serde(default)]
    pub timeout: Option<u64>,
}

impl BalanceApiConfig {
    pub fn api_key(&self) -> Result<String> {
        require(
            "balance API key",
            resolve_secret(self.api_key.as_deref(), self.api_key_env.as_deref(), env_lookup),
        )
    }

    pub fn asset(&self) -> Result<String> {
        require(
            "tracked asset address",
            resolve_secret(self.asset.as_deref(), self.asset_env.as_deref(), env_lookup),
        )
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout.unwrap_or_else(default_timeout)
    }
}

/// Command names recognised by the router. Each one is matched after `prefix`.
#[derive(Debug, Deserialize, Clone)]
pub struct CommandsConfig {
    #[serde(default = "default_prefix")]
    pub prefix: String,
    #[serde(default = "default_add")]
    pub add: String,
    #[serde(default = "default_erase")]
    pub erase: String,
    #[serde(default = "default_check")]
    pub check: String,
    #[serde(default = "default_sum")]
    pub sum: String,
    #[serde(default = "default_list")]
    pub list: String,
    #[serde(default = "default_help")]
    pub help: String,
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            add: default_add(),
            erase: default_erase(),
            check: default_check(),
            sum: default_sum(),
            list: default_list(),
            help: default_help(),
        }
    }
}

/// System-level settings for the bot.
#[derive(Debug, Deserialize, Clone)]
pub struct SystemConfig {
    #[serde(default = "default_registry_path")]
    pub registry_path: String,
    /// Senders allowed to run gated commands. Empty means anyone.
    #[serde(default)]
    pub admin: Vec<String>,
    #[serde(default)]
    pub admin_password: Option<String>,
    #[serde(default = "default_admin_password_env")]
    pub admin_password_env: Option<String>,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            registry_path: default_registry_path(),
            admin: Vec::new(),
            admin_password: None,
            admin_password_env: default_admin_password_env(),
        }
    }
}

impl SystemConfig {
    /// The gate password, if one is configured. Optional by design of the gate.
    pub fn admin_password(&self) -> Option<String> {
        resolve_secret(
            self.admin_password.as_deref(),
            self.admin_password_env.as_deref(),
            env_lookup,
        )
    }
}

/// Inline value wins, otherwise the named environment variable. Empty values count as unset.
pub fn resolve_secret(
    literal: Option<&str>,
    env_var: Option<&str>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Option<String> {
    if let Some(value) = literal.filter(|v| !v.is_empty()) {
        return Some(value.to_string());
    }
    env_var.and_then(lookup).filter(|v| !v.is_empty())
}

fn require(what: &str, value: Option<String>) -> Result<String> {
    value.ok_or_else(|| anyhow!("No {} provided - set it inline or via its *_env variable", what))
}

fn env_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn default_base_url() -> String {
    "https://tonapi.io/v2".to_string()
}
fn default_timeout() -> u64 {
    30
}
fn default_api_key_env() -> Option<String> {
    Some("TON_API_KEY".to_string())
}
fn default_asset_env() -> Option<String> {
    Some("CHECK_TOKEN".to_string())
}
fn default_matrix_password_env() -> Option<String> {
    Some("MATRIX_PASSWORD".to_string())
}
fn default_admin_password_env() -> Option<String> {
    Some("ADMIN_PASSWORD".to_string())
}
fn default_registry_path() -> String {
    "data/users.json".to_string()
}
fn default_prefix() -> String {
    "/".to_string()
}
fn default_add() -> String {
    "add".to_string()
}
fn default_erase() -> String {
    "erase".to_string()
}
fn default_check() -> String {
    "check".to_string()
}
fn default_sum() -> String {
    "sum".to_string()
}
fn default_list() -> String {
    "list".to_string()
}
fn default_help() -> String {
    "help".to_string()
}
