//! # Jetton Balance Client
//!
//! Implements `BalanceSource` on top of a tonapi-compatible HTTP API
//! (`GET {base}/accounts/{wallet}/jettons`, bearer auth).
//! Only the holding whose jetton address matches the tracked asset is considered.

use crate::domain::config::BalanceApiConfig;
use crate::domain::traits::BalanceSource;
use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;

/// `GET /accounts/{wallet}/jettons` response format
#[derive(Debug, Deserialize)]
pub struct JettonBalances {
    #[serde(default)]
    pub balances: Vec<JettonBalance>,
}

#[derive(Debug, Deserialize)]
pub struct JettonBalance {
    pub balance: Amount,
    pub jetton: JettonInfo,
}

#[derive(Debug, Deserialize)]
pub struct JettonInfo {
    pub address: String,
    pub decimals: Amount,
}

/// The API encodes integers either as JSON numbers or as decimal strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Number(serde_json::Number),
    Text(String),
}

impl Amount {
    fn as_f64(&self) -> Option<f64> {
        match self {
            Amount::Number(n) => n.as_f64(),
            Amount::Text(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        }
    }

    fn as_u32(&self) -> Option<u32> {
        match self {
            Amount::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
            Amount::Text(s) => s.trim().parse::<u32>().ok(),
        }
    }
}

/// Picks the tracked asset out of a jettons response and scales it by its decimals.
/// `Ok(None)` means the wallet does not hold the asset.
pub fn tracked_balance(body: &JettonBalances, asset: &str) -> Result<Option<f64>> {
    let Some(holding) = body.balances.iter().find(|b| b.jetton.address == asset) else {
        return Ok(None);
    };

    let raw = holding
        .balance
        .as_f64()
        .ok_or_else(|| anyhow!("invalid balance {:?}", holding.balance))?;
    let decimals = holding
        .jetton
        .decimals
        .as_u32()
        .ok_or_else(|| anyhow!("invalid decimals {:?}", holding.jetton.decimals))?;
    let decimals = i32::try_from(decimals).context("decimals out of range")?;

    Ok(Some(raw / 10f64.powi(decimals)))
}

/// Builds `{base}/accounts/{wallet}/jettons`, escaping the wallet as a single path segment.
pub fn jettons_url(base_url: &str, wallet: &str) -> Result<Url> {
    let mut url = Url::parse(base_url).with_context(|| format!("Invalid base URL {}", base_url))?;
    url.path_segments_mut()
        .map_err(|_| anyhow!("Base URL {} cannot carry a path", base_url))?
        .pop_if_empty()
        .push("accounts")
        .push(wallet)
        .push("jettons");
    Ok(url)
}

/// HTTP client for the balance API
pub struct JettonBalanceClient {
    http: Client,
    base_url: String,
    api_key: String,
    asset: String,
}

impl JettonBalanceClient {
    pub fn new(config: &BalanceApiConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs()))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            api_key: config.api_key()?,
            asset: config.asset()?,
        })
    }

    async fn try_fetch(&self, wallet: &str) -> Result<Option<f64>> {
        let url = jettons_url(&self.base_url, wallet)?;

        let response = self
            .http
            .get(url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await
            .context("HTTP request failed")?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            bail!("balance API returned {}: {}", status, error_text);
        }

        let body: JettonBalances = response
            .json()
            .await
            .context("Failed to parse jettons response")?;

        tracked_balance(&body, &self.asset)
    }
}

#[async_trait]
impl BalanceSource for JettonBalanceClient {
    async fn fetch(&self, wallet: &str) -> f64 {
        match self.try_fetch(wallet).await {
            Ok(Some(balance)) => {
                tracing::debug!("Balance of {}: {}", wallet, balance);
                balance
            }
            Ok(None) => {
                tracing::warn!("Wallet {} does not hold tracked asset {}", wallet, self.asset);
                0.0
            }
            Err(e) => {
                tracing::warn!("Failed to fetch balance for {}: {:#}", wallet, e);
                0.0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ASSET: &str = "0:b113a994";

    fn parse(json: &str) -> JettonBalances {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_scales_by_decimals() {
        let body = parse(
            r#"{"balances":[
                {"balance":"1000","jetton":{"address":"0:other","decimals":9}},
                {"balance":"12500000000","jetton":{"address":"0:b113a994","decimals":9,"symbol":"X"}}
            ]}"#,
        );
        assert_eq!(tracked_balance(&body, ASSET).unwrap(), Some(12.5));
    }

    #[test]
    fn test_accepts_numbers_and_strings() {
        let body = parse(r#"{"balances":[{"balance":250,"jetton":{"address":"0:b113a994","decimals":"2"}}]}"#);
        assert_eq!(tracked_balance(&body, ASSET).unwrap(), Some(2.5));

        let body = parse(r#"{"balances":[{"balance":"7","jetton":{"address":"0:b113a994","decimals":0}}]}"#);
        assert_eq!(tracked_balance(&body, ASSET).unwrap(), Some(7.0));
    }

    #[test]
    fn test_first_match_wins() {
        let body = parse(
            r#"{"balances":[
                {"balance":"100","jetton":{"address":"0:b113a994","decimals":2}},
                {"balance":"900","jetton":{"address":"0:b113a994","decimals":2}}
            ]}"#,
        );
        assert_eq!(tracked_balance(&body, ASSET).unwrap(), Some(1.0));
    }

    #[test]
    fn test_missing_asset() {
        let body = parse(r#"{"balances":[{"balance":"1","jetton":{"address":"0:other","decimals":9}}]}"#);
        assert_eq!(tracked_balance(&body, ASSET).unwrap(), None);
        assert_eq!(tracked_balance(&parse("{}"), ASSET).unwrap(), None);
    }

    #[test]
    fn test_malformed_amount_is_an_error() {
        let body = parse(r#"{"balances":[{"balance":"lots","jetton":{"address":"0:b113a994","decimals":9}}]}"#);
        assert!(tracked_balance(&body, ASSET).is_err());

        let body = parse(r#"{"balances":[{"balance":"1","jetton":{"address":"0:b113a994","decimals":"nine"}}]}"#);
        assert!(tracked_balance(&body, ASSET).is_err());
    }

    #[test]
    fn test_jettons_url() {
        let url = jettons_url("https://tonapi.io/v2", "EQabc").unwrap();
        assert_eq!(url.as_str(), "https://tonapi.io/v2/accounts/EQabc/jettons");

        let url = jettons_url("https://tonapi.io/v2/", "0:ab/cd").unwrap();
        assert_eq!(url.as_str(), "https://tonapi.io/v2/accounts/0:ab%2Fcd/jettons");

        assert!(jettons_url("not a url", "EQabc").is_err());
    }

    #[tokio::test]
    async fn test_unreachable_api_reports_zero() {
        let config = BalanceApiConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            api_key: Some("key".to_string()),
            api_key_env: None,
            asset: Some(ASSET.to_string()),
            asset_env: None,
            timeout: Some(2),
        };
        let client = JettonBalanceClient::new(&config).unwrap();
        assert_eq!(client.fetch("EQabc").await, 0.0);
    }
}
