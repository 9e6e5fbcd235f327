//! # Messages
//!
//! Contains constant strings and format functions for user-facing messages.
//! Includes conversation prompts, report layouts and error notices.

use crate::application::engine::{CheckLine, ListEntry, Summary};

pub const AUTH_DENIED: &str = "🚫 **Authorization Denied**.";
pub const WRONG_PASSWORD: &str = "❌ Wrong password.";

pub const ASK_NICKNAME: &str = "Enter the user's nickname:";
pub const ASK_WALLET: &str = "Now enter the TON wallet address:";
pub const ASK_ERASE_NICKNAME: &str = "Enter the nickname of the user to remove:";

pub const NO_USERS_TO_CHECK: &str = "No users to display.";
pub const NO_USERS_TO_LIST: &str = "No users in the registry.";

/// Balances always show a fractional part (`10.0`, `12.5`). Magnitudes below `1e-4` or
/// from `1e16` up switch to exponent form with a signed, two-digit exponent (`1e+16`, `1e-05`).
pub fn amount(value: f64) -> String {
    let magnitude = value.abs();
    if !value.is_finite() || value == 0.0 || (1e-4..1e16).contains(&magnitude) {
        return format!("{value:?}");
    }

    let sci = format!("{value:e}");
    match sci.split_once('e') {
        Some((mantissa, exp)) => match exp.parse::<i32>() {
            Ok(exp) => format!(
                "{mantissa}e{}{:02}",
                if exp < 0 { '-' } else { '+' },
                exp.abs()
            ),
            Err(_) => sci,
        },
        None => sci,
    }
}

/// Signed, two decimals (`+2.50`, `-1.25`).
pub fn delta(value: f64) -> String {
    format!("{value:+.2}")
}

pub fn user_saved(nickname: &str, wallet: &str, balance: f64) -> String {
    format!(
        "✅ Saved:\n🔹 Nickname: {nickname}\n💳 Wallet: {wallet}\n💰 Balance: {}",
        amount(balance)
    )
}

pub fn user_removed(username: &str) -> String {
    format!("❌ User {username} removed from the registry")
}

pub fn check_report(lines: &[CheckLine]) -> String {
    let mut out = String::from("User list:\n");
    for line in lines {
        out.push_str(&format!(
            "\n🔹 {}\n💳 {}\n💰 {} ({})\n",
            line.username,
            line.wallet,
            amount(line.balance),
            delta(line.delta)
        ));
    }
    out
}

pub fn summary(summary: &Summary) -> String {
    format!(
        "👥 Users: {}\n💰 Total balance: {}\n📉 Change: {}",
        summary.count,
        amount(summary.total),
        delta(summary.delta)
    )
}

pub fn list_report(entries: &[ListEntry]) -> String {
    let mut out = String::from("📋 User list:\n\n");
    for entry in entries {
        out.push_str(&format!(
            "🔹 {}\n💳 Wallet: {}\n💰 Balance now: {}\n📉 Change: {}\n\n",
            entry.username,
            entry.wallet,
            amount(entry.balance),
            delta(entry.delta)
        ));
    }
    out
}

pub fn operation_failed(err: &str) -> String {
    format!("⚠️ Operation failed: {err}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_format() {
        assert_eq!(amount(12.5), "12.5");
        assert_eq!(amount(10.0), "10.0");
        assert_eq!(amount(0.0), "0.0");
        assert_eq!(amount(0.0001), "0.0001");
        assert_eq!(amount(1_000_000_000_000_000.0), "1000000000000000.0");
    }

    #[test]
    fn test_amount_exponent_form() {
        assert_eq!(amount(1e16), "1e+16");
        assert_eq!(amount(1.5e16), "1.5e+16");
        assert_eq!(amount(1e-5), "1e-05");
        assert_eq!(amount(2.5e-7), "2.5e-07");
        assert_eq!(amount(-3e20), "-3e+20");
        assert_eq!(amount(1e100), "1e+100");
    }

    #[test]
    fn test_delta_format() {
        assert_eq!(delta(2.5), "+2.50");
        assert_eq!(delta(-1.254), "-1.25");
        assert_eq!(delta(0.0), "+0.00");
    }

    #[test]
    fn test_check_report_scenario() {
        let report = check_report(&[CheckLine {
            username: "alice".to_string(),
            wallet: "W1".to_string(),
            balance: 12.5,
            delta: 2.5,
        }]);
        assert!(report.contains("alice"));
        assert!(report.contains("W1"));
        assert!(report.contains("💰 12.5 (+2.50)"));
    }

    #[test]
    fn test_summary_and_list() {
        let text = summary(&Summary {
            count: 2,
            total: 12.5,
            delta: -0.5,
        });
        assert!(text.contains("Users: 2"));
        assert!(text.contains("12.5"));
        assert!(text.contains("-0.50"));

        let text = list_report(&[ListEntry {
            username: "bob".to_string(),
            wallet: "W2".to_string(),
            balance: 3.0,
            delta: 0.0,
        }]);
        assert!(text.contains("Balance now: 3.0"));
        assert!(text.contains("Change: +0.00"));
    }
}
