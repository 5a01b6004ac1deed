//! Display formatting shared by view models.

use client_blockchain_core::contracts::LORDS_DECIMALS;

/// Compact number: `950`, `1.25k`, `3.40m`.
pub fn format_compact(value: f64) -> String {
    let magnitude = value.abs();
    if magnitude >= 1_000_000.0 {
        format!("{:.2}m", value / 1_000_000.0)
    } else if magnitude >= 1_000.0 {
        format!("{:.2}k", value / 1_000.0)
    } else if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

/// LORDS balance in whole tokens, compact.
pub fn format_lords(balance: u128) -> String {
    format_compact(balance as f64 / LORDS_DECIMALS as f64)
}

/// Shortened account address: `0x1234...abcd`.
pub fn display_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 10 {
        return address.to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}
