//! Frontend configuration structures and loaders.
//!
//! This module contains client-side settings shared by every frontend
//! (terminal watcher, devnet driver, future GUIs).

use std::env;
use std::time::Duration;

use client_blockchain_core::FinalityOptions;

/// Frontend-specific configuration.
#[derive(Clone, Debug, Default)]
pub struct FrontendConfig {
    pub sync: SyncConfig,
    pub transactions: TransactionConfig,
    pub messages: MessageConfig,
    pub header: HeaderConfig,
}

impl FrontendConfig {
    pub const fn new(
        sync: SyncConfig,
        transactions: TransactionConfig,
        messages: MessageConfig,
        header: HeaderConfig,
    ) -> Self {
        Self {
            sync,
            transactions,
            messages,
            header,
        }
    }

    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `POLL_INTERVAL_MS` - Read-model refetch interval (default: 5000)
    /// - `TX_POLL_INTERVAL_MS` - Transaction status poll interval (default: 2000)
    /// - `TX_TIMEOUT_SECS` - Give up waiting for finality after (default: 120)
    /// - `MESSAGE_CAPACITY` - Notification log capacity (default: 64)
    /// - `IDLE_PENALTY_SECS` - Idle time before the penalty applies (default: 120)
    /// - `START_MUTED` - Start with sound muted (default: false)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(ms) = read_env::<u64>("POLL_INTERVAL_MS") {
            config.sync.poll_interval = Duration::from_millis(ms.max(1));
        }

        if let Some(ms) = read_env::<u64>("TX_POLL_INTERVAL_MS") {
            config.transactions.poll_interval = Duration::from_millis(ms.max(1));
        }
        if let Some(secs) = read_env::<u64>("TX_TIMEOUT_SECS") {
            config.transactions.timeout = Duration::from_secs(secs.max(1));
        }

        if let Some(capacity) = read_env::<usize>("MESSAGE_CAPACITY") {
            config.messages.capacity = capacity.max(1);
        }

        if let Some(secs) = read_env::<u64>("IDLE_PENALTY_SECS") {
            config.header.idle_penalty = Duration::from_secs(secs);
        }
        if let Some(muted) = read_env_bool("START_MUTED") {
            config.header.start_muted = muted;
        }

        config
    }
}

#[derive(Clone, Debug)]
pub struct SyncConfig {
    pub poll_interval: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            poll_interval: client_indexer::DEFAULT_POLL_INTERVAL,
        }
    }
}

#[derive(Clone, Debug)]
pub struct TransactionConfig {
    pub poll_interval: Duration,
    pub timeout: Duration,
}

impl Default for TransactionConfig {
    fn default() -> Self {
        let finality = FinalityOptions::default();
        Self {
            poll_interval: finality.poll_interval,
            timeout: finality.timeout,
        }
    }
}

impl TransactionConfig {
    pub fn finality(&self) -> FinalityOptions {
        FinalityOptions {
            poll_interval: self.poll_interval,
            timeout: self.timeout,
        }
    }
}

#[derive(Clone, Debug)]
pub struct MessageConfig {
    pub capacity: usize,
}

impl Default for MessageConfig {
    fn default() -> Self {
        Self { capacity: 64 }
    }
}

#[derive(Clone, Debug)]
pub struct HeaderConfig {
    /// Idle time after the last discovery or battle before the penalty applies.
    pub idle_penalty: Duration,
    pub start_muted: bool,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            idle_penalty: Duration::from_secs(120),
            start_muted: false,
        }
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

fn read_env_bool(key: &str) -> Option<bool> {
    match env::var(key).ok()?.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_client_expectations() {
        let config = FrontendConfig::default();
        assert_eq!(config.sync.poll_interval, Duration::from_millis(5000));
        assert_eq!(config.transactions.finality(), FinalityOptions::default());
        assert_eq!(config.messages.capacity, 64);
    }
}
