//! Upstream data source settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

fn default_base_url() -> String {
    "https://www.jisilu.cn".to_string()
}
fn default_endpoint() -> String {
    "/data/new_stock/hkipo/".to_string()
}
fn default_page_size() -> u32 {
    50
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_max_retries() -> u32 {
    3
}
fn default_retry_base_delay_ms() -> u64 {
    1000
}
fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/139.0.0.0 Safari/537.36".to_string()
}
fn default_referer() -> String {
    "https://www.jisilu.cn/data/new_stock/".to_string()
}

/// Where and how to fetch the IPO snapshot.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SourceConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Rows requested per page (`rp`)
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Per-attempt request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Total attempts, including the first one
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_referer")]
    pub referer: String,

    /// Raw `Cookie` header value. The endpoint serves a truncated list without a session.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cookie: Option<String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig {
            base_url: default_base_url(),
            endpoint: default_endpoint(),
            page_size: default_page_size(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
            user_agent: default_user_agent(),
            referer: default_referer(),
            cookie: None,
        }
    }
}

impl SourceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Backoff before the attempt that follows failed attempt number `attempt` (1-based).
    /// Doubles each time: base, 2*base, 4*base, ...
    pub fn retry_delay(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        Duration::from_millis(self.retry_base_delay_ms.saturating_mul(1u64 << exponent))
    }
}
