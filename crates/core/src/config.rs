use std::time::Duration;

use serde::Deserialize;

/// Layered crawl configuration: defaults, overridden by an optional TOML
/// file, overridden in turn by CLI flags. Only the CLI layer is required;
/// the rest fall back to [`CrawlConfig::default`].
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CrawlConfig {
    pub base_url: String,
    pub max_depth: u32,
    pub threads: usize,
    pub user_agent: String,
    pub timeout_seconds: u64,
}

impl CrawlConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            max_depth: default_max_depth(),
            threads: default_threads(),
            user_agent: default_user_agent(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

fn default_max_depth() -> u32 {
    3
}

fn default_threads() -> usize {
    8
}

fn default_user_agent() -> String {
    "seocrawl/0.1".to_string()
}

fn default_timeout_seconds() -> u64 {
    20
}
