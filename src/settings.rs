use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use config::{Config, Environment};
use serde::Deserialize;

use crate::parser::table::SpanMode;

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const DEFAULT_REFERER: &str = "https://www.google.com/";
const DEFAULT_OUTPUT_DIR: &str = "data";
const DEFAULT_OUTPUT_SUFFIX: &str = "_content.json";
const DEFAULT_SPAN_MODE: &str = "legacy";

/// Runtime settings: built-in defaults, overridden by `WIKI_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub timeout_secs: u64,
    pub user_agent: String,
    pub referer: String,
    pub output_dir: PathBuf,
    pub output_suffix: String,
    pub span_mode: SpanMode,
}

/// The subset the fetcher needs.
#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub timeout: Duration,
    pub user_agent: String,
    pub referer: String,
}

impl Settings {
    pub fn load() -> Result<Self> {
        Self::from_config(Config::builder().add_source(Environment::with_prefix("WIKI")))
    }

    fn from_config(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self> {
        builder
            .set_default("timeout_secs", DEFAULT_TIMEOUT_SECS)?
            .set_default("user_agent", DEFAULT_USER_AGENT)?
            .set_default("referer", DEFAULT_REFERER)?
            .set_default("output_dir", DEFAULT_OUTPUT_DIR)?
            .set_default("output_suffix", DEFAULT_OUTPUT_SUFFIX)?
            .set_default("span_mode", DEFAULT_SPAN_MODE)?
            .build()
            .context("Failed to build settings")?
            .try_deserialize()
            .context("Invalid WIKI_* settings")
    }

    pub fn fetch(&self) -> FetchSettings {
        FetchSettings {
            timeout: Duration::from_secs(self.timeout_secs),
            user_agent: self.user_agent.clone(),
            referer: self.referer.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply() {
        let s = Settings::from_config(Config::builder()).unwrap();
        assert_eq!(s.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(s.output_suffix, "_content.json");
        assert_eq!(s.output_dir, PathBuf::from("data"));
        assert!(s.user_agent.starts_with("Mozilla/5.0"));
        assert_eq!(s.span_mode, SpanMode::Legacy);
        assert_eq!(s.fetch().timeout, Duration::from_secs(10));
    }

    #[test]
    fn explicit_values_override_defaults() {
        let builder = Config::builder()
            .set_override("timeout_secs", 3)
            .unwrap()
            .set_override("output_suffix", ".json")
            .unwrap()
            .set_override("span_mode", "strict")
            .unwrap();
        let s = Settings::from_config(builder).unwrap();
        assert_eq!(s.timeout_secs, 3);
        assert_eq!(s.output_suffix, ".json");
        assert_eq!(s.span_mode, SpanMode::Strict);
        assert_eq!(s.referer, DEFAULT_REFERER);
    }
}
