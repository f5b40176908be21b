use std::{env, path::PathBuf, time::Duration};

use anyhow::Context as _;

use mhbot_lookup::mhct::DEFAULT_BASE_URL;
use mhbot_utils::pager::DEFAULT_TIMEOUT_SECS;

/// Prefix for message commands, e.g. `-mh find white`.
pub const DEFAULT_COMMAND_PREFIX: &str = "-mh";

#[derive(Clone, Debug)]
pub struct Config {
    pub discord_token: String,
    pub mhct_base_url: String,
    pub command_prefix: String,
    pub nicknames_path: Option<PathBuf>,
    pub pager_timeout: Duration,
}

impl Config {
    /// Read settings from the process environment.
    ///
    /// `DISCORD_TOKEN` is required. `MHCT_BASE_URL`, `COMMAND_PREFIX`,
    /// `NICKNAMES_PATH` and `PAGER_TIMEOUT_SECS` fall back to defaults.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let discord_token = var("DISCORD_TOKEN").context("DISCORD_TOKEN must be set")?;

        let pager_timeout_secs = match non_empty(var("PAGER_TIMEOUT_SECS")) {
            Some(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .with_context(|| format!("PAGER_TIMEOUT_SECS must be a positive integer, got {raw:?}"))?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            discord_token,
            mhct_base_url: non_empty(var("MHCT_BASE_URL"))
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned()),
            command_prefix: non_empty(var("COMMAND_PREFIX"))
                .unwrap_or_else(|| DEFAULT_COMMAND_PREFIX.to_owned()),
            nicknames_path: non_empty(var("NICKNAMES_PATH")).map(PathBuf::from),
            pager_timeout: Duration::from_secs(pager_timeout_secs),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply() {
        let config = config_from(&[("DISCORD_TOKEN", "abc")]).unwrap();
        assert_eq!(config.discord_token, "abc");
        assert_eq!(config.mhct_base_url, DEFAULT_BASE_URL);
        assert_eq!(config.command_prefix, "-mh");
        assert!(config.nicknames_path.is_none());
        assert_eq!(config.pager_timeout, Duration::from_secs(60));
    }

    #[test]
    fn token_is_required() {
        assert!(config_from(&[]).is_err());
    }

    #[test]
    fn overrides_are_read() {
        let config = config_from(&[
            ("DISCORD_TOKEN", "abc"),
            ("COMMAND_PREFIX", "!"),
            ("NICKNAMES_PATH", "nicknames.json"),
            ("PAGER_TIMEOUT_SECS", "90"),
            ("MHCT_BASE_URL", "  "),
        ])
        .unwrap();
        assert_eq!(config.command_prefix, "!");
        assert_eq!(config.nicknames_path, Some(PathBuf::from("nicknames.json")));
        assert_eq!(config.pager_timeout, Duration::from_secs(90));
        assert_eq!(config.mhct_base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn zero_timeout_is_rejected() {
        assert!(config_from(&[("DISCORD_TOKEN", "abc"), ("PAGER_TIMEOUT_SECS", "0")]).is_err());
    }
}
