use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use game_core::{
    BucketPolicy, DEFAULT_MAX_RANK, DEFAULT_NEAR_THRESHOLD, DEFAULT_POPULATION, GameConfig,
    RankScale,
};

#[derive(Debug, Clone)]
pub struct Config {
    pub oracle_url: String,
    pub request_timeout: Option<Duration>, // HTTP client only; the core never times out
    pub stats_refresh: Duration,
    pub game: GameConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup, falling back to
    /// defaults for missing keys.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = GameConfig::default();

        let oracle_url = lookup("ORACLE_URL")
            .unwrap_or_else(|| "http://127.0.0.1:5000".to_string())
            .trim_end_matches('/')
            .to_string();

        let think_delay_ms: u64 = parse_or(
            &lookup,
            "AI_THINK_DELAY_MS",
            defaults.ai_think_delay.as_millis() as u64,
        )?;
        let auto_ai_reply = match lookup("AUTO_AI_REPLY") {
            Some(value) => parse_flag(&value).context("Invalid AUTO_AI_REPLY")?,
            None => defaults.auto_ai_reply,
        };

        let policy = match lookup("BUCKET_POLICY").as_deref() {
            None | Some("saturating") => BucketPolicy::Saturating {
                max_rank: parse_or(&lookup, "BUCKET_MAX_RANK", DEFAULT_MAX_RANK)?,
            },
            Some("percentile") => BucketPolicy::Percentile {
                population: parse_or(&lookup, "BUCKET_POPULATION", DEFAULT_POPULATION)?,
            },
            Some(other) => bail!(
                "Invalid BUCKET_POLICY '{}': expected 'saturating' or 'percentile'",
                other
            ),
        };
        let near_threshold = parse_or(&lookup, "NEAR_THRESHOLD", DEFAULT_NEAR_THRESHOLD)?;

        let timeout_seconds: u64 = parse_or(&lookup, "REQUEST_TIMEOUT_SECONDS", 0)?;

        Ok(Self {
            oracle_url,
            request_timeout: (timeout_seconds > 0).then(|| Duration::from_secs(timeout_seconds)),
            stats_refresh: Duration::from_secs(parse_or(&lookup, "STATS_REFRESH_SECONDS", 60)?),
            game: GameConfig {
                ai_think_delay: Duration::from_millis(think_delay_ms),
                auto_ai_reply,
                rank_scale: RankScale::new(policy, near_threshold),
                ai_max_attempts: parse_or(&lookup, "AI_MAX_ATTEMPTS", defaults.ai_max_attempts)?,
            },
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .with_context(|| format!("Invalid {}: '{}'", key, value)),
        None => Ok(default),
    }
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("'{}' is not a boolean", other),
    }
}
