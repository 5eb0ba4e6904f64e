use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ScoreThreadError;

const DEFAULT_CRICBUZZ_URL: &str = "https://www.cricbuzz.com/cricket-match/live-scores";
const DEFAULT_POLL_INTERVAL_SECS: u64 = 60;

/// Which observation sources the bot polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Cricbuzz,
    CricApi,
    Both,
}

impl SourceKind {
    pub fn uses_cricbuzz(self) -> bool {
        matches!(self, Self::Cricbuzz | Self::Both)
    }

    pub fn uses_cricapi(self) -> bool {
        matches!(self, Self::CricApi | Self::Both)
    }
}

impl FromStr for SourceKind {
    type Err = ScoreThreadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cricbuzz" => Ok(Self::Cricbuzz),
            "cricapi" => Ok(Self::CricApi),
            "both" => Ok(Self::Both),
            other => Err(ScoreThreadError::Config(format!(
                "SOURCE must be cricbuzz, cricapi or both, got '{other}'"
            ))),
        }
    }
}

/// UTC hours `[start, end)` during which poll cycles are skipped.
/// Wraps past midnight when `start > end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuietWindow {
    pub start_hour: u32,
    pub end_hour: u32,
}

impl QuietWindow {
    pub fn contains(&self, hour: u32) -> bool {
        if self.start_hour <= self.end_hour {
            hour >= self.start_hour && hour < self.end_hour
        } else {
            hour >= self.start_hour || hour < self.end_hour
        }
    }
}

impl FromStr for QuietWindow {
    type Err = ScoreThreadError;

    /// Parses `"start-end"`, e.g. `"1-7"` or `"22-6"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ScoreThreadError::Config(format!("QUIET_HOURS must look like '1-7', got '{s}'"));
        let (start, end) = s.split_once('-').ok_or_else(invalid)?;
        let start_hour: u32 = start.trim().parse().map_err(|_| invalid())?;
        let end_hour: u32 = end.trim().parse().map_err(|_| invalid())?;
        if start_hour > 23 || end_hour > 24 {
            return Err(invalid());
        }
        Ok(Self {
            start_hour,
            end_hour,
        })
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Discord
    pub discord_token: String,
    pub channel_id: String,

    // Sources
    pub source: SourceKind,
    pub cricket_api_key: Option<String>,
    pub cricbuzz_url: String,

    // Matching
    pub team_filter: String,
    pub team_code: String,
    pub terminal_patterns: Vec<String>,

    // Scheduling
    pub poll_interval: Duration,
    pub quiet_hours: Option<QuietWindow>,
}

impl Config {
    /// Load from the process environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self, ScoreThreadError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ScoreThreadError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| {
            get(key).ok_or_else(|| {
                ScoreThreadError::Config(format!("{key} environment variable is required"))
            })
        };

        let source = match get("SOURCE") {
            Some(s) => s.parse()?,
            None => SourceKind::Cricbuzz,
        };
        let cricket_api_key = get("CRICKET_API_KEY");
        if source.uses_cricapi() && cricket_api_key.is_none() {
            return Err(ScoreThreadError::Config(
                "CRICKET_API_KEY is required when SOURCE includes cricapi".to_string(),
            ));
        }

        let poll_secs = match get("POLL_INTERVAL_SECS") {
            Some(s) => s.trim().parse::<u64>().ok().filter(|n| *n > 0).ok_or_else(|| {
                ScoreThreadError::Config(format!(
                    "POLL_INTERVAL_SECS must be a positive number, got '{s}'"
                ))
            })?,
            None => DEFAULT_POLL_INTERVAL_SECS,
        };

        let quiet_hours = get("QUIET_HOURS")
            .map(|s| s.parse::<QuietWindow>())
            .transpose()?;

        let terminal_patterns: Vec<String> = get("TERMINAL_PATTERNS")
            .map(|s| {
                s.split(',')
                    .map(|p| p.trim().to_string())
                    .filter(|p| !p.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            discord_token: required("DISCORD_TOKEN")?,
            channel_id: required("CHANNEL_ID")?,
            source,
            cricket_api_key,
            cricbuzz_url: get("CRICBUZZ_URL").unwrap_or_else(|| DEFAULT_CRICBUZZ_URL.to_string()),
            team_filter: get("TEAM_FILTER").unwrap_or_else(|| "india".to_string()),
            team_code: get("TEAM_CODE").unwrap_or_else(|| "IND".to_string()),
            terminal_patterns,
            poll_interval: Duration::from_secs(poll_secs),
            quiet_hours,
        })
    }

    /// Log the loaded configuration with secrets shortened.
    pub fn log_redacted(&self) {
        fn preview(val: &str) -> String {
            let n = val.chars().count().min(5);
            let head: String = val.chars().take(n).collect();
            format!("{head}...({} chars)", val.chars().count())
        }

        tracing::info!("Config loaded:");
        tracing::info!("  DISCORD_TOKEN: {}", preview(&self.discord_token));
        tracing::info!("  CHANNEL_ID: {}", self.channel_id);
        tracing::info!("  SOURCE: {:?}", self.source);
        tracing::info!(
            "  CRICKET_API_KEY: {}",
            self.cricket_api_key
                .as_deref()
                .map(preview)
                .unwrap_or_else(|| "<not set>".to_string())
        );
        tracing::info!("  TEAM_FILTER: {} ({})", self.team_filter, self.team_code);
        tracing::info!("  POLL_INTERVAL_SECS: {}", self.poll_interval.as_secs());
        if let Some(q) = &self.quiet_hours {
            tracing::info!("  QUIET_HOURS: {}-{} UTC", q.start_hour, q.end_hour);
        }
        if !self.terminal_patterns.is_empty() {
            tracing::info!("  TERMINAL_PATTERNS: {} overrides", self.terminal_patterns.len());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config, ScoreThreadError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|k| map.get(k).cloned())
    }

    const BASE: &[(&str, &str)] = &[("DISCORD_TOKEN", "token-abcdef"), ("CHANNEL_ID", "123")];

    #[test]
    fn defaults() {
        let c = config(BASE).unwrap();
        assert_eq!(c.source, SourceKind::Cricbuzz);
        assert_eq!(c.team_filter, "india");
        assert_eq!(c.team_code, "IND");
        assert_eq!(c.poll_interval, Duration::from_secs(60));
        assert!(c.quiet_hours.is_none());
        assert!(c.terminal_patterns.is_empty());
        assert_eq!(c.cricbuzz_url, DEFAULT_CRICBUZZ_URL);
    }

    #[test]
    fn missing_token_is_an_error() {
        let err = config(&[("CHANNEL_ID", "123")]).unwrap_err();
        assert!(err.to_string().contains("DISCORD_TOKEN"));
    }

    #[test]
    fn cricapi_requires_key() {
        let mut vars = BASE.to_vec();
        vars.push(("SOURCE", "cricapi"));
        assert!(config(&vars).is_err());

        vars.push(("CRICKET_API_KEY", "k"));
        assert_eq!(config(&vars).unwrap().source, SourceKind::CricApi);
    }

    #[test]
    fn parses_overrides() {
        let mut vars = BASE.to_vec();
        vars.extend([
            ("POLL_INTERVAL_SECS", "3600"),
            ("QUIET_HOURS", "22-6"),
            ("TERMINAL_PATTERNS", r"\bstumps\b, \bover\b ,"),
            ("TEAM_FILTER", "australia"),
        ]);
        let c = config(&vars).unwrap();
        assert_eq!(c.poll_interval, Duration::from_secs(3600));
        assert_eq!(
            c.quiet_hours,
            Some(QuietWindow {
                start_hour: 22,
                end_hour: 6
            })
        );
        assert_eq!(c.terminal_patterns, vec![r"\bstumps\b", r"\bover\b"]);
        assert_eq!(c.team_filter, "australia");
    }

    #[test]
    fn rejects_bad_interval_and_window() {
        let mut vars = BASE.to_vec();
        vars.push(("POLL_INTERVAL_SECS", "0"));
        assert!(config(&vars).is_err());

        let mut vars = BASE.to_vec();
        vars.push(("QUIET_HOURS", "late"));
        assert!(config(&vars).is_err());
    }

    #[test]
    fn quiet_window_wraps_midnight() {
        let w: QuietWindow = "22-6".parse().unwrap();
        assert!(w.contains(23));
        assert!(w.contains(0));
        assert!(w.contains(5));
        assert!(!w.contains(6));
        assert!(!w.contains(12));

        let day: QuietWindow = "1-7".parse().unwrap();
        assert!(day.contains(1));
        assert!(!day.contains(7));
        assert!(!day.contains(0));
    }
}
