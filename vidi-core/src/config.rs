use anyhow::{Context, anyhow, bail};
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};
use vidi_model::media::DEFAULT_STREAMING_SCHEMES;

pub const CONFIG_PATH_ENV: &str = "VIDI_PLAYER_CONFIG_PATH";
pub const CONFIG_JSON_ENV: &str = "VIDI_PLAYER_CONFIG_JSON";

fn default_allowed_schemes() -> Vec<String> {
    DEFAULT_STREAMING_SCHEMES
        .iter()
        .map(|scheme| scheme.to_string())
        .collect()
}

/// Source that produced the player configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PlayerConfigSource {
    #[default]
    Default,
    EnvPath(PathBuf),
    EnvInline,
    File(PathBuf),
}

/// Timing and policy knobs for the playback controller.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Idle time (ms) before the controls fade out while playing.
    pub hide_delay_ms: u64,
    /// Quiet period (ms) after entering fullscreen before the auto-hide
    /// countdown resumes, so the controls don't vanish mid-rotation.
    pub fullscreen_settle_ms: u64,
    /// Requested cadence (ms) of engine position ticks.
    pub tick_interval_ms: u64,
    /// Fade duration (ms) the presentation layer animates a hide with.
    pub fade_duration_ms: u64,
    /// Buffer size of the notification bus. Slow observers that fall further
    /// behind than this skip ahead to the latest notifications.
    pub notification_capacity: usize,
    /// Locator schemes accepted for playback.
    #[serde(default = "default_allowed_schemes")]
    pub allowed_schemes: Vec<String>,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            hide_delay_ms: 3_000,
            fullscreen_settle_ms: 500,
            tick_interval_ms: 100,
            fade_duration_ms: 300,
            notification_capacity: 64,
            allowed_schemes: default_allowed_schemes(),
        }
    }
}

impl PlayerConfig {
    /// Load configuration using environment variables.
    /// Evaluation order:
    /// 1) `$VIDI_PLAYER_CONFIG_PATH` (TOML or JSON file),
    /// 2) `$VIDI_PLAYER_CONFIG_JSON` (inline JSON),
    /// 3) defaults if neither is set.
    pub fn load_from_env() -> anyhow::Result<(Self, PlayerConfigSource)> {
        if let Ok(path_str) = env::var(CONFIG_PATH_ENV)
            && !path_str.trim().is_empty()
        {
            let path = PathBuf::from(path_str);
            let config = Self::load_from_file(&path)?;
            return Ok((config, PlayerConfigSource::EnvPath(path)));
        }

        if let Ok(raw) = env::var(CONFIG_JSON_ENV)
            && !raw.trim().is_empty()
        {
            let parsed = Self::parse_json(&raw)
                .with_context(|| format!("failed to parse {CONFIG_JSON_ENV}"))?;
            return Ok((parsed, PlayerConfigSource::EnvInline));
        }

        Ok((Self::default(), PlayerConfigSource::Default))
    }

    /// An explicit path wins over the environment.
    pub fn load(
        path: Option<&Path>,
    ) -> anyhow::Result<(Self, PlayerConfigSource)> {
        match path {
            Some(path) => {
                let config = Self::load_from_file(path)?;
                Ok((config, PlayerConfigSource::File(path.to_path_buf())))
            }
            None => Self::load_from_env(),
        }
    }

    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path).with_context(|| {
            format!("failed to read player config from {}", path.display())
        })?;

        let config = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::from_str(&contents).with_context(|| {
                format!("invalid player config {}", path.display())
            })?,
            Some("toml") | Some("tml") => {
                toml::from_str(&contents).map_err(|err| {
                    anyhow!("invalid player config {}: {}", path.display(), err)
                })?
            }
            _ => {
                let origin = path.display().to_string();
                Self::parse_from_str(&contents, &origin)?
            }
        };

        Self::validated(config)
    }

    pub fn parse_from_str(
        contents: &str,
        origin: &str,
    ) -> anyhow::Result<Self> {
        // Try TOML first, then JSON for convenience.
        let config = toml::from_str(contents).or_else(|toml_err| {
            serde_json::from_str(contents).map_err(|json_err| {
                anyhow!(
                    "failed to parse player config {}: \
                     toml error: {}; json error: {}",
                    origin,
                    toml_err,
                    json_err
                )
            })
        })?;
        Self::validated(config)
    }

    pub fn parse_json(raw: &str) -> anyhow::Result<Self> {
        let config = serde_json::from_str(raw)
            .context("invalid player config JSON")?;
        Self::validated(config)
    }

    fn validated(config: Self) -> anyhow::Result<Self> {
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.hide_delay_ms == 0 {
            bail!("hide_delay_ms must be greater than zero");
        }
        if self.fullscreen_settle_ms == 0 {
            bail!("fullscreen_settle_ms must be greater than zero");
        }
        if self.tick_interval_ms == 0 {
            bail!("tick_interval_ms must be greater than zero");
        }
        if self.notification_capacity == 0 {
            bail!("notification_capacity must be greater than zero");
        }
        if self.allowed_schemes.iter().all(|s| s.trim().is_empty()) {
            bail!("allowed_schemes must list at least one scheme");
        }
        Ok(())
    }

    pub fn hide_delay(&self) -> Duration {
        Duration::from_millis(self.hide_delay_ms)
    }

    pub fn fullscreen_settle(&self) -> Duration {
        Duration::from_millis(self.fullscreen_settle_ms)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn fade_duration(&self) -> Duration {
        Duration::from_millis(self.fade_duration_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_documented_values() {
        let config = PlayerConfig::default();
        assert_eq!(config.hide_delay(), Duration::from_secs(3));
        assert_eq!(config.fullscreen_settle(), Duration::from_millis(500));
        assert_eq!(config.tick_interval(), Duration::from_millis(100));
        assert_eq!(config.allowed_schemes, vec!["http", "https"]);
        config.validate().expect("defaults are valid");
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let config = PlayerConfig::parse_from_str("hide_delay_ms = 5000\n", "inline")
            .expect("parse toml");
        assert_eq!(config.hide_delay_ms, 5_000);
        assert_eq!(config.fullscreen_settle_ms, 500);
        assert_eq!(config.allowed_schemes, vec!["http", "https"]);
    }

    #[test]
    fn json_is_accepted_as_fallback() {
        let config = PlayerConfig::parse_from_str(
            r#"{"allowed_schemes": ["https", "rtsp"], "fade_duration_ms": 150}"#,
            "inline",
        )
        .expect("parse json");
        assert_eq!(config.allowed_schemes, vec!["https", "rtsp"]);
        assert_eq!(config.fade_duration(), Duration::from_millis(150));
    }

    #[test]
    fn zero_delays_are_rejected() {
        let err = PlayerConfig::parse_json(r#"{"hide_delay_ms": 0}"#).unwrap_err();
        assert!(err.to_string().contains("hide_delay_ms"));

        let config = PlayerConfig {
            allowed_schemes: vec![],
            ..PlayerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn loads_toml_file_by_extension() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("create temp file");
        writeln!(file, "fullscreen_settle_ms = 750").expect("write config");

        let config = PlayerConfig::load_from_file(file.path()).expect("load config");
        assert_eq!(config.fullscreen_settle(), Duration::from_millis(750));
    }

    #[test]
    fn explicit_json_path_reports_file_source() {
        let mut file = tempfile::Builder::new()
            .suffix(".json")
            .tempfile()
            .expect("create temp file");
        write!(file, r#"{{"notification_capacity": 16}}"#).expect("write config");

        let (config, source) =
            PlayerConfig::load(Some(file.path())).expect("load config");
        assert_eq!(config.notification_capacity, 16);
        assert_eq!(source, PlayerConfigSource::File(file.path().to_path_buf()));
    }

    #[test]
    fn missing_file_is_an_error_with_context() {
        let dir = tempfile::tempdir().expect("temp dir");
        let missing = dir.path().join("absent.toml");
        let err = PlayerConfig::load_from_file(&missing).unwrap_err();
        assert!(err.to_string().contains("failed to read player config"));
    }

    #[test]
    fn garbage_reports_both_parsers() {
        let err = PlayerConfig::parse_from_str("{{ nope", "broken.cfg").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("toml error"));
        assert!(message.contains("json error"));
    }

    #[test]
    fn environment_precedence_is_path_then_inline_then_defaults() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("create temp file");
        writeln!(file, "hide_delay_ms = 4000").expect("write config");
        let inline = r#"{"hide_delay_ms": 2000}"#;

        // SAFETY: no other test in this crate reads or writes them.
        unsafe {
            env::set_var(CONFIG_PATH_ENV, file.path());
            env::set_var(CONFIG_JSON_ENV, inline);
        }
        let (config, source) = PlayerConfig::load_from_env().expect("path");
        assert_eq!(config.hide_delay_ms, 4_000);
        assert_eq!(source, PlayerConfigSource::EnvPath(file.path().to_path_buf()));

        unsafe { env::remove_var(CONFIG_PATH_ENV) };
        let (config, source) = PlayerConfig::load_from_env().expect("inline");
        assert_eq!(config.hide_delay_ms, 2_000);
        assert_eq!(source, PlayerConfigSource::EnvInline);

        unsafe { env::set_var(CONFIG_JSON_ENV, r#"{"hide_delay_ms": 0}"#) };
        let err = PlayerConfig::load_from_env().unwrap_err();
        assert!(format!("{err:#}").contains(CONFIG_JSON_ENV));

        unsafe { env::remove_var(CONFIG_JSON_ENV) };
        let (config, source) = PlayerConfig::load_from_env().expect("defaults");
        assert_eq!(config, PlayerConfig::default());
        assert_eq!(source, PlayerConfigSource::Default);
    }
}
