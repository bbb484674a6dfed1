//! Settings file and CLI override merging.
//!
//! Precedence, highest first: command line, `config.toml`, the game's own
//! preferred frame interval, built-in defaults.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_WIDTH: u32 = 64;
pub const DEFAULT_HEIGHT: u32 = 64;
pub const DEFAULT_SCALE: u32 = 8;
/// Largest window edge, in screen pixels, we will ask SDL for.
pub const MAX_WINDOW_EDGE: u32 = 16_384;

#[derive(Debug)]
pub enum ConfigError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    /// A `[keys]` entry names a key SDL does not know.
    UnknownKey(String),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read { path, source } => {
                write!(f, "cannot read {}: {source}", path.display())
            }
            ConfigError::Parse { path, source } => {
                write!(f, "invalid config {}: {source}", path.display())
            }
            ConfigError::UnknownKey(name) => write!(f, "unknown key name '{name}'"),
            ConfigError::Invalid(msg) => write!(f, "invalid setting: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Read { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Key bindings by SDL scancode name (e.g. "Up", "W", "Left Shift").
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct KeyConfig {
    pub up: Vec<String>,
    pub down: Vec<String>,
    pub left: Vec<String>,
    pub right: Vec<String>,
    pub primary: Vec<String>,
    pub secondary: Vec<String>,
    pub back: Vec<String>,
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl Default for KeyConfig {
    fn default() -> Self {
        Self {
            up: names(&["Up", "W"]),
            down: names(&["Down", "S"]),
            left: names(&["Left", "A"]),
            right: names(&["Right", "D"]),
            primary: names(&["Space", "Z"]),
            secondary: names(&["X", "Left Shift"]),
            back: names(&["Escape", "Backspace"]),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub width: u32,
    pub height: u32,
    pub scale: u32,
    /// Unset means "whatever the game was tuned for".
    pub frame_interval_ms: Option<u64>,
    pub show_fps: bool,
    pub keys: KeyConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            scale: DEFAULT_SCALE,
            frame_interval_ms: None,
            show_fps: false,
            keys: KeyConfig::default(),
        }
    }
}

/// Values given on the command line. `None`/`false` defer to the file.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub scale: Option<u32>,
    pub frame_ms: Option<u64>,
    pub show_fps: bool,
}

/// Fully resolved settings for one run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunSettings {
    pub width: u32,
    pub height: u32,
    pub scale: u32,
    pub frame_interval: Duration,
    pub show_fps: bool,
}

pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("pixelbox").join("config.toml"))
}

impl Config {
    pub fn from_toml(path: &Path, text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `explicit` if given (it must exist), otherwise the default
    /// location if present, otherwise built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match default_path() {
                Some(path) if path.exists() => path,
                _ => return Ok(Self::default()),
            },
        };
        let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        tracing::debug!("loaded settings from {}", path.display());
        Self::from_toml(&path, &text)
    }

    pub fn resolve(
        &self,
        overrides: &Overrides,
        game_interval: Duration,
    ) -> Result<RunSettings, ConfigError> {
        let scale = overrides.scale.unwrap_or(self.scale);
        let frame_interval = match overrides.frame_ms.or(self.frame_interval_ms) {
            Some(ms) => Duration::from_millis(ms),
            None => game_interval,
        };

        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "display size {}x{} must be non-zero",
                self.width, self.height
            )));
        }
        if scale == 0 {
            return Err(ConfigError::Invalid("scale must be at least 1".to_string()));
        }
        let window = self
            .width
            .checked_mul(scale)
            .zip(self.height.checked_mul(scale))
            .filter(|&(w, h)| w <= MAX_WINDOW_EDGE && h <= MAX_WINDOW_EDGE);
        if window.is_none() {
            return Err(ConfigError::Invalid(format!(
                "{}x{} at scale {scale} exceeds the {MAX_WINDOW_EDGE} pixel window limit",
                self.width, self.height
            )));
        }
        if frame_interval.is_zero() {
            return Err(ConfigError::Invalid(
                "frame interval must be at least 1 ms".to_string(),
            ));
        }

        Ok(RunSettings {
            width: self.width,
            height: self.height,
            scale,
            frame_interval,
            show_fps: overrides.show_fps || self.show_fps,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GAME: Duration = Duration::from_millis(50);

    #[test]
    fn test_empty_file_is_defaults() {
        let cfg = Config::from_toml(Path::new("c.toml"), "").unwrap();
        assert_eq!(cfg, Config::default());
        let run = cfg.resolve(&Overrides::default(), GAME).unwrap();
        assert_eq!((run.width, run.height, run.scale), (64, 64, 8));
        assert_eq!(run.frame_interval, GAME);
        assert!(!run.show_fps);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let text = r#"
            scale = 4
            frame_interval_ms = 20

            [keys]
            primary = ["Return"]
        "#;
        let cfg = Config::from_toml(Path::new("c.toml"), text).unwrap();
        assert_eq!(cfg.scale, 4);
        assert_eq!(cfg.width, 64);
        assert_eq!(cfg.keys.primary, vec!["Return".to_string()]);
        assert_eq!(cfg.keys.up, KeyConfig::default().up);

        let run = cfg.resolve(&Overrides::default(), GAME).unwrap();
        assert_eq!(run.frame_interval, Duration::from_millis(20));
    }

    #[test]
    fn test_cli_overrides_file() {
        let cfg = Config {
            scale: 4,
            frame_interval_ms: Some(20),
            ..Config::default()
        };
        let overrides = Overrides {
            scale: Some(2),
            frame_ms: Some(10),
            show_fps: true,
        };
        let run = cfg.resolve(&overrides, GAME).unwrap();
        assert_eq!(run.scale, 2);
        assert_eq!(run.frame_interval, Duration::from_millis(10));
        assert!(run.show_fps);
    }

    #[test]
    fn test_rejects_zero_values() {
        let cfg = Config::default();
        let zero_scale = Overrides {
            scale: Some(0),
            ..Overrides::default()
        };
        assert!(matches!(
            cfg.resolve(&zero_scale, GAME),
            Err(ConfigError::Invalid(_))
        ));

        let zero_frame = Overrides {
            frame_ms: Some(0),
            ..Overrides::default()
        };
        assert!(cfg.resolve(&zero_frame, GAME).is_err());

        let flat = Config {
            height: 0,
            ..Config::default()
        };
        assert!(flat.resolve(&Overrides::default(), GAME).is_err());
    }

    #[test]
    fn test_rejects_oversized_window() {
        let cfg = Config::default();
        let huge = Overrides {
            scale: Some(100_000_000),
            ..Overrides::default()
        };
        assert!(matches!(
            cfg.resolve(&huge, GAME),
            Err(ConfigError::Invalid(_))
        ));

        let wide = Config {
            width: MAX_WINDOW_EDGE + 1,
            scale: 1,
            ..Config::default()
        };
        assert!(wide.resolve(&Overrides::default(), GAME).is_err());

        let at_limit = Overrides {
            scale: Some(MAX_WINDOW_EDGE / DEFAULT_WIDTH),
            ..Overrides::default()
        };
        assert_eq!(cfg.resolve(&at_limit, GAME).unwrap().scale, 256);
    }

    #[test]
    fn test_bad_toml_reports_path() {
        let err = Config::from_toml(Path::new("/tmp/pixelbox.toml"), "scale = \"big\"")
            .unwrap_err();
        assert!(err.to_string().starts_with("invalid config /tmp/pixelbox.toml"));
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let err = Config::load(Some(Path::new("/nonexistent/pixelbox.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
