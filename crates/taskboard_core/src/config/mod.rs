use crate::error::AppError;
use crate::model::Section;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILE_NAME: &str = "config.json";
const CONFIG_ENV_VAR: &str = "TASKBOARD_CONFIG_PATH";
const APP_DIR_NAME: &str = "taskboard";

pub const DEFAULT_TICK_INTERVAL_SECS: u64 = 30;
pub const DEFAULT_UPCOMING_WINDOW_HOURS: i64 = 24;
pub const MAX_UPCOMING_WINDOW_HOURS: i64 = 24 * 366 * 10;

const ANSI_RESET: &str = "\x1b[0m";

/// Terminal colors for titles and finished items. `None` prints plain text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Palette {
    accent_code: Option<&'static str>,
    muted_code: Option<&'static str>,
}

impl Palette {
    pub fn accent(&self, text: &str) -> String {
        paint(self.accent_code, text)
    }

    pub fn muted(&self, text: &str) -> String {
        paint(self.muted_code, text)
    }
}

fn paint(code: Option<&str>, text: &str) -> String {
    match code {
        Some(code) => format!("{code}{text}{ANSI_RESET}"),
        None => text.to_string(),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Plain,
    Noir,
    Solarized,
}

impl Theme {
    /// Matches names loosely (`Dark Mode`, `dark-mode`); unknown names are plain.
    pub fn from_name(raw: &str) -> Self {
        let key: String = raw
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .map(|ch| ch.to_ascii_lowercase())
            .collect();
        match key.as_str() {
            "noir" | "dark" | "darkmode" => Theme::Noir,
            "solarized" => Theme::Solarized,
            _ => Theme::Plain,
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            Theme::Plain => Palette::default(),
            Theme::Noir => Palette {
                accent_code: Some("\x1b[38;5;208m"),
                muted_code: Some("\x1b[38;5;250m"),
            },
            Theme::Solarized => Palette {
                accent_code: Some("\x1b[38;5;108m"),
                muted_code: Some("\x1b[38;5;246m"),
            },
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub theme: Option<String>,
    /// Session command aliases, e.g. `"ls": "show all"`.
    #[serde(default)]
    pub aliases: HashMap<String, String>,
    #[serde(default)]
    pub default_section: Option<Section>,
    #[serde(default)]
    pub tick_interval_secs: Option<u64>,
    #[serde(default)]
    pub upcoming_window_hours: Option<i64>,
    #[serde(default)]
    pub desktop_notifications: Option<bool>,
}

impl Config {
    /// Deadline monitor cadence; never shorter than one second.
    pub fn tick_interval(&self) -> Duration {
        let secs = self
            .tick_interval_secs
            .unwrap_or(DEFAULT_TICK_INTERVAL_SECS)
            .max(1);
        Duration::from_secs(secs)
    }

    /// Length of the upcoming window; out-of-range values use the default.
    pub fn upcoming_window_hours(&self) -> i64 {
        self.upcoming_window_hours
            .filter(|hours| (1..=MAX_UPCOMING_WINDOW_HOURS).contains(hours))
            .unwrap_or(DEFAULT_UPCOMING_WINDOW_HOURS)
    }

    pub fn theme(&self) -> Theme {
        self.theme.as_deref().map(Theme::from_name).unwrap_or_default()
    }

    pub fn desktop_notifications(&self) -> bool {
        self.desktop_notifications.unwrap_or(false)
    }
}

#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: Config,
    pub error: Option<AppError>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub theme: Option<String>,
    pub aliases: HashMap<String, String>,
    pub default_section: Option<Section>,
    pub tick_interval_secs: Option<u64>,
    pub upcoming_window_hours: Option<i64>,
    pub desktop_notifications: Option<bool>,
}

pub fn config_path() -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }
    Ok(config_dir()?.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
}

fn config_dir() -> Result<PathBuf, AppError> {
    let (var, suffix) = if cfg!(windows) {
        ("APPDATA", None)
    } else {
        ("HOME", Some(".config"))
    };
    let base = std::env::var(var)
        .map(PathBuf::from)
        .map_err(|_| AppError::invalid_data(format!("{var} is not set")))?;
    Ok(match suffix {
        Some(suffix) => base.join(suffix),
        None => base,
    })
}

/// Loads the config file, falling back to defaults. A missing file is not an
/// error; an unreadable or invalid one is reported alongside the defaults.
pub fn load_config_with_fallback() -> ConfigLoad {
    let loaded = config_path().and_then(|path| load_config_from_path(&path));
    match loaded {
        Ok(config) => ConfigLoad {
            config: config.unwrap_or_default(),
            error: None,
        },
        Err(err) => ConfigLoad {
            config: Config::default(),
            error: Some(err),
        },
    }
}

/// `Ok(None)` when the file does not exist.
fn load_config_from_path(path: &Path) -> Result<Option<Config>, AppError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(AppError::io(format!("{}: {}", path.display(), err))),
    };
    let config = serde_json::from_str(&content).map_err(|err| {
        AppError::invalid_data(format!("invalid JSON in {}: {}", path.display(), err))
    })?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(Some(config))
}

pub fn merge_overrides(base: &Config, overrides: &ConfigOverrides) -> Config {
    let mut merged = base.clone();
    if overrides.theme.is_some() {
        merged.theme = overrides.theme.clone();
    }

    for (alias, value) in overrides.aliases.iter() {
        merged.aliases.insert(alias.clone(), value.clone());
    }

    if overrides.default_section.is_some() {
        merged.default_section = overrides.default_section;
    }
    if overrides.tick_interval_secs.is_some() {
        merged.tick_interval_secs = overrides.tick_interval_secs;
    }
    if overrides.upcoming_window_hours.is_some() {
        merged.upcoming_window_hours = overrides.upcoming_window_hours;
    }
    if overrides.desktop_notifications.is_some() {
        merged.desktop_notifications = overrides.desktop_notifications;
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::{
        Config, ConfigOverrides, MAX_UPCOMING_WINDOW_HOURS, Theme, load_config_from_path,
        merge_overrides,
    };
    use crate::model::Section;
    use std::fs;
    use std::path::PathBuf;
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    fn temp_path(file_name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("taskboard-{nanos}-{file_name}"))
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let path = temp_path("missing-config.json");
        assert_eq!(load_config_from_path(&path).unwrap(), None);
    }

    #[test]
    fn invalid_json_is_reported_as_invalid_data() {
        let path = temp_path("invalid-config.json");
        fs::write(&path, "{ invalid json ").unwrap();

        let err = load_config_from_path(&path).unwrap_err();
        fs::remove_file(&path).ok();

        assert_eq!(err.code(), "invalid_data");
    }

    #[test]
    fn unknown_section_rejects_the_file() {
        let path = temp_path("bad-section.json");
        fs::write(&path, r#"{ "default_section": "lunch" }"#).unwrap();

        let result = load_config_from_path(&path);
        fs::remove_file(&path).ok();

        assert!(result.is_err());
    }

    #[test]
    fn valid_file_fills_every_field() {
        let path = temp_path("valid-config.json");
        let content = serde_json::json!({
            "theme": "Dark Mode",
            "aliases": { "ls": "show all" },
            "default_section": "evening",
            "tick_interval_secs": 5,
            "upcoming_window_hours": 12,
            "desktop_notifications": true
        });
        fs::write(&path, serde_json::to_string(&content).unwrap()).unwrap();

        let loaded = load_config_from_path(&path).unwrap().unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(loaded.theme(), Theme::Noir);
        assert_eq!(loaded.aliases.get("ls").map(String::as_str), Some("show all"));
        assert_eq!(loaded.default_section, Some(Section::Evening));
        assert_eq!(loaded.tick_interval(), Duration::from_secs(5));
        assert_eq!(loaded.upcoming_window_hours(), 12);
        assert!(loaded.desktop_notifications());
    }

    #[test]
    fn defaults_match_monitor_cadence_and_window() {
        let config = Config::default();
        assert_eq!(config.tick_interval(), Duration::from_secs(30));
        assert_eq!(config.upcoming_window_hours(), 24);
        assert_eq!(config.theme(), Theme::Plain);
        assert!(!config.desktop_notifications());
    }

    #[test]
    fn degenerate_values_fall_back() {
        let config = Config {
            tick_interval_secs: Some(0),
            upcoming_window_hours: Some(-3),
            ..Config::default()
        };
        assert_eq!(config.tick_interval(), Duration::from_secs(1));
        assert_eq!(config.upcoming_window_hours(), 24);
    }

    #[test]
    fn oversized_window_falls_back() {
        let config = Config {
            upcoming_window_hours: Some(9_999_999_999_999_999),
            ..Config::default()
        };
        assert_eq!(config.upcoming_window_hours(), 24);

        let capped = Config {
            upcoming_window_hours: Some(MAX_UPCOMING_WINDOW_HOURS),
            ..Config::default()
        };
        assert_eq!(capped.upcoming_window_hours(), MAX_UPCOMING_WINDOW_HOURS);
    }

    #[test]
    fn overrides_replace_scalars_and_extend_aliases() {
        let base = Config {
            theme: Some("solarized".into()),
            aliases: [("ls".into(), "show all".into())].into_iter().collect(),
            ..Config::default()
        };
        let overrides = ConfigOverrides {
            theme: Some("noir".into()),
            aliases: [("t".into(), "tick".into())].into_iter().collect(),
            default_section: Some(Section::Night),
            tick_interval_secs: Some(10),
            upcoming_window_hours: Some(6),
            desktop_notifications: Some(true),
        };

        let merged = merge_overrides(&base, &overrides);

        assert_eq!(merged.theme(), Theme::Noir);
        assert_eq!(merged.aliases.len(), 2);
        assert_eq!(merged.default_section, Some(Section::Night));
        assert_eq!(merged.tick_interval_secs, Some(10));
        assert_eq!(merged.upcoming_window_hours, Some(6));
        assert_eq!(merged.desktop_notifications, Some(true));
        assert_eq!(merge_overrides(&base, &ConfigOverrides::default()), base);
    }

    #[test]
    fn theme_names_are_matched_loosely() {
        assert_eq!(Theme::from_name("dark-mode"), Theme::Noir);
        assert_eq!(Theme::from_name(" Solarized "), Theme::Solarized);
        assert_eq!(Theme::from_name("oceanic"), Theme::Plain);
    }

    #[test]
    fn plain_palette_leaves_text_alone() {
        assert_eq!(Theme::Plain.palette().muted("done"), "done");
        assert_eq!(
            Theme::Noir.palette().muted("done"),
            "\x1b[38;5;250mdone\x1b[0m"
        );
    }
}
