use crate::naming::NamingOptions;
use anyhow::{bail, Context, Result};
use directories::ProjectDirs;
use log::warn;
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Persisted settings: one naming section for files, one for directories.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub files: NamingSettings,
    pub dirs: NamingSettings,
}

impl AppConfig {
    pub fn file_options(&self) -> NamingOptions {
        self.files.resolve()
    }

    pub fn dir_options(&self) -> NamingOptions {
        self.dirs.resolve()
    }
}

/// A naming section as stored on disk; any field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NamingSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_separator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_separator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_time_separator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range_separator: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_day_start"
    )]
    pub day_start: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_title: Option<bool>,
}

impl NamingSettings {
    pub fn resolve(&self) -> NamingOptions {
        let defaults = NamingOptions::default();
        let day_start = match self.day_start {
            Some(hour) if hour > 23 => {
                warn!("dayStart {hour} is out of range, using 23");
                23
            }
            Some(hour) => hour,
            None => defaults.day_start,
        };

        NamingOptions {
            date_separator: self
                .date_separator
                .clone()
                .unwrap_or(defaults.date_separator),
            time_separator: self
                .time_separator
                .clone()
                .unwrap_or(defaults.time_separator),
            date_time_separator: self
                .date_time_separator
                .clone()
                .unwrap_or(defaults.date_time_separator),
            range_separator: self
                .range_separator
                .clone()
                .unwrap_or(defaults.range_separator),
            day_start,
            include_title: self.include_title.unwrap_or(defaults.include_title),
        }
    }

    /// Sets one field by its settings-file key, e.g. `dateSeparator` or `dayStart`.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "dateSeparator" => self.date_separator = Some(value.to_string()),
            "timeSeparator" => self.time_separator = Some(value.to_string()),
            "dateTimeSeparator" => self.date_time_separator = Some(value.to_string()),
            "rangeSeparator" => self.range_separator = Some(value.to_string()),
            "dayStart" => {
                let hour = value
                    .trim()
                    .parse::<u32>()
                    .with_context(|| format!("dayStart must be an hour, got {value:?}"))?;
                self.day_start = Some(hour);
            }
            "includeTitle" => {
                let include = value
                    .trim()
                    .parse::<bool>()
                    .with_context(|| format!("includeTitle must be true or false, got {value:?}"))?;
                self.include_title = Some(include);
            }
            other => bail!("unknown setting: {other}"),
        }
        Ok(())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum HourValue {
    Number(u32),
    Text(String),
}

// Hand-edited settings may carry the hour as a string ("04"); anything non-numeric falls back
// to the default.
fn deserialize_day_start<'de, D>(deserializer: D) -> std::result::Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<HourValue>::deserialize(deserializer)? {
        None => None,
        Some(HourValue::Number(hour)) => Some(hour),
        Some(HourValue::Text(text)) => match text.trim().parse::<u32>() {
            Ok(hour) => Some(hour),
            Err(_) => {
                warn!("dayStart {text:?} is not an hour, using the default");
                None
            }
        },
    })
}

#[derive(Debug, Clone)]
pub struct AppPaths {
    pub config_dir: PathBuf,
    pub config_path: PathBuf,
    pub undo_path: PathBuf,
}

pub fn app_paths() -> Result<AppPaths> {
    let proj = ProjectDirs::from("com", "photodate", "photodate")
        .context("cannot determine the user config directory")?;
    let config_dir = proj.config_dir().to_path_buf();
    Ok(AppPaths {
        config_path: config_dir.join("settings.json"),
        undo_path: config_dir.join("undo-last.json"),
        config_dir,
    })
}

pub fn load_config() -> Result<AppConfig> {
    load_config_from(&app_paths()?.config_path)
}

/// Defaults when `path` does not exist; a file that exists must parse.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }

    let raw = fs::read_to_string(path)
        .with_context(|| format!("cannot read settings file: {}", path.display()))?;
    let config = serde_json::from_str::<AppConfig>(&raw)
        .with_context(|| format!("cannot parse settings file: {}", path.display()))?;
    Ok(config)
}

pub fn save_config(config: &AppConfig) -> Result<()> {
    save_config_to(&app_paths()?.config_path, config)
}

pub fn save_config_to(path: &Path, config: &AppConfig) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("cannot create settings directory: {}", dir.display()))?;
    }
    let body = serde_json::to_string_pretty(config).context("cannot serialize settings")?;
    fs::write(path, body)
        .with_context(|| format!("cannot write settings file: {}", path.display()))?;
    Ok(())
}
