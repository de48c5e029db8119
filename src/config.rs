//! Stored defaults for `--server` and `--session`.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;

const APP_DIR: &str = "omero-duplicate";
const FILE_NAME: &str = "config.json";

#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<String>,
}

impl Config {
    /// `$XDG_CONFIG_HOME/omero-duplicate/config.json`, else under `~/.config`.
    pub fn default_path() -> PathBuf {
        std::env::var_os("XDG_CONFIG_HOME")
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(APP_DIR)
            .join(FILE_NAME)
    }

    pub fn load() -> Self {
        Self::load_from(&Self::default_path())
    }

    /// Missing or unreadable files give an empty config. Blank or
    /// non-string values are dropped field by field.
    pub fn load_from(path: &Path) -> Self {
        let Ok(text) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        match serde_json::from_str::<Map<String, Value>>(&text) {
            Ok(fields) => Self {
                server: text_field(&fields, "server"),
                session: text_field(&fields, "session"),
            },
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "ignoring unreadable config");
                Self::default()
            }
        }
    }

    /// Replaces the file at `path` via a sibling temp file, readable by the
    /// owner only.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let temp_path = path.with_extension("tmp");

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(&temp_path)?;
        serde_json::to_writer_pretty(&mut file, self)?;
        file.write_all(b"\n")?;
        file.sync_all()?;

        std::fs::rename(&temp_path, path)?;
        Ok(())
    }
}

fn text_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields
        .get(key)
        .and_then(Value::as_str)
        .filter(|text| !text.trim().is_empty())
        .map(str::to_owned)
}

/// Masks all but the last four characters of a session key.
pub fn mask_secret(value: &str) -> String {
    let count = value.chars().count();
    let hidden = count.saturating_sub(4);
    value
        .chars()
        .enumerate()
        .map(|(index, ch)| if index < hidden || count <= 4 { '*' } else { ch })
        .collect()
}
