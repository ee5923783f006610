//! `[env]` table of `<config home>/<app>/config.toml`.
//!
//! The config home is `$XDG_CONFIG_HOME` when set, otherwise the platform default from
//! [`dirs::config_dir`] (`~/.config` on Linux).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::LoadError;

/// Location of the app's `config.toml`, whether or not it exists.
pub fn config_path(app_name: &str) -> Result<PathBuf, LoadError> {
    let home = std::env::var_os("XDG_CONFIG_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(dirs::config_dir)
        .ok_or_else(|| LoadError::XdgPath("no config home directory".into()))?;
    Ok(home.join(app_name).join("config.toml"))
}

#[derive(serde::Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    env: BTreeMap<String, toml::Value>,
}

/// Reads the `[env]` table from `path`. A missing file is an empty table.
///
/// Strings are taken as-is; integers, floats and booleans are stringified so
/// `LLM_TIMEOUT_SECS = 90` works without quotes. Arrays and tables are rejected.
pub fn read_env_table(path: &Path) -> Result<BTreeMap<String, String>, LoadError> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
        Err(e) => return Err(LoadError::XdgRead(e)),
    };
    let file: ConfigFile = toml::from_str(&content)?;
    file.env
        .into_iter()
        .map(|(k, v)| {
            let s = match v {
                toml::Value::String(s) => s,
                toml::Value::Integer(i) => i.to_string(),
                toml::Value::Float(f) => f.to_string(),
                toml::Value::Boolean(b) => b.to_string(),
                _ => return Err(LoadError::XdgValue(k)),
            };
            Ok((k, s))
        })
        .collect()
}
