//! Load configuration from the XDG `config.toml` and a project `.env`, then apply it to the
//! process environment with priority: **existing env > .env > XDG**.
//!
//! Call [`load_and_apply`] once at startup, before any settings are read from the
//! environment and before other threads start.

mod dotenv;
mod xdg_toml;

use std::collections::BTreeMap;
use std::path::Path;

use thiserror::Error;

pub use xdg_toml::config_path;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("xdg config path: {0}")]
    XdgPath(String),
    #[error("read xdg config: {0}")]
    XdgRead(std::io::Error),
    #[error("parse xdg toml: {0}")]
    XdgParse(#[from] toml::de::Error),
    #[error("xdg config [env].{0} must be a string, number or boolean")]
    XdgValue(String),
    #[error("read .env: {0}")]
    DotenvRead(std::io::Error),
}

/// Where an applied value came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Source {
    Dotenv,
    Xdg,
}

/// Outcome of [`load_and_apply`]: keys that were set, and keys skipped because the process
/// environment already had them.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub applied: BTreeMap<String, Source>,
    pub kept_from_env: Vec<String>,
}

/// Chooses a value for every key in `dotenv` or `xdg` that `is_set` reports as absent.
fn resolve(
    dotenv: BTreeMap<String, String>,
    xdg: BTreeMap<String, String>,
    is_set: impl Fn(&str) -> bool,
) -> (BTreeMap<String, (String, Source)>, Vec<String>) {
    let mut chosen: BTreeMap<String, (String, Source)> = xdg
        .into_iter()
        .map(|(k, v)| (k, (v, Source::Xdg)))
        .collect();
    for (k, v) in dotenv {
        chosen.insert(k, (v, Source::Dotenv));
    }
    let mut kept = Vec::new();
    chosen.retain(|k, _| {
        if is_set(k) {
            kept.push(k.clone());
            false
        } else {
            true
        }
    });
    (chosen, kept)
}

/// Loads `$XDG_CONFIG_HOME/<app_name>/config.toml` (`[env]` table) and `.env`, and sets each
/// key that is not already in the process environment.
///
/// * `app_name`: directory under the config home, e.g. `"quill"`.
/// * `override_dir`: directory holding `.env`; defaults to the current directory.
pub fn load_and_apply(app_name: &str, override_dir: Option<&Path>) -> Result<LoadReport, LoadError> {
    let xdg = xdg_toml::read_env_table(&config_path(app_name)?)?;
    let dotenv = dotenv::load(override_dir).map_err(LoadError::DotenvRead)?;

    let (chosen, kept_from_env) = resolve(dotenv, xdg, |k| std::env::var_os(k).is_some());
    let mut report = LoadReport {
        kept_from_env,
        ..LoadReport::default()
    };
    for (key, (value, source)) in chosen {
        std::env::set_var(&key, value);
        report.applied.insert(key, source);
    }
    tracing::debug!(
        applied = report.applied.len(),
        kept = report.kept_from_env.len(),
        "configuration applied"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn dotenv_beats_xdg() {
        let (chosen, kept) = resolve(
            map(&[("LLM_MODEL", "from_dotenv")]),
            map(&[("LLM_MODEL", "from_xdg"), ("LLM_TIMEOUT_SECS", "90")]),
            |_| false,
        );
        assert!(kept.is_empty());
        assert_eq!(chosen["LLM_MODEL"], ("from_dotenv".to_string(), Source::Dotenv));
        assert_eq!(chosen["LLM_TIMEOUT_SECS"], ("90".to_string(), Source::Xdg));
    }

    #[test]
    fn existing_env_beats_both() {
        let (chosen, kept) = resolve(
            map(&[("LLM_API_KEY", "a")]),
            map(&[("LLM_API_KEY", "b"), ("LLM_MODEL", "m")]),
            |k| k == "LLM_API_KEY",
        );
        assert_eq!(kept, vec!["LLM_API_KEY".to_string()]);
        assert_eq!(chosen.len(), 1);
        assert!(chosen.contains_key("LLM_MODEL"));
    }

    #[test]
    fn load_and_apply_sets_missing_and_keeps_existing() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(".env"),
            "QUILL_CONFIG_TEST_NEW=from_dotenv\nQUILL_CONFIG_TEST_EXISTING=from_dotenv\n",
        )
        .unwrap();
        std::env::set_var("QUILL_CONFIG_TEST_EXISTING", "from_env");
        std::env::remove_var("QUILL_CONFIG_TEST_NEW");

        let report =
            load_and_apply("quill-config-test-nonexistent-app", Some(dir.path())).unwrap();

        assert_eq!(
            std::env::var("QUILL_CONFIG_TEST_NEW").as_deref(),
            Ok("from_dotenv")
        );
        assert_eq!(
            std::env::var("QUILL_CONFIG_TEST_EXISTING").as_deref(),
            Ok("from_env")
        );
        assert_eq!(
            report.applied.get("QUILL_CONFIG_TEST_NEW"),
            Some(&Source::Dotenv)
        );
        assert!(report
            .kept_from_env
            .contains(&"QUILL_CONFIG_TEST_EXISTING".to_string()));

        std::env::remove_var("QUILL_CONFIG_TEST_NEW");
        std::env::remove_var("QUILL_CONFIG_TEST_EXISTING");
    }

    #[test]
    fn nothing_to_load_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let report =
            load_and_apply("quill-config-test-nonexistent-app", Some(dir.path())).unwrap();
        assert!(report.applied.is_empty());
    }
}
