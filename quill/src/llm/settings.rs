//! Model settings read from the process environment.
//!
//! - `LLM_API_URL`, `LLM_MODEL`, `LLM_API_KEY`: primary provider (required)
//! - `LLM_FALLBACK_API_URL` (default [`DEFAULT_FALLBACK_URL`])
//! - `LLM_FALLBACK_MODEL` (default [`DEFAULT_FALLBACK_MODEL`])
//! - `LLM_FALLBACK_API_KEY` (default: the primary key)
//! - `LLM_FALLBACK_DISABLED` (`1`/`true`/`yes`: primary only)
//! - `LLM_TIMEOUT_SECS` (default 60), `LLM_TEMPERATURE` (default 0.1)

use std::time::Duration;

use super::Provider;

pub const DEFAULT_FALLBACK_URL: &str = "http://padova.zucchetti.it:14000/v1/chat/completions";
pub const DEFAULT_FALLBACK_MODEL: &str = "gpt-oss:20b";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_TEMPERATURE: f32 = 0.1;

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("missing required setting {0}")]
    Missing(&'static str),
    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

/// Ordered providers plus the per-call request settings shared by all of them.
#[derive(Clone, Debug)]
pub struct LlmSettings {
    /// Tried in order; the first success wins.
    pub providers: Vec<Provider>,
    /// Upper bound for one call, connect through last byte.
    pub timeout: Duration,
    pub temperature: f32,
}

impl LlmSettings {
    /// Primary provider plus the default fallback, reusing the primary credential.
    pub fn with_default_fallback(
        url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        let api_key = api_key.into();
        Self {
            providers: vec![
                Provider {
                    name: "primary".into(),
                    url: url.into(),
                    model: model.into(),
                    api_key: api_key.clone(),
                },
                Provider {
                    name: "fallback".into(),
                    url: DEFAULT_FALLBACK_URL.into(),
                    model: DEFAULT_FALLBACK_MODEL.into(),
                    api_key,
                },
            ],
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Builds settings from an arbitrary key lookup (the environment in production).
    pub fn from_lookup<F>(get: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            get(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or(SettingsError::Missing(key))
        };
        let url = required("LLM_API_URL")?;
        let model = required("LLM_MODEL")?;
        let api_key = required("LLM_API_KEY")?;

        let mut providers = vec![Provider {
            name: "primary".into(),
            url,
            model,
            api_key: api_key.clone(),
        }];

        let fallback_disabled = matches!(
            get("LLM_FALLBACK_DISABLED").as_deref().map(str::trim),
            Some("1") | Some("true") | Some("yes")
        );
        if !fallback_disabled {
            providers.push(Provider {
                name: "fallback".into(),
                url: get("LLM_FALLBACK_API_URL").unwrap_or_else(|| DEFAULT_FALLBACK_URL.into()),
                model: get("LLM_FALLBACK_MODEL").unwrap_or_else(|| DEFAULT_FALLBACK_MODEL.into()),
                api_key: get("LLM_FALLBACK_API_KEY").unwrap_or(api_key),
            });
        }

        let timeout = match get("LLM_TIMEOUT_SECS") {
            Some(v) => match v.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(SettingsError::Invalid {
                        key: "LLM_TIMEOUT_SECS",
                        value: v,
                    })
                }
            },
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };
        let temperature = match get("LLM_TEMPERATURE") {
            Some(v) => match v.trim().parse::<f32>() {
                Ok(t) if (0.0..=2.0).contains(&t) => t,
                _ => {
                    return Err(SettingsError::Invalid {
                        key: "LLM_TEMPERATURE",
                        value: v,
                    })
                }
            },
            None => DEFAULT_TEMPERATURE,
        };

        Ok(Self {
            providers,
            timeout,
            temperature,
        })
    }
}
