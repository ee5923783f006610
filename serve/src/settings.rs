//! Server settings read from the environment.
//!
//! - `QUILL_ADDR` (default `127.0.0.1:8000`)
//! - `CORS_ALLOWED_ORIGINS`: comma-separated origins (default: the editor front-ends)
//! - `SERVE_MAX_BODY_BYTES` (default 1 MiB)

pub const DEFAULT_ADDR: &str = "127.0.0.1:8000";
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

pub const DEFAULT_CORS_ORIGINS: [&str; 6] = [
    "http://localhost:5173",
    "http://localhost:8000",
    "http://localhost:4173",
    "http://127.0.0.1:5173",
    "https://gammardx.github.io",
    "http://padova.zucchetti.it:14000",
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServeSettings {
    pub addr: String,
    pub cors_origins: Vec<String>,
    pub max_body_bytes: usize,
}

impl Default for ServeSettings {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_string(),
            cors_origins: DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl ServeSettings {
    /// Unset or unparsable values fall back to [`Default`].
    pub fn from_env() -> Self {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    pub fn from_lookup<F>(get: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let default = Self::default();
        let cors_origins = get("CORS_ALLOWED_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect::<Vec<_>>()
            })
            .filter(|list| !list.is_empty())
            .unwrap_or(default.cors_origins);
        Self {
            addr: get("QUILL_ADDR")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(default.addr),
            cors_origins,
            max_body_bytes: get("SERVE_MAX_BODY_BYTES")
                .and_then(|s| s.trim().parse().ok())
                .filter(|n: &usize| *n > 0)
                .unwrap_or(default.max_body_bytes),
        }
    }
}
