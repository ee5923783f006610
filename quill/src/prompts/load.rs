//! Load prompt templates from a directory and merge them over the embedded defaults.
//!
//! **Canonical source**: `quill/prompts/operations.yaml`, embedded at compile time. A
//! directory override (argument, `PROMPTS_DIR`, or `./prompts`) may provide a partial
//! `operations.yaml`; entries it defines replace the embedded ones, the rest are kept.

use std::path::{Path, PathBuf};

use super::PromptTemplates;

const EMBED_OPERATIONS: &str = include_str!("../../prompts/operations.yaml");

const OPERATIONS_FILE: &str = "operations.yaml";

/// Default directory name when `PROMPTS_DIR` is not set.
const DEFAULT_PROMPTS_DIR: &str = "prompts";

/// Error when loading templates from a directory.
#[derive(Debug, thiserror::Error)]
pub enum PromptLoadError {
    #[error("prompts directory not found or not readable: {0}")]
    DirNotFound(String),
    #[error("failed to read prompts file {path}: {message}")]
    ReadFile { path: String, message: String },
    #[error("failed to parse YAML in {path}: {message}")]
    ParseYaml { path: String, message: String },
}

fn prompts_dir(dir: Option<&Path>) -> PathBuf {
    dir.map(PathBuf::from).unwrap_or_else(|| {
        std::env::var("PROMPTS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_PROMPTS_DIR))
    })
}

/// Overlays every non-empty entry of `over` onto `base`.
fn merge(mut base: PromptTemplates, over: PromptTemplates) -> PromptTemplates {
    if !over.preamble.trim().is_empty() {
        base.preamble = over.preamble;
    }
    if !over.safety_rules.trim().is_empty() {
        base.safety_rules = over.safety_rules;
    }
    if !over.output_schema.trim().is_empty() {
        base.output_schema = over.output_schema;
    }
    base.operations.extend(over.operations);
    base.hats.extend(over.hats);
    base
}

/// Loads templates from `dir` (or `PROMPTS_DIR`, or `./prompts`).
///
/// A directory without `operations.yaml` yields the embedded defaults. Errors only when the
/// directory is missing, or when the file exists but cannot be read or parsed.
pub fn load(dir: Option<&Path>) -> Result<PromptTemplates, PromptLoadError> {
    let base = prompts_dir(dir);
    if !base.is_dir() {
        return Err(PromptLoadError::DirNotFound(base.display().to_string()));
    }
    let path = base.join(OPERATIONS_FILE);
    let content = match std::fs::read_to_string(&path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Ok(default_from_embedded());
        }
        Err(e) => {
            return Err(PromptLoadError::ReadFile {
                path: path.display().to_string(),
                message: e.to_string(),
            })
        }
    };
    let over = parse_templates(&content, &path.display().to_string())?;
    tracing::debug!(path = %path.display(), "loaded prompt overrides");
    Ok(merge(default_from_embedded(), over))
}

fn parse_templates(content: &str, origin: &str) -> Result<PromptTemplates, PromptLoadError> {
    serde_yaml::from_str(content).map_err(|e| PromptLoadError::ParseYaml {
        path: origin.to_string(),
        message: e.to_string(),
    })
}

/// Templates parsed from the embedded `operations.yaml`. A broken embed is logged at
/// `error!` and yields an empty set, so every build fails with `MissingTemplate`.
pub fn default_from_embedded() -> PromptTemplates {
    parse_templates(EMBED_OPERATIONS, "<embedded operations.yaml>").unwrap_or_else(|e| {
        tracing::error!(error = %e, "embedded prompt templates do not parse");
        PromptTemplates::default()
    })
}

/// Like [`load`], but falls back to the embedded defaults on any error.
pub fn load_or_default(dir: Option<&Path>) -> PromptTemplates {
    load(dir).unwrap_or_else(|e| {
        tracing::debug!(error = %e, "using embedded prompt templates");
        default_from_embedded()
    })
}
