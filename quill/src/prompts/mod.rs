//! Prompt templates: the fixed system-side text for each operation.
//!
//! Default text lives in `quill/prompts/operations.yaml` and is embedded at compile time;
//! see [`load`], [`load_or_default`] and [`default_from_embedded`].

mod load;

pub use load::{default_from_embedded, load, load_or_default, PromptLoadError};

use std::collections::HashMap;

use serde::Deserialize;

use crate::request::{Hat, Operation};

/// Parsed `operations.yaml`.
///
/// Operation blocks are keyed by [`Operation::as_str`]; hat blocks by [`Hat::key`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PromptTemplates {
    #[serde(default)]
    pub preamble: String,
    #[serde(default)]
    pub operations: HashMap<String, String>,
    #[serde(default)]
    pub hats: HashMap<String, String>,
    #[serde(default)]
    pub safety_rules: String,
    #[serde(default)]
    pub output_schema: String,
}

impl PromptTemplates {
    pub fn operation(&self, op: Operation) -> Option<&str> {
        self.operations.get(op.as_str()).map(String::as_str)
    }

    pub fn hat(&self, hat: Hat) -> Option<&str> {
        self.hats.get(hat.key()).map(String::as_str)
    }

    /// Names of operations and hats that have no template. Empty for a complete set.
    pub fn missing(&self) -> Vec<String> {
        let ops = Operation::ALL
            .iter()
            .filter(|op| self.operation(**op).is_none())
            .map(|op| op.as_str().to_string());
        let hats = Hat::ALL
            .iter()
            .filter(|h| self.hat(**h).is_none())
            .map(|h| format!("hats.{}", h.key()));
        ops.chain(hats).collect()
    }
}
