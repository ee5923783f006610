//! Prompt Builder: turns a [`TextRequest`] into an [`InstructionSet`].
//!
//! The system message is fixed per operation (preamble, operation block, safety rules,
//! output schema). The caller's text and every caller-supplied parameter go only into the
//! user message, as a JSON object wrapped in [`UNTRUSTED_OPEN`] / [`UNTRUSTED_CLOSE`].
//! Building is pure: no I/O, same output for the same input.

use serde_json::{json, Value};

use crate::error::BuildError;
use crate::message::Message;
use crate::prompts::{default_from_embedded, PromptTemplates};
use crate::request::{Hat, OperationParams, TextRequest};

/// Opening trust-boundary marker of the user payload.
pub const UNTRUSTED_OPEN: &str = "<untrusted_input>";
/// Closing trust-boundary marker of the user payload.
pub const UNTRUSTED_CLOSE: &str = "</untrusted_input>";

/// System instruction and user payload for one request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InstructionSet {
    pub system: String,
    pub user: String,
}

impl InstructionSet {
    /// Ordered messages: system first, then user.
    pub fn messages(&self) -> [Message; 2] {
        [
            Message::system(self.system.clone()),
            Message::user(self.user.clone()),
        ]
    }
}

/// Builds instruction sets from a template set.
#[derive(Clone, Debug)]
pub struct PromptBuilder {
    templates: PromptTemplates,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new(default_from_embedded())
    }
}

impl PromptBuilder {
    pub fn new(templates: PromptTemplates) -> Self {
        Self { templates }
    }

    pub fn templates(&self) -> &PromptTemplates {
        &self.templates
    }

    /// Builds the instruction set for `req`.
    ///
    /// Fails with [`BuildError::UnsupportedOption`] for an unknown hat, and with
    /// [`BuildError::MissingTemplate`] when the template set lacks the operation. Empty text
    /// is accepted.
    pub fn build(&self, req: &TextRequest) -> Result<InstructionSet, BuildError> {
        let op = req.operation();
        let hat = match &req.params {
            OperationParams::SixHats { hat } => Some(hat.parse::<Hat>()?),
            _ => None,
        };

        let block = self
            .templates
            .operation(op)
            .ok_or_else(|| BuildError::MissingTemplate(op.as_str().to_string()))?;
        let block = match hat {
            Some(hat) => {
                let instructions = self
                    .templates
                    .hat(hat)
                    .ok_or_else(|| BuildError::MissingTemplate(format!("hats.{}", hat.key())))?;
                block
                    .replace("{hat}", hat.display_name())
                    .replace("{hat_instructions}", instructions.trim_end())
            }
            None => block.to_string(),
        };

        let system = [
            self.templates.preamble.trim_end(),
            block.trim_end(),
            self.templates.safety_rules.trim_end(),
            self.templates.output_schema.trim_end(),
        ]
        .iter()
        .filter(|s| !s.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("\n\n");

        let user = wrap_untrusted(&payload(req, hat));
        tracing::debug!(
            operation = %op,
            system_len = system.len(),
            user_len = user.len(),
            "built instruction set"
        );
        Ok(InstructionSet { system, user })
    }
}

/// Builds with the embedded templates.
pub fn build_instructions(req: &TextRequest) -> Result<InstructionSet, BuildError> {
    PromptBuilder::default().build(req)
}

fn payload(req: &TextRequest, hat: Option<Hat>) -> Value {
    match &req.params {
        OperationParams::Summarize { percentage } => json!({
            "text": req.text,
            "percentage": percentage,
        }),
        OperationParams::Improve { criterion } => json!({
            "text": req.text,
            "criterion": criterion,
        }),
        OperationParams::Translate { target_language } => json!({
            "text": req.text,
            "target_language": target_language,
        }),
        OperationParams::SixHats { .. } => json!({
            "text": req.text,
            "hat": hat.map(|h| h.display_name()),
        }),
    }
}

/// Serializes `payload` and wraps it in the trust-boundary markers.
///
/// `</` only occurs inside JSON string values here, and `<\/` is an equivalent JSON escape,
/// so the payload can never contain [`UNTRUSTED_CLOSE`].
fn wrap_untrusted(payload: &Value) -> String {
    let body = format!("{:#}", payload).replace("</", "<\\/");
    format!("{}\n{}\n{}", UNTRUSTED_OPEN, body, UNTRUSTED_CLOSE)
}

/// Returns the JSON payload between the markers, if `user` is a wrapped payload.
pub fn unwrap_untrusted(user: &str) -> Option<Value> {
    let inner = user
        .trim()
        .strip_prefix(UNTRUSTED_OPEN)?
        .strip_suffix(UNTRUSTED_CLOSE)?;
    serde_json::from_str(inner).ok()
}
