//! Request pipeline: build → invoke → extract → validate.

use tracing::Instrument;

use crate::envelope::{validate, ResponseEnvelope};
use crate::error::PipelineError;
use crate::extract::Extractor;
use crate::llm::{LlmError, LlmSettings, ModelInvoker};
use crate::prompt::PromptBuilder;
use crate::request::TextRequest;

/// Runs one [`TextRequest`] end to end. Cheap to clone; share one per process.
#[derive(Clone)]
pub struct Pipeline {
    builder: PromptBuilder,
    invoker: ModelInvoker,
    extractor: Extractor,
}

impl Pipeline {
    pub fn new(builder: PromptBuilder, invoker: ModelInvoker) -> Self {
        Self {
            builder,
            invoker,
            extractor: Extractor::default(),
        }
    }

    /// Embedded templates and one chat-completions client per configured provider.
    pub fn from_settings(settings: &LlmSettings) -> Result<Self, LlmError> {
        Ok(Self::new(
            PromptBuilder::default(),
            ModelInvoker::from_settings(settings)?,
        ))
    }

    pub fn with_extractor(mut self, extractor: Extractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn builder(&self) -> &PromptBuilder {
        &self.builder
    }

    /// Refusals and invalid-input verdicts are returned as envelopes, not errors.
    pub async fn run(&self, req: &TextRequest) -> Result<ResponseEnvelope, PipelineError> {
        let op = req.operation();
        let span = tracing::info_span!("pipeline", operation = op.as_str());
        async move {
            let instructions = self.builder.build(req)?;
            tracing::info!(text_len = req.text.len(), "request started");

            let raw = self.invoker.invoke(&instructions.messages()).await?;
            let obj = self.extractor.extract(&raw).map_err(|e| {
                tracing::warn!(error = %e, reply_len = raw.len(), "model reply not parseable");
                e
            })?;
            tracing::debug!(keys = obj.len(), "extracted reply object");

            let envelope = validate(&obj)?;
            tracing::info!(
                status = %envelope.outcome.status,
                code = %envelope.outcome.code,
                "request finished"
            );
            Ok(envelope)
        }
        .instrument(span)
        .await
    }
}
