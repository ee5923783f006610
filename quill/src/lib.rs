//! # Quill
//!
//! Text-transformation relay between an editor front-end and an OpenAI-compatible model.
//! Each request goes through four stages:
//!
//! 1. [`prompt`]: the Prompt Builder turns a [`TextRequest`] into an [`InstructionSet`]. The
//!    system message is fixed per operation; the caller's text travels only in the user
//!    message, wrapped in `<untrusted_input>` markers.
//! 2. [`llm`]: the [`ModelInvoker`] sends the messages to each configured provider in order
//!    and stops at the first reply.
//! 3. [`extract`]: the [`Extractor`] pulls one JSON object out of the reply text, tolerating
//!    markdown fences, surrounding prose, and raw control characters inside strings.
//! 4. [`envelope`]: [`validate`] checks the object against the `{outcome, data}` schema.
//!
//! [`Pipeline`] chains the stages. Refusals and invalid-input verdicts produced by the model
//! are ordinary [`ResponseEnvelope`]s; [`PipelineError`] is reserved for local validation,
//! upstream, and parsing failures.
//!
//! ## Operations
//!
//! - `summarize` (percentage), `improve` (criterion), `translate` (target language),
//!   `six-hats` (one of six fixed [`Hat`]s).
//!
//! ```rust,no_run
//! use quill::{LlmSettings, Pipeline, TextRequest};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let pipeline = Pipeline::from_settings(&LlmSettings::from_env()?)?;
//! let envelope = pipeline.run(&TextRequest::summarize("Il gatto nero dorme.", 50)).await?;
//! println!("{}", serde_json::to_string(&envelope)?);
//! # Ok(())
//! # }
//! ```

pub mod envelope;
pub mod error;
pub mod extract;
pub mod llm;
pub mod message;
pub mod pipeline;
pub mod prompt;
pub mod prompts;
pub mod request;

pub use envelope::{validate, EnvelopeData, Outcome, OutcomeKind, ResponseEnvelope, SchemaError};
pub use error::{BuildError, PipelineError};
pub use extract::{extract_json, ExtractError, Extractor};
pub use llm::{
    ChatCompletionsClient, LlmClient, LlmError, LlmSettings, MockLlm, MockReply, ModelInvoker,
    Provider, SettingsError, UpstreamError,
};
pub use message::Message;
pub use pipeline::Pipeline;
pub use prompt::{build_instructions, InstructionSet, PromptBuilder};
pub use prompts::{PromptLoadError, PromptTemplates};
pub use request::{
    Hat, ImproveBody, Operation, OperationParams, SixHatsBody, SummarizeBody, TextRequest,
    TranslateBody,
};
