//! Error types for prompt building and for a whole pipeline run.
//!
//! Stage errors live next to their stage ([`crate::llm::UpstreamError`],
//! [`crate::extract::ExtractError`], [`crate::envelope::SchemaError`]); [`PipelineError`]
//! wraps them so callers can map each kind to a response.

use crate::envelope::SchemaError;
use crate::extract::ExtractError;
use crate::llm::UpstreamError;

/// Local validation failure raised before any network call.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("unsupported {option}: {value}")]
    UnsupportedOption { option: &'static str, value: String },
    #[error("no prompt template for operation {0}")]
    MissingTemplate(String),
}

/// Failure of one pipeline run. Model-reported refusals are not errors; they come back as
/// ordinary envelopes.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Build(#[from] BuildError),
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
    #[error("model reply could not be parsed: {0}")]
    Extraction(#[from] ExtractError),
    #[error("model reply does not match the envelope schema: {0}")]
    Schema(#[from] SchemaError),
}

impl PipelineError {
    /// Short machine-readable kind, used in HTTP error bodies and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::Build(BuildError::UnsupportedOption { .. }) => "unsupported_option",
            PipelineError::Build(BuildError::MissingTemplate(_)) => "missing_template",
            PipelineError::Upstream(_) => "upstream_error",
            PipelineError::Extraction(_) => "extraction_error",
            PipelineError::Schema(_) => "schema_error",
        }
    }

    /// True for errors caused by the caller's input rather than the model or server.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            PipelineError::Build(BuildError::UnsupportedOption { .. })
        )
    }
}
