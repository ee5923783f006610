//! `quill run`: one pipeline run from the terminal.

use std::io::Read;
use std::path::{Path, PathBuf};

use quill::prompts::{load, load_or_default};
use quill::{
    BuildError, InstructionSet, LlmError, LlmSettings, ModelInvoker, Operation, Pipeline,
    PipelineError, PromptBuilder, PromptLoadError, SettingsError, TextRequest,
};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("--{flag} is required for {operation}")]
    MissingParam {
        flag: &'static str,
        operation: Operation,
    },
    #[error("--{flag} does not apply to {operation}")]
    UnexpectedParam {
        flag: &'static str,
        operation: Operation,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Prompts(#[from] PromptLoadError),
    #[error(transparent)]
    Build(#[from] BuildError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Client(#[from] LlmError),
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    #[error("serialize output: {0}")]
    Output(#[from] serde_json::Error),
}

/// Operation parameters as given on the command line.
#[derive(Debug, Default, Clone)]
pub struct RunParams {
    pub percentage: Option<u32>,
    pub criterion: Option<String>,
    pub target_language: Option<String>,
    pub hat: Option<String>,
}

impl RunParams {
    /// Builds the request for `operation`; exactly the operation's own flag must be set.
    pub fn into_request(self, operation: Operation, text: String) -> Result<TextRequest, RunError> {
        let given = [
            ("percentage", self.percentage.is_some(), Operation::Summarize),
            ("criterion", self.criterion.is_some(), Operation::Improve),
            ("target-language", self.target_language.is_some(), Operation::Translate),
            ("hat", self.hat.is_some(), Operation::SixHats),
        ];
        if let Some(&(flag, _, _)) = given
            .iter()
            .find(|(_, set, owner)| *set && *owner != operation)
        {
            return Err(RunError::UnexpectedParam { flag, operation });
        }

        let missing = |flag| RunError::MissingParam { flag, operation };
        Ok(match operation {
            Operation::Summarize => {
                TextRequest::summarize(text, self.percentage.ok_or_else(|| missing("percentage"))?)
            }
            Operation::Improve => {
                TextRequest::improve(text, self.criterion.ok_or_else(|| missing("criterion"))?)
            }
            Operation::Translate => TextRequest::translate(
                text,
                self.target_language
                    .ok_or_else(|| missing("target-language"))?,
            ),
            Operation::SixHats => {
                TextRequest::six_hats(text, self.hat.ok_or_else(|| missing("hat"))?)
            }
        })
    }
}

/// Joins positional words, or reads all of stdin when there are none. One trailing newline
/// from stdin is dropped.
pub fn read_text(words: &[String], stdin: impl Read) -> Result<String, RunError> {
    if !words.is_empty() {
        return Ok(words.join(" "));
    }
    let mut text = String::new();
    let mut stdin = stdin;
    stdin.read_to_string(&mut text)?;
    if text.ends_with('\n') {
        text.pop();
        if text.ends_with('\r') {
            text.pop();
        }
    }
    Ok(text)
}

/// Explicit directory must load; otherwise `PROMPTS_DIR` / `./prompts` with embedded fallback.
pub fn prompt_builder(dir: Option<&Path>) -> Result<PromptBuilder, RunError> {
    let templates = match dir {
        Some(dir) => load(Some(dir))?,
        None => load_or_default(None),
    };
    Ok(PromptBuilder::new(templates))
}

pub fn dry_run_json(set: &InstructionSet) -> serde_json::Value {
    json!({"system": set.system, "user": set.user})
}

/// Writes JSON to stdout or to the given file. When pretty is true, multi-line; else one line.
pub fn write_json_output(
    value: &serde_json::Value,
    file: Option<&Path>,
    pretty: bool,
) -> Result<(), RunError> {
    let s = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    match file {
        Some(path) => std::fs::write(path, format!("{}\n", s))?,
        None => println!("{}", s),
    }
    Ok(())
}

pub struct RunOptions {
    pub operation: Operation,
    pub params: RunParams,
    pub text: String,
    pub dry_run: bool,
    pub pretty: bool,
    pub prompts_dir: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

/// Builds the request and either prints the instruction set (`dry_run`) or runs the pipeline
/// and prints the envelope.
pub async fn execute(opts: RunOptions) -> Result<(), RunError> {
    let req = opts.params.into_request(opts.operation, opts.text)?;
    let builder = prompt_builder(opts.prompts_dir.as_deref())?;

    let value = if opts.dry_run {
        dry_run_json(&builder.build(&req)?)
    } else {
        let settings = LlmSettings::from_env()?;
        let pipeline = Pipeline::new(builder, ModelInvoker::from_settings(&settings)?);
        serde_json::to_value(pipeline.run(&req).await?)?
    };
    write_json_output(&value, opts.output.as_deref(), opts.pretty)
}
