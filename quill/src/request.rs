//! Operations, their typed parameters, and the JSON request bodies accepted by the HTTP layer.
//!
//! A [`TextRequest`] is the input of one pipeline run: the caller's text plus the
//! [`OperationParams`] of exactly one [`Operation`]. Request bodies deserialize into
//! `*Body` structs whose field names match the wire format (`targetLanguage` is camelCase).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BuildError;

/// One of the four supported text operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    Summarize,
    Improve,
    Translate,
    SixHats,
}

impl Operation {
    /// All operations, in route order.
    pub const ALL: [Operation; 4] = [
        Operation::Summarize,
        Operation::Improve,
        Operation::Translate,
        Operation::SixHats,
    ];

    /// Route slug, e.g. `six-hats` (used in `/llm/<slug>` and in log spans).
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Summarize => "summarize",
            Operation::Improve => "improve",
            Operation::Translate => "translate",
            Operation::SixHats => "six-hats",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "summarize" => Ok(Self::Summarize),
            "improve" => Ok(Self::Improve),
            "translate" => Ok(Self::Translate),
            "six-hats" | "six_hats" | "sixhats" => Ok(Self::SixHats),
            _ => Err(format!(
                "unknown operation: {} (use summarize, improve, translate, or six-hats)",
                s
            )),
        }
    }
}

/// Six-thinking-hats perspective.
///
/// Parsed case-insensitively from either the English colour or the Italian label the
/// front-end sends (`"Bianco"`, `"rosso"`, ...).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Hat {
    White,
    Red,
    Black,
    Yellow,
    Green,
    Blue,
}

impl Hat {
    pub const ALL: [Hat; 6] = [
        Hat::White,
        Hat::Red,
        Hat::Black,
        Hat::Yellow,
        Hat::Green,
        Hat::Blue,
    ];

    /// Lowercase colour key used to look up the hat's instruction block in the templates.
    pub fn key(&self) -> &'static str {
        match self {
            Hat::White => "white",
            Hat::Red => "red",
            Hat::Black => "black",
            Hat::Yellow => "yellow",
            Hat::Green => "green",
            Hat::Blue => "blue",
        }
    }

    /// Label in the default product language, as shown to users.
    pub fn display_name(&self) -> &'static str {
        match self {
            Hat::White => "Bianco",
            Hat::Red => "Rosso",
            Hat::Black => "Nero",
            Hat::Yellow => "Giallo",
            Hat::Green => "Verde",
            Hat::Blue => "Blu",
        }
    }
}

impl fmt::Display for Hat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Hat {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "white" | "bianco" => Ok(Hat::White),
            "red" | "rosso" => Ok(Hat::Red),
            "black" | "nero" => Ok(Hat::Black),
            "yellow" | "giallo" => Ok(Hat::Yellow),
            "green" | "verde" => Ok(Hat::Green),
            "blue" | "blu" => Ok(Hat::Blue),
            _ => Err(BuildError::UnsupportedOption {
                option: "hat",
                value: s.to_string(),
            }),
        }
    }
}

/// Operation-specific parameter. `hat` stays a raw string until the prompt builder validates it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OperationParams {
    Summarize { percentage: u32 },
    Improve { criterion: String },
    Translate { target_language: String },
    SixHats { hat: String },
}

/// Input of one pipeline run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextRequest {
    /// Untrusted user text. May be empty; the model classifies that as `EMPTY_TEXT`.
    pub text: String,
    pub params: OperationParams,
}

impl TextRequest {
    pub fn summarize(text: impl Into<String>, percentage: u32) -> Self {
        Self {
            text: text.into(),
            params: OperationParams::Summarize { percentage },
        }
    }

    pub fn improve(text: impl Into<String>, criterion: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            params: OperationParams::Improve {
                criterion: criterion.into(),
            },
        }
    }

    pub fn translate(text: impl Into<String>, target_language: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            params: OperationParams::Translate {
                target_language: target_language.into(),
            },
        }
    }

    pub fn six_hats(text: impl Into<String>, hat: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            params: OperationParams::SixHats { hat: hat.into() },
        }
    }

    pub fn operation(&self) -> Operation {
        match self.params {
            OperationParams::Summarize { .. } => Operation::Summarize,
            OperationParams::Improve { .. } => Operation::Improve,
            OperationParams::Translate { .. } => Operation::Translate,
            OperationParams::SixHats { .. } => Operation::SixHats,
        }
    }
}

/// `POST /llm/summarize` body.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SummarizeBody {
    pub text: String,
    pub percentage: u32,
}

/// `POST /llm/improve` body.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ImproveBody {
    pub text: String,
    pub criterion: String,
}

/// `POST /llm/translate` body.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TranslateBody {
    pub text: String,
    #[serde(rename = "targetLanguage")]
    pub target_language: String,
}

/// `POST /llm/six-hats` body.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SixHatsBody {
    pub text: String,
    pub hat: String,
}

impl From<SummarizeBody> for TextRequest {
    fn from(b: SummarizeBody) -> Self {
        TextRequest::summarize(b.text, b.percentage)
    }
}

impl From<ImproveBody> for TextRequest {
    fn from(b: ImproveBody) -> Self {
        TextRequest::improve(b.text, b.criterion)
    }
}

impl From<TranslateBody> for TextRequest {
    fn from(b: TranslateBody) -> Self {
        TextRequest::translate(b.text, b.target_language)
    }
}

impl From<SixHatsBody> for TextRequest {
    fn from(b: SixHatsBody) -> Self {
        TextRequest::six_hats(b.text, b.hat)
    }
}
