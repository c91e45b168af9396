//! Errors reported for a command line.

use crate::ast::SourceLocation;
use crate::check::Diagnostic;
use crate::lang::Lang;
use crate::parser::ParseError;
use crate::suggest::{self, did_you_mean};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CdeclError {
    /// Lexical, syntax, or type-bit errors.
    #[error("{0}")]
    Parse(#[from] ParseError),

    /// A declaration that parses but is not legal in the current language.
    #[error("{}", .0.located_text())]
    Semantic(Diagnostic),

    #[error("\"{name}\": type redefinition")]
    TypedefRedefinition {
        name: String,
        location: SourceLocation,
    },

    #[error("\"{name}\": unknown set option{}", did_you_mean(.hint.as_deref()))]
    UnknownOption { name: String, hint: Option<String> },

    #[error("\"{name}\": unknown language{}", did_you_mean(.hint.as_deref()))]
    UnknownLang { name: String, hint: Option<String> },

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// A failing line of a configuration file.
    #[error("\"{path}\", line {line}: {source}")]
    Config {
        path: String,
        line: usize,
        source: Box<CdeclError>,
    },
}

impl CdeclError {
    /// An unknown language name, with the closest known names as a hint.
    pub fn unknown_lang(name: &str) -> Self {
        let lower = name.to_ascii_lowercase();
        CdeclError::UnknownLang {
            hint: suggest::hint(&lower, Lang::names()),
            name: name.to_string(),
        }
    }

    /// Where in the command line the error was found, if anywhere.
    pub fn location(&self) -> Option<SourceLocation> {
        match self {
            CdeclError::Parse(e) => Some(e.location),
            CdeclError::Semantic(d) => Some(d.loc),
            CdeclError::TypedefRedefinition { location, .. } => Some(*location),
            _ => None,
        }
    }
}
