//! Checker diagnostics.

use crate::ast::SourceLocation;
use crate::suggest::did_you_mean;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// One error or warning about a declaration, with an optional one-line fix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub loc: SourceLocation,
    /// Replacement to suggest, rendered as "did you mean HINT?".
    pub hint: Option<String>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>, loc: SourceLocation) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            loc,
            hint: None,
        }
    }

    pub fn warning(message: impl Into<String>, loc: SourceLocation) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            loc,
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// The message and hint without the severity.
    pub fn text(&self) -> String {
        format!("{}{}", self.message, did_you_mean(self.hint.as_deref()))
    }

    /// The text after the column it applies to, the way parse errors read.
    pub fn located_text(&self) -> String {
        format!("column {}: {}", self.loc.column, self.text())
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.text())
    }
}

impl std::error::Error for Diagnostic {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_with_hint() {
        let d = Diagnostic::error("array of void", SourceLocation::new(1, 9))
            .with_hint("array of pointer to void");
        assert_eq!(
            d.to_string(),
            "error: array of void; did you mean array of pointer to void?"
        );
        assert!(d.is_error());
        assert_eq!(d.text(), "array of void; did you mean array of pointer to void?");
        assert_eq!(
            d.located_text(),
            "column 9: array of void; did you mean array of pointer to void?"
        );
    }

    #[test]
    fn test_display_warning() {
        let d = Diagnostic::warning("\"register\" is deprecated since C++11", SourceLocation::default());
        assert_eq!(d.to_string(), "warning: \"register\" is deprecated since C++11");
        assert!(!d.is_error());
    }
}
