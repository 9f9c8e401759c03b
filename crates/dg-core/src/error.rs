use crate::types::SourceSpan;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{code}: {message}")]
pub struct DialogueError {
    pub code: String,
    pub message: String,
    pub span: Option<SourceSpan>,
}

impl DialogueError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            span: None,
        }
    }

    pub fn with_span(
        code: impl Into<String>,
        message: impl Into<String>,
        span: SourceSpan,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            span: Some(span),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SourceLocation;

    #[test]
    fn display_joins_code_and_message() {
        let error = DialogueError::new("DIALOGUE_SCRIPT_EMPTY", "Script has no entries.");
        assert_eq!(
            error.to_string(),
            "DIALOGUE_SCRIPT_EMPTY: Script has no entries."
        );
        assert!(error.span.is_none());
    }

    #[test]
    fn with_span_keeps_location() {
        let span = SourceSpan {
            start: SourceLocation { line: 3, column: 5 },
            end: SourceLocation { line: 3, column: 20 },
        };
        let error = DialogueError::with_span("COMPILE_ENTRY", "bad entry", span.clone());
        assert_eq!(error.span, Some(span));
    }
}
