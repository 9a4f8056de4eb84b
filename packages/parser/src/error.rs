use std::ops::Range;
use thiserror::Error;

pub type ParseResult<T> = Result<T, ParseError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Unexpected token at {pos}: expected {expected}, found {found}")]
    UnexpectedToken {
        pos: usize,
        expected: String,
        found: String,
    },

    #[error("Unexpected end of file at {pos}: expected {expected}")]
    UnexpectedEof { pos: usize, expected: String },

    #[error("Invalid syntax at {pos}: {message}")]
    InvalidSyntax { pos: usize, message: String },

    #[error("Lexer error at {pos}")]
    LexerError { pos: usize },
}

impl ParseError {
    pub fn unexpected_token(pos: usize, expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::UnexpectedToken {
            pos,
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub fn unexpected_eof(pos: usize, expected: impl Into<String>) -> Self {
        Self::UnexpectedEof {
            pos,
            expected: expected.into(),
        }
    }

    pub fn invalid_syntax(pos: usize, message: impl Into<String>) -> Self {
        Self::InvalidSyntax {
            pos,
            message: message.into(),
        }
    }

    pub fn lexer_error(pos: usize) -> Self {
        Self::LexerError { pos }
    }

    /// Byte offset the error points at
    pub fn pos(&self) -> usize {
        match self {
            ParseError::UnexpectedToken { pos, .. }
            | ParseError::UnexpectedEof { pos, .. }
            | ParseError::InvalidSyntax { pos, .. }
            | ParseError::LexerError { pos } => *pos,
        }
    }

    fn label(&self) -> String {
        match self {
            ParseError::UnexpectedToken { expected, .. } => format!("expected {}", expected),
            ParseError::UnexpectedEof { expected, .. } => format!("expected {}", expected),
            ParseError::InvalidSyntax { message, .. } => message.clone(),
            ParseError::LexerError { .. } => "unrecognized character".to_string(),
        }
    }

    /// One-character span at the error position, clamped to the source
    fn span_in(&self, source: &str) -> Range<usize> {
        let start = self.pos().min(source.len());
        let end = source[start..]
            .chars()
            .next()
            .map(|c| start + c.len_utf8())
            .unwrap_or(start);
        start..end
    }
}

/// Pretty-print an error with source context using ariadne
#[cfg(feature = "pretty-errors")]
pub fn format_error(source: &str, filename: &str, error: &ParseError) -> String {
    use ariadne::{Color, Label, Report, ReportKind, Source};

    let span = error.span_in(source);
    let mut output = Vec::new();

    let report = Report::build(ReportKind::Error, filename, span.start)
        .with_message(error.to_string())
        .with_label(
            Label::new((filename, span))
                .with_color(Color::Red)
                .with_message(error.label()),
        )
        .finish();

    if report
        .write((filename, Source::from(source.to_string())), &mut output)
        .is_err()
    {
        return error.to_string();
    }

    String::from_utf8(output).unwrap_or_else(|_| error.to_string())
}

/// Plain rendering used when the `pretty-errors` feature is off
#[cfg(not(feature = "pretty-errors"))]
pub fn format_error(source: &str, filename: &str, error: &ParseError) -> String {
    let span = error.span_in(source);
    let line = source[..span.start].matches('\n').count() + 1;
    format!("{}:{}: {} ({})", filename, line, error, error.label())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pos_is_exposed() {
        let err = ParseError::invalid_syntax(12, "Expected element");
        assert_eq!(err.pos(), 12);
        assert!(err.to_string().contains("Expected element"));
    }

    #[test]
    fn test_format_error_mentions_filename() {
        let source = "const A = () => <div>;";
        let err = ParseError::unexpected_eof(source.len(), "'</div>'");
        let rendered = format_error(source, "App.jsx", &err);

        assert!(rendered.contains("App.jsx"));
        assert!(rendered.contains("'</div>'"));
    }
}
