// ABOUTME: Error types for lexing, parsing, and evaluation failures

use thiserror::Error;

/// The two user-visible error kinds: parser errors and runtime errors.
/// Control-flow signals (Return/Break/Continue) are a distinct, non-error
/// channel — see [`crate::eval::Unwind`] — and never appear here.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NyxError {
    #[error("Parser error at line {line}: {message}")]
    Parser { message: String, line: usize },

    #[error("Runtime error at line {line}: {message}")]
    Runtime { message: String, line: usize },
}

impl NyxError {
    pub fn parser(message: impl Into<String>, line: usize) -> Self {
        NyxError::Parser {
            message: message.into(),
            line,
        }
    }

    pub fn runtime(message: impl Into<String>, line: usize) -> Self {
        NyxError::Runtime {
            message: message.into(),
            line,
        }
    }

    pub fn line(&self) -> usize {
        match self {
            NyxError::Parser { line, .. } | NyxError::Runtime { line, .. } => *line,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            NyxError::Parser { message, .. } | NyxError::Runtime { message, .. } => message,
        }
    }

    /// The front-end rendering shown to the user: `Runtime Error: <message>`
    /// with `at line N` only when N > 0, and `Parser error at line N:
    /// <message>` unconditionally.
    pub fn display_for_cli(&self) -> String {
        match self {
            NyxError::Parser { message, line } => format!("Parser error at line {line}: {message}"),
            NyxError::Runtime { message, line } if *line > 0 => {
                format!("Runtime Error: {message} at line {line}")
            }
            NyxError::Runtime { message, .. } => format!("Runtime Error: {message}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runtime_error_omits_line_suffix_when_line_is_zero() {
        let e = NyxError::runtime("boom", 0);
        assert_eq!(e.display_for_cli(), "Runtime Error: boom");
    }

    #[test]
    fn runtime_error_includes_line_suffix_when_present() {
        let e = NyxError::runtime("boom", 7);
        assert_eq!(e.display_for_cli(), "Runtime Error: boom at line 7");
    }

    #[test]
    fn parser_error_formats_with_line() {
        let e = NyxError::parser("unexpected token", 3);
        assert_eq!(e.display_for_cli(), "Parser error at line 3: unexpected token");
    }
}
