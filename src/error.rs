//! Error types for robogen library.

use std::io;
use thiserror::Error;

/// Result type alias for robogen operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while rendering documentation.
///
/// Escaping contract violations are not represented here: a backend that
/// receives a structural control byte panics instead, see
/// [`Backend::escape_char`](crate::backend::Backend::escape_char).
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when writing the output stream.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// No backend is registered for the selector.
    #[error("Unknown backend: {0}")]
    UnknownBackend(String),

    /// An envelope operation was called in the wrong state.
    #[error("Cannot {operation} while document is {state}")]
    InvalidState {
        /// Operation that was attempted
        operation: &'static str,
        /// State the writer was in
        state: &'static str,
    },

    /// Section depth is outside `[0, MAX_SECTION_DEPTH)`.
    #[error("Section depth {depth} exceeds maximum of {max}")]
    SectionTooDeep {
        /// Requested depth
        depth: usize,
        /// Exclusive upper bound
        max: usize,
    },

    /// A child section is not deeper than its parent.
    #[error("Section at depth {child} cannot be nested in section at depth {parent}")]
    SectionNesting {
        /// Depth of the enclosing section
        parent: usize,
        /// Depth of the section being opened
        child: usize,
    },

    /// A close did not match the innermost open block.
    #[error("Unbalanced markup: expected to close {expected}, found {found}")]
    Unbalanced {
        /// Block that is innermost open (or "nothing")
        expected: String,
        /// Block the caller tried to close
        found: String,
    },

    /// A block was opened where it cannot appear.
    #[error("Cannot open {block} inside {parent}")]
    Misplaced {
        /// Block the caller tried to open
        block: String,
        /// Innermost open block (or "document body")
        parent: String,
    },

    /// The document was ended with blocks still open.
    #[error("Document ended with unclosed blocks: {}", .0.join(", "))]
    UnclosedBlocks(Vec<String>),

    /// Serialization error for documents or options.
    #[error("JSON error: {0}")]
    Json(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::UnknownBackend("rtf".to_string());
        assert_eq!(err.to_string(), "Unknown backend: rtf");

        let err = Error::SectionTooDeep { depth: 7, max: 7 };
        assert_eq!(err.to_string(), "Section depth 7 exceeds maximum of 7");

        let err = Error::UnclosedBlocks(vec!["item".into(), "paragraph".into()]);
        assert_eq!(
            err.to_string(),
            "Document ended with unclosed blocks: item, paragraph"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::BrokenPipe, "closed");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
    }
}
