//! Error types for parsing and dispatch.
//!
//! [`ParseError`] is what a single dialect parser reports. [`DispatchError`] is the
//! uniform taxonomy surfaced by the registry, whichever dialect failed.

use crate::registry::Language;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failures raised while decomposing a literal with one dialect's grammar.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The input was blank after trimming.
    #[error("input cannot be empty")]
    Empty,

    /// A `key = value` segment had no separator.
    #[error("invalid field format: {segment}")]
    MissingSeparator { segment: String },

    /// A `key = value` segment had nothing before the separator.
    #[error("empty field name in: {segment}")]
    EmptyKey { segment: String },

    /// An opening or closing delimiter could not be located in the fragment.
    #[error("missing '{delimiter}' in: {fragment}")]
    MissingDelimiter { delimiter: char, fragment: String },

    /// Strict bracket mode only: a closer did not match the innermost opener.
    #[error("mismatched bracket at byte {offset}: expected '{expected}', found '{found}'")]
    MismatchedBracket {
        expected: char,
        found: char,
        offset: usize,
    },

    /// Strict bracket mode only: the fragment ended with unclosed openers.
    #[error("unclosed '{open}'")]
    UnclosedBracket { open: char },

    /// A numeric-shaped literal could not be converted.
    #[error("invalid numeric literal '{literal}': {reason}")]
    InvalidNumber { literal: String, reason: String },

    /// A dictionary entry matched none of the accepted shapes.
    #[error("invalid map entry format: {entry}")]
    InvalidEntry { entry: String },

    /// Nesting exceeded the configured recursion limit.
    #[error("nesting deeper than {limit} levels")]
    DepthExceeded { limit: usize },
}

/// Convenience alias used by the dialect parsers.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Errors returned by [`crate::Registry::dispatch`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DispatchError {
    /// The language tag is not one the registry knows.
    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// The tag is known but the input does not look like that dialect at all.
    #[error("input cannot be parsed as {language}")]
    UnsupportedSyntax { language: Language },

    /// The dialect accepted the outer shape but decomposition failed.
    #[error("failed to parse {language} input: {source}")]
    MalformedInput {
        language: Language,
        #[source]
        source: ParseError,
    },

    /// The input was blank after trimming.
    #[error("input cannot be empty")]
    EmptyInput,
}

impl DispatchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DispatchError::UnsupportedLanguage(_) => ErrorKind::UnsupportedLanguage,
            DispatchError::UnsupportedSyntax { .. } => ErrorKind::UnsupportedSyntax,
            DispatchError::MalformedInput { .. } => ErrorKind::MalformedInput,
            DispatchError::EmptyInput => ErrorKind::EmptyInput,
        }
    }
}

/// Tag-only view of [`DispatchError`], for boundary layers that map kinds to
/// status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    UnsupportedLanguage,
    UnsupportedSyntax,
    MalformedInput,
    EmptyInput,
}
