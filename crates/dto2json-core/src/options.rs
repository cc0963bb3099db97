//! Parser configuration.

use serde::{Deserialize, Serialize};

/// Default recursion limit for nested literals.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// How the splitter treats bracket kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BracketMode {
    /// One depth counter for `()[]{}`; any closer decrements it and nothing fails.
    #[default]
    Lenient,
    /// A stack of opener kinds; a closer of the wrong kind is an error.
    Strict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    pub max_depth: usize,
    pub bracket_mode: BracketMode,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            bracket_mode: BracketMode::Lenient,
        }
    }
}

impl ParseOptions {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_bracket_mode(mut self, bracket_mode: BracketMode) -> Self {
        self.bracket_mode = bracket_mode;
        self
    }
}
