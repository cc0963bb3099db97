//! Language selection and dispatch.
//!
//! [`Registry`] holds one [`DialectParser`] per [`Language`]. [`Registry::dispatch`]
//! is the only place a dialect is chosen: it resolves the tag, runs the dialect's
//! `supports` pre-filter and only then calls `parse`, mapping every failure onto
//! [`DispatchError`]. It never retries with another dialect.

use crate::csharp::CSharpParser;
use crate::error::{DispatchError, ParseError};
use crate::java::JavaParser;
use crate::kotlin::KotlinParser;
use crate::options::ParseOptions;
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use tracing::debug;

/// Supported source dialects. Tags are matched case-sensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "JAVA")]
    Java,
    #[serde(rename = "KOTLIN")]
    Kotlin,
    #[serde(rename = "CSHARP")]
    CSharp,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::Java, Language::Kotlin, Language::CSharp];

    pub fn tag(self) -> &'static str {
        match self {
            Language::Java => "JAVA",
            Language::Kotlin => "KOTLIN",
            Language::CSharp => "CSHARP",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Language> {
        Language::ALL.into_iter().find(|lang| lang.tag() == tag)
    }

    fn index(self) -> usize {
        match self {
            Language::Java => 0,
            Language::Kotlin => 1,
            Language::CSharp => 2,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Language {
    type Err = DispatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::from_tag(s).ok_or_else(|| DispatchError::UnsupportedLanguage(s.to_string()))
    }
}

/// A dialect's two-step contract: a cheap shape test, then full decomposition.
pub trait DialectParser: Send + Sync {
    fn language(&self) -> Language;

    /// Pre-filter over the trimmed whole input. `false` means "not this dialect",
    /// not an error.
    fn supports(&self, text: &str) -> bool;

    fn parse(&self, text: &str) -> Result<Value, ParseError>;
}

/// Immutable-after-construction table of dialect parsers.
pub struct Registry {
    parsers: [Box<dyn DialectParser>; 3],
}

impl Registry {
    pub fn new(options: ParseOptions) -> Self {
        Self {
            parsers: [
                Box::new(JavaParser::new(options)),
                Box::new(KotlinParser::new(options)),
                Box::new(CSharpParser::new(options)),
            ],
        }
    }

    /// Replace the parser registered for `parser.language()`.
    pub fn register(&mut self, parser: impl DialectParser + 'static) {
        let slot = parser.language().index();
        self.parsers[slot] = Box::new(parser);
    }

    pub fn parser(&self, language: Language) -> &dyn DialectParser {
        &*self.parsers[language.index()]
    }

    /// Resolve `tag` and parse `text` with that dialect.
    ///
    /// # Errors
    /// - [`DispatchError::EmptyInput`] if `text` is blank (checked before the tag)
    /// - [`DispatchError::UnsupportedLanguage`] if `tag` is unknown
    /// - [`DispatchError::UnsupportedSyntax`] if the dialect's pre-filter rejects it
    /// - [`DispatchError::MalformedInput`] if the dialect's parse fails
    pub fn dispatch(&self, tag: &str, text: &str) -> Result<Value, DispatchError> {
        if text.trim().is_empty() {
            return Err(DispatchError::EmptyInput);
        }
        let language = tag.parse::<Language>()?;
        self.dispatch_language(language, text)
    }

    pub fn dispatch_language(&self, language: Language, text: &str) -> Result<Value, DispatchError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(DispatchError::EmptyInput);
        }
        debug!(%language, bytes = text.len(), "dispatching input");

        let parser = self.parser(language);
        if !parser.supports(text) {
            debug!(%language, "input rejected by dialect pre-filter");
            return Err(DispatchError::UnsupportedSyntax { language });
        }

        parser.parse(text).map_err(|source| {
            debug!(%language, error = %source, "dialect parse failed");
            DispatchError::MalformedInput { language, source }
        })
    }

    /// Every language whose pre-filter accepts `text`, in [`Language::ALL`] order.
    pub fn detect(&self, text: &str) -> Vec<Language> {
        let text = text.trim();
        Language::ALL
            .into_iter()
            .filter(|&lang| self.parser(lang).supports(text))
            .collect()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(ParseOptions::default())
    }
}

static DEFAULT_REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::default);

/// [`Registry::dispatch`] on a process-wide registry with default options.
pub fn dispatch(tag: &str, text: &str) -> Result<Value, DispatchError> {
    DEFAULT_REGISTRY.dispatch(tag, text)
}

/// [`Registry::detect`] on a process-wide registry with default options.
pub fn detect(text: &str) -> Vec<Language> {
    DEFAULT_REGISTRY.detect(text)
}
