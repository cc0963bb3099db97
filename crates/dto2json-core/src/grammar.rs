//! Table-driven recursive descent shared by the dialect parsers.
//!
//! Each dialect is a [`Grammar`]: its quoting rules plus an ordered table of
//! [`Rule`]s. [`Walker::parse_value`] tries the rules top to bottom and builds the
//! first match; when nothing matches the text is kept verbatim as a string. Composite
//! builders split their body with the [`crate::splitter`] and recurse through a child
//! walker one level deeper, which is where the depth limit is enforced.

use crate::error::{ParseError, Result};
use crate::options::ParseOptions;
use crate::splitter::{find_top_level, split_top_level, Quoting};
use crate::value::{insert_entry, Object, Value};
use tracing::trace;

pub(crate) type Build = fn(&Walker<'_>, &str) -> Result<Value>;

/// Splits one dictionary segment into raw key text and raw value text.
pub(crate) type EntrySplit = for<'s> fn(&Walker<'_>, &'s str) -> Result<(&'s str, &'s str)>;

/// One literal kind: a shape test and the constructor run when it matches.
pub(crate) struct Rule {
    pub name: &'static str,
    pub matches: fn(&str) -> bool,
    pub build: Build,
}

pub(crate) struct Grammar {
    pub name: &'static str,
    pub quoting: Quoting,
    pub rules: &'static [Rule],
}

/// Recursion state for one `parse` call.
pub(crate) struct Walker<'g> {
    grammar: &'g Grammar,
    options: ParseOptions,
    depth: usize,
}

impl<'g> Walker<'g> {
    pub fn new(grammar: &'g Grammar, options: ParseOptions) -> Self {
        Self {
            grammar,
            options,
            depth: 0,
        }
    }

    /// Entry point: blank input is an error here, unlike inside composites.
    pub fn parse_root(&self, text: &str) -> Result<Value> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ParseError::Empty);
        }
        self.parse_value(text)
    }

    /// Classify a fragment and build its value. A blank fragment is `Null`.
    pub fn parse_value(&self, text: &str) -> Result<Value> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(Value::Null);
        }
        for rule in self.grammar.rules {
            if (rule.matches)(text) {
                trace!(
                    dialect = self.grammar.name,
                    rule = rule.name,
                    depth = self.depth,
                    "literal rule matched"
                );
                return (rule.build)(self, text);
            }
        }
        Ok(Value::String(text.to_string()))
    }

    /// Walker for the contents of a composite, one level deeper.
    fn descend(&self) -> Result<Walker<'g>> {
        let depth = self.depth + 1;
        if depth > self.options.max_depth {
            return Err(ParseError::DepthExceeded {
                limit: self.options.max_depth,
            });
        }
        Ok(Walker {
            grammar: self.grammar,
            options: self.options,
            depth,
        })
    }

    pub fn split<'a>(&self, body: &'a str) -> Result<Vec<&'a str>> {
        split_top_level(body, &self.grammar.quoting, self.options.bracket_mode)
    }

    /// Split `segment` around the first top-level `sep`.
    pub fn split_pair<'a>(&self, segment: &'a str, sep: &str) -> Option<(&'a str, &'a str)> {
        find_top_level(segment, sep, &self.grammar.quoting)
            .map(|at| (segment[..at].trim(), segment[at + sep.len()..].trim()))
    }

    /// Parse a comma-separated body into array items.
    pub fn parse_items(&self, body: &str) -> Result<Value> {
        let child = self.descend()?;
        let items = self
            .split(body)?
            .into_iter()
            .map(|segment| child.parse_value(segment))
            .collect::<Result<Vec<_>>>()?;
        Ok(Value::Array(items))
    }

    /// Parse a body of `key = value` properties into an object.
    ///
    /// Keys are identifiers taken verbatim; a segment without `=` or with an empty key
    /// fails the whole parse.
    pub fn parse_fields(&self, body: &str, class: Option<String>) -> Result<Value> {
        let child = self.descend()?;
        let mut object = Object::new(class);
        for segment in self.split(body)? {
            let (key, value) = self.split_pair(segment, "=").ok_or_else(|| {
                ParseError::MissingSeparator {
                    segment: segment.to_string(),
                }
            })?;
            if key.is_empty() {
                return Err(ParseError::EmptyKey {
                    segment: segment.to_string(),
                });
            }
            object.insert(key.to_string(), child.parse_value(value)?);
        }
        Ok(Value::Object(object))
    }

    /// Parse a body of dictionary entries. `entry` splits one segment into raw key and
    /// raw value text; both sides are then parsed one level deeper.
    pub fn parse_entries(&self, body: &str, entry: EntrySplit) -> Result<Value> {
        let child = self.descend()?;
        let mut entries = Vec::new();
        for segment in self.split(body)? {
            let (raw_key, raw_value) = entry(self, segment)?;
            if raw_key.trim().is_empty() {
                return Err(ParseError::EmptyKey {
                    segment: segment.to_string(),
                });
            }
            let key = child.parse_key(raw_key)?;
            insert_entry(&mut entries, key, child.parse_value(raw_value)?);
        }
        Ok(Value::Dictionary(entries))
    }

    /// Build an object from fixed field names and raw value text.
    pub fn parse_named(&self, class: Option<String>, fields: &[(&str, &str)]) -> Result<Value> {
        let child = self.descend()?;
        let mut object = Object::new(class);
        for (name, raw) in fields {
            object.insert((*name).to_string(), child.parse_value(raw)?);
        }
        Ok(Value::Object(object))
    }

    /// Parse a dictionary key and reduce it to a string: string and char literals are
    /// unquoted, anything else keeps its source text.
    pub fn parse_key(&self, raw: &str) -> Result<String> {
        let raw = raw.trim();
        Ok(match self.parse_value(raw)? {
            Value::String(s) => s,
            Value::Char(c) => c.to_string(),
            _ => raw.to_string(),
        })
    }
}

/// `key = value` entry splitter shared by the Java- and Kotlin-style map bodies.
pub(crate) fn equals_entry<'s>(walker: &Walker<'_>, segment: &'s str) -> Result<(&'s str, &'s str)> {
    walker
        .split_pair(segment, "=")
        .ok_or_else(|| ParseError::InvalidEntry {
            entry: segment.to_string(),
        })
}

/// Text between the first `open` and the last `close`.
pub(crate) fn body_between(text: &str, open: char, close: char) -> Result<&str> {
    let start = text.find(open).ok_or_else(|| ParseError::MissingDelimiter {
        delimiter: open,
        fragment: text.to_string(),
    })?;
    let end = text
        .rfind(close)
        .filter(|&end| end > start)
        .ok_or_else(|| ParseError::MissingDelimiter {
            delimiter: close,
            fragment: text.to_string(),
        })?;
    Ok(&text[start + open.len_utf8()..end])
}

/// Strip a known prefix and suffix, failing if either is absent.
pub(crate) fn strip_wrapper<'a>(text: &'a str, prefix: &str, suffix: &str) -> Result<&'a str> {
    let missing = |delimiter: &str| ParseError::MissingDelimiter {
        delimiter: delimiter.chars().last().unwrap_or(' '),
        fragment: text.to_string(),
    };
    let inner = text.strip_prefix(prefix).ok_or_else(|| missing(prefix))?;
    inner.strip_suffix(suffix).ok_or_else(|| missing(suffix))
}

pub(crate) fn wrapped(text: &str, open: char, close: char) -> bool {
    text.len() >= 2 && text.starts_with(open) && text.ends_with(close)
}

/// True when `text` is exactly one `quote`-delimited literal with backslash escapes.
pub(crate) fn is_quoted(text: &str, quote: u8) -> bool {
    let bytes = text.as_bytes();
    bytes.len() >= 2
        && bytes[0] == quote
        && find_closing_quote(text, 1, quote) == Some(bytes.len() - 1)
}

/// Position of the closing quote, skipping backslash escapes.
pub(crate) fn find_closing_quote(s: &str, start: usize, quote: u8) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut i = start;
    while i < bytes.len() {
        if bytes[i] == b'\\' {
            i += 2;
        } else if bytes[i] == quote {
            return Some(i);
        } else {
            i += 1;
        }
    }
    None
}

/// Single-character literal: `'x'` or an escaped `'\n'`.
pub(crate) fn char_literal(text: &str, extra: &[(char, char)]) -> Option<char> {
    let inner = text.strip_prefix('\'')?.strip_suffix('\'')?;
    if let Some(hex) = inner.strip_prefix("\\u") {
        return unicode_escape(hex);
    }
    let mut chars = inner.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (Some(c), None, None) if c != '\\' => Some(c),
        (Some('\\'), Some(e), None) => escape_char(e, extra),
        _ => None,
    }
}

/// The char named by the four hex digits after `\u`.
fn unicode_escape(hex: &str) -> Option<char> {
    if hex.len() != 4 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
}

/// Unescape backslash sequences. Common escapes plus the dialect's `extra` ones are
/// translated; an unknown escape keeps its backslash.
pub(crate) fn unescape(s: &str, extra: &[(char, char)]) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some(e) => match escape_char(e, extra) {
                Some(resolved) => out.push(resolved),
                None => {
                    out.push('\\');
                    out.push(e);
                }
            },
            None => out.push('\\'),
        }
    }
    out
}

fn escape_char(e: char, extra: &[(char, char)]) -> Option<char> {
    match e {
        'n' => Some('\n'),
        'r' => Some('\r'),
        't' => Some('\t'),
        '\\' => Some('\\'),
        '"' => Some('"'),
        '\'' => Some('\''),
        _ => extra.iter().find(|(k, _)| *k == e).map(|(_, v)| *v),
    }
}
