//! Kotlin-style literals: data class `toString()` output and collection builders.
//!
//! Adds to the Java-style shapes: raw `"""..."""` strings, hex/binary/unsigned
//! integers, `listOf(...)`/`mapOf(...)` builder calls, `a to b` map entries, ranges
//! (`1..10`) and lambdas (`{ x -> ... }`, kept verbatim).

use crate::error::{ParseError, Result};
use crate::grammar::{
    body_between, char_literal, is_quoted, unescape, wrapped, Grammar, Rule, Walker,
};
use crate::numeric;
use crate::options::ParseOptions;
use crate::registry::{DialectParser, Language};
use crate::splitter::{find_top_level, Quoting};
use crate::value::Value;
use regex::Regex;
use std::sync::LazyLock;

static DATA_CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_]*\((?s:.*)\)$").unwrap());
static HEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^0[xX][0-9a-fA-F]+$").unwrap());
static BINARY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^0[bB][01]+$").unwrap());
static DECIMAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-?[0-9]+\.[0-9]+(?:[eE][+-]?[0-9]+)?[fFdD]?$").unwrap()
});
static INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?[0-9]+(?:[uU][lL]?|[lL])?$").unwrap());
static RANGE: LazyLock<Regex> = LazyLock::new(|| {
    let bound = r"(-?[0-9]+(?:\.[0-9]+)?|'(?:\\u[0-9a-fA-F]{4}|\\.|[^'\\])'|[A-Za-z_][A-Za-z0-9_]*)";
    Regex::new(&format!(r"^{bound}\.\.{bound}$")).unwrap()
});
static ENUM_CONSTANT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z_][A-Z0-9_]*$").unwrap());

/// Builder calls that produce an array.
const LIST_BUILDERS: &[&str] = &[
    "listOf",
    "mutableListOf",
    "arrayListOf",
    "emptyList",
    "setOf",
    "mutableSetOf",
    "hashSetOf",
    "linkedSetOf",
    "sortedSetOf",
    "emptySet",
    "arrayOf",
    "emptyArray",
    "intArrayOf",
    "longArrayOf",
    "doubleArrayOf",
    "booleanArrayOf",
    "charArrayOf",
];

/// Builder calls that produce a dictionary.
const MAP_BUILDERS: &[&str] = &[
    "mapOf",
    "mutableMapOf",
    "hashMapOf",
    "linkedMapOf",
    "sortedMapOf",
    "emptyMap",
];

const ESCAPES: &[(char, char)] = &[('$', '$'), ('{', '{'), ('}', '}'), ('b', '\u{8}')];

static RULES: &[Rule] = &[
    Rule {
        name: "null",
        matches: |s| s == "null",
        build: |_, _| Ok(Value::Null),
    },
    Rule {
        name: "boolean",
        matches: |s| s == "true" || s == "false",
        build: |_, s| Ok(Value::Bool(s == "true")),
    },
    Rule {
        name: "raw_string",
        matches: is_raw_string,
        build: |_, s| Ok(Value::String(s[3..s.len() - 3].to_string())),
    },
    Rule {
        name: "string",
        matches: |s| is_quoted(s, b'"'),
        build: |_, s| Ok(Value::String(unescape(&s[1..s.len() - 1], ESCAPES))),
    },
    Rule {
        name: "char",
        matches: |s| char_literal(s, ESCAPES).is_some(),
        build: build_char,
    },
    Rule {
        name: "hex",
        matches: |s| HEX.is_match(s),
        build: |_, s| numeric::parse_radix(s, 16),
    },
    Rule {
        name: "binary",
        matches: |s| BINARY.is_match(s),
        build: |_, s| numeric::parse_radix(s, 2),
    },
    Rule {
        name: "decimal",
        matches: |s| DECIMAL.is_match(s),
        build: |_, s| numeric::parse_decimal(s),
    },
    Rule {
        name: "integer",
        matches: |s| INTEGER.is_match(s),
        build: |_, s| numeric::parse_integer(s),
    },
    Rule {
        name: "list_builder",
        matches: |s| builder_name(s, LIST_BUILDERS).is_some(),
        build: |w, s| w.parse_items(builder_body(s, LIST_BUILDERS)?),
    },
    Rule {
        name: "map_builder",
        matches: |s| builder_name(s, MAP_BUILDERS).is_some(),
        build: |w, s| w.parse_entries(builder_body(s, MAP_BUILDERS)?, kotlin_entry),
    },
    Rule {
        name: "data_class",
        matches: |s| DATA_CLASS.is_match(s),
        build: |w, s| w.parse_fields(body_between(s, '(', ')')?, None),
    },
    Rule {
        name: "array",
        matches: |s| wrapped(s, '[', ']'),
        build: |w, s| w.parse_items(&s[1..s.len() - 1]),
    },
    Rule {
        name: "lambda",
        matches: is_lambda,
        build: |_, s| Ok(Value::String(s.to_string())),
    },
    Rule {
        name: "map",
        matches: |s| wrapped(s, '{', '}'),
        build: |w, s| w.parse_entries(&s[1..s.len() - 1], kotlin_entry),
    },
    Rule {
        name: "range",
        matches: |s| RANGE.is_match(s),
        build: build_range,
    },
    Rule {
        name: "enum_constant",
        matches: |s| ENUM_CONSTANT.is_match(s),
        build: |_, s| Ok(Value::String(s.to_string())),
    },
];

static GRAMMAR: Grammar = Grammar {
    name: "kotlin",
    quoting: Quoting::KOTLIN,
    rules: RULES,
};

fn is_raw_string(s: &str) -> bool {
    s.len() >= 6 && s.starts_with("\"\"\"") && s.ends_with("\"\"\"")
}

fn is_lambda(s: &str) -> bool {
    wrapped(s, '{', '}') && find_top_level(&s[1..s.len() - 1], "->", &Quoting::KOTLIN).is_some()
}

fn build_char(_: &Walker<'_>, s: &str) -> Result<Value> {
    Ok(char_literal(s, ESCAPES).map_or_else(|| Value::String(s.to_string()), Value::Char))
}

fn build_range(w: &Walker<'_>, s: &str) -> Result<Value> {
    let caps = RANGE.captures(s).ok_or_else(|| ParseError::MissingDelimiter {
        delimiter: '.',
        fragment: s.to_string(),
    })?;
    let start = caps.get(1).map_or("", |m| m.as_str());
    let end = caps.get(2).map_or("", |m| m.as_str());
    w.parse_named(None, &[("start", start), ("end", end)])
}

/// The builder whose `name(` prefixes `s`.
fn builder_name(s: &str, names: &[&'static str]) -> Option<&'static str> {
    names.iter().copied().find(|name| {
        s.strip_prefix(name)
            .is_some_and(|rest| rest.starts_with('('))
    })
}

fn builder_body<'a>(s: &'a str, names: &[&'static str]) -> Result<&'a str> {
    let name = builder_name(s, names).ok_or_else(|| ParseError::MissingDelimiter {
        delimiter: '(',
        fragment: s.to_string(),
    })?;
    s[name.len() + 1..]
        .strip_suffix(')')
        .ok_or_else(|| ParseError::MissingDelimiter {
            delimiter: ')',
            fragment: s.to_string(),
        })
}

/// `key to value` or `key=value`, whichever top-level separator comes first.
fn kotlin_entry<'s>(w: &Walker<'_>, segment: &'s str) -> Result<(&'s str, &'s str)> {
    let to = find_top_level(segment, " to ", &Quoting::KOTLIN);
    let eq = find_top_level(segment, "=", &Quoting::KOTLIN);
    let sep = match (to, eq) {
        (Some(to), Some(eq)) if eq < to => "=",
        (Some(_), _) => " to ",
        (None, _) => "=",
    };
    w.split_pair(segment, sep)
        .ok_or_else(|| ParseError::InvalidEntry {
            entry: segment.to_string(),
        })
}

#[derive(Debug, Clone, Default)]
pub struct KotlinParser {
    options: ParseOptions,
}

impl KotlinParser {
    pub fn new(options: ParseOptions) -> Self {
        Self { options }
    }
}

impl DialectParser for KotlinParser {
    fn language(&self) -> Language {
        Language::Kotlin
    }

    fn supports(&self, text: &str) -> bool {
        let text = text.trim();
        DATA_CLASS.is_match(text)
            || builder_name(text, LIST_BUILDERS).is_some()
            || builder_name(text, MAP_BUILDERS).is_some()
            || wrapped(text, '{', '}')
            || wrapped(text, '[', ']')
    }

    fn parse(&self, text: &str) -> Result<Value> {
        Walker::new(&GRAMMAR, self.options).parse_root(text)
    }
}
