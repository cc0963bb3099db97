//! Java-style literals: record/DTO `toString()` output.
//!
//! Accepts both `Person(name="Alice", age=30)` (Lombok-style DTOs) and the record form
//! `Person[name=Alice, age=30]`, plus `HashMap.toString()` maps `{a=1}` and
//! `List.toString()` arrays `[1, 2]`. Objects carry no class name.

use crate::error::Result;
use crate::grammar::{
    body_between, char_literal, equals_entry, is_quoted, unescape, wrapped, Grammar, Rule, Walker,
};
use crate::numeric;
use crate::options::ParseOptions;
use crate::registry::{DialectParser, Language};
use crate::splitter::Quoting;
use crate::value::Value;
use regex::Regex;
use std::sync::LazyLock;

static DTO: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\w+\((?s:.*)\)$").unwrap());
static RECORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\w+\[(?s:.*)\]$").unwrap());
static DECIMAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-?[0-9]+\.[0-9]+(?:[eE][+-]?[0-9]+)?[fFdD]?$").unwrap()
});
static INTEGER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^-?[0-9]+[lL]?$").unwrap());
static ENUM_CONSTANT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z_][A-Z0-9_]*$").unwrap());

const ESCAPES: &[(char, char)] = &[('b', '\u{8}'), ('f', '\u{c}'), ('0', '\0')];

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
        name: "string",
        matches: |s| is_quoted(s, b'"'),
        build: build_string,
    },
    Rule {
        name: "char",
        matches: |s| char_literal(s, ESCAPES).is_some(),
        build: build_char,
    },
    Rule {
        name: "single_quoted_string",
        matches: |s| is_quoted(s, b'\''),
        build: build_string,
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
        name: "dto",
        matches: |s| DTO.is_match(s),
        build: |w, s| w.parse_fields(body_between(s, '(', ')')?, None),
    },
    Rule {
        name: "record",
        matches: |s| RECORD.is_match(s),
        build: |w, s| w.parse_fields(body_between(s, '[', ']')?, None),
    },
    Rule {
        name: "array",
        matches: |s| wrapped(s, '[', ']'),
        build: |w, s| w.parse_items(&s[1..s.len() - 1]),
    },
    Rule {
        name: "map",
        matches: |s| wrapped(s, '{', '}'),
        build: |w, s| w.parse_entries(&s[1..s.len() - 1], equals_entry),
    },
    Rule {
        name: "enum_constant",
        matches: |s| ENUM_CONSTANT.is_match(s),
        build: |_, s| Ok(Value::String(s.to_string())),
    },
];

static GRAMMAR: Grammar = Grammar {
    name: "java",
    quoting: Quoting::PLAIN,
    rules: RULES,
};

fn build_string(_: &Walker<'_>, s: &str) -> Result<Value> {
    Ok(Value::String(unescape(&s[1..s.len() - 1], ESCAPES)))
}

fn build_char(_: &Walker<'_>, s: &str) -> Result<Value> {
    Ok(char_literal(s, ESCAPES).map_or_else(|| Value::String(s.to_string()), Value::Char))
}

#[derive(Debug, Clone, Default)]
pub struct JavaParser {
    options: ParseOptions,
}

impl JavaParser {
    pub fn new(options: ParseOptions) -> Self {
        Self { options }
    }
}

impl DialectParser for JavaParser {
    fn language(&self) -> Language {
        Language::Java
    }

    fn supports(&self, text: &str) -> bool {
        let text = text.trim();
        DTO.is_match(text)
            || RECORD.is_match(text)
            || wrapped(text, '{', '}')
            || wrapped(text, '[', ']')
    }

    fn parse(&self, text: &str) -> Result<Value> {
        Walker::new(&GRAMMAR, self.options).parse_root(text)
    }
}
