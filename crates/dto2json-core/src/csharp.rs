//! C#-style literals: object and collection initializers.
//!
//! Named objects keep their class name (`new Person { Name = "Eve" }` becomes
//! `{"__class": "Person", "Name": "Eve"}`). GUIDs, timestamps, enum members, sized
//! array declarations and interpolated strings are kept as typed scalars since their
//! meaning is not recoverable from the text alone.

use crate::error::{ParseError, Result};
use crate::grammar::{
    body_between, char_literal, is_quoted, strip_wrapper, unescape, wrapped, Grammar, Rule,
    Walker,
};
use crate::numeric;
use crate::options::ParseOptions;
use crate::registry::{DialectParser, Language};
use crate::splitter::Quoting;
use crate::value::{Object, ScalarTag, TypedScalar, Value};
use regex::Regex;
use std::sync::LazyLock;

static GUID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .unwrap()
});
// `DateTime.ToString()` in the invariant culture, or ISO 8601. Prefix match only.
static DATETIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:[0-9]{1,2}/[0-9]{1,2}/[0-9]{4}\s+[0-9]{1,2}:[0-9]{2}:[0-9]{2}|[0-9]{4}-[0-9]{2}-[0-9]{2}T[0-9]{2}:[0-9]{2}:[0-9]{2})",
    )
    .unwrap()
});
static HEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^0[xX][0-9a-fA-F]+$").unwrap());
static DECIMAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-?[0-9]+\.[0-9]+(?:[eE][+-]?[0-9]+)?[fFdDmM]?$").unwrap()
});
static INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?[0-9]+(?:[uU][lL]?|[lL][uU]?)?$").unwrap());
static WHOLE_REAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^-?[0-9]+[fFdDmM]$").unwrap());

static LIST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:new\s+)?(?:List|IList|IReadOnlyList|HashSet|ISet|IEnumerable|ICollection|IReadOnlyCollection|Queue|Stack|LinkedList|SortedSet)\s*<(?s:.*)>\s*(?:\([^{]*\))?\s*(?:\{(?s:.*)\})?$",
    )
    .unwrap()
});
static DICTIONARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:new\s+)?(?:Dictionary|IDictionary|IReadOnlyDictionary|SortedDictionary|SortedList|ConcurrentDictionary)\s*<(?s:.*)>\s*(?:\([^{]*\))?\s*(?:\{(?s:.*)\})?$",
    )
    .unwrap()
});
static ARRAY_INIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^new\s*(?:[A-Za-z_][A-Za-z0-9_.<>,?\s]*)?\[[^\]]*\]\s*\{(?s:.*)\}$").unwrap()
});
static ARRAY_DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^new\s+[A-Za-z_][A-Za-z0-9_.<>,?]*\s*\[[^\]]+\]$").unwrap()
});
static NEW_OBJECT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^new\s+([A-Za-z_][A-Za-z0-9_.]*(?:<[^{}]*>)?)\s*(?:\([^{]*\))?\s*\{(?s:.*)\}$",
    )
    .unwrap()
});
static NEW_ANONYMOUS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^new\s*\{(?s:.*)\}$").unwrap());
static NEW_EMPTY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^new\s+([A-Za-z_][A-Za-z0-9_.]*(?:<[^{}]*>)?)\s*\([^{]*\)$").unwrap()
});
static CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z_][A-Za-z0-9_]*)\s*\{(?s:.*)\}$").unwrap());
static ENUM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Z][A-Za-z0-9_]*)\.([A-Z][A-Za-z0-9_]*)$").unwrap()
});

const ESCAPES: &[(char, char)] = &[
    ('0', '\0'),
    ('a', '\u{7}'),
    ('b', '\u{8}'),
    ('f', '\u{c}'),
    ('v', '\u{b}'),
];

const INTERPOLATED_PREFIXES: &[&str] = &["$@\"", "@$\"", "$\""];

static RULES: &[Rule] = &[
    Rule {
        name: "null",
        matches: |s| s == "null" || s == "NULL",
        build: |_, _| Ok(Value::Null),
    },
    Rule {
        name: "boolean",
        matches: |s| matches!(s, "true" | "false" | "True" | "False"),
        build: |_, s| Ok(Value::Bool(s.eq_ignore_ascii_case("true"))),
    },
    Rule {
        name: "interpolated_string",
        matches: |s| interpolated_template(s).is_some(),
        build: |_, s| {
            let template = interpolated_template(s).unwrap_or_default();
            Ok(Value::Typed(TypedScalar::text(
                ScalarTag::InterpolatedString,
                template,
            )))
        },
    },
    Rule {
        name: "verbatim_string",
        matches: is_verbatim,
        build: |_, s| Ok(Value::String(s[2..s.len() - 1].replace("\"\"", "\""))),
    },
    Rule {
        name: "string",
        matches: |s| is_quoted(s, b'"'),
        build: |_, s| Ok(Value::String(unescape(&s[1..s.len() - 1], ESCAPES))),
    },
    Rule {
        name: "char",
        matches: |s| char_literal(s, ESCAPES).is_some(),
        build: |_, s| {
            Ok(char_literal(s, ESCAPES).map_or_else(|| Value::String(s.to_string()), Value::Char))
        },
    },
    Rule {
        name: "guid",
        matches: |s| GUID.is_match(s),
        build: |_, s| Ok(Value::Typed(TypedScalar::text(ScalarTag::Guid, s))),
    },
    Rule {
        name: "datetime",
        matches: |s| DATETIME.is_match(s),
        build: |_, s| Ok(Value::Typed(TypedScalar::text(ScalarTag::DateTime, s))),
    },
    Rule {
        name: "hex",
        matches: |s| HEX.is_match(s),
        build: |_, s| numeric::parse_radix(s, 16),
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
        name: "whole_real",
        matches: |s| WHOLE_REAL.is_match(s),
        build: |_, s| numeric::parse_decimal(s),
    },
    Rule {
        name: "list",
        matches: |s| collection_shape(&LIST, s),
        build: |w, s| w.parse_items(collection_body(s)?),
    },
    Rule {
        name: "dictionary",
        matches: |s| collection_shape(&DICTIONARY, s),
        build: |w, s| w.parse_entries(collection_body(s)?, csharp_entry),
    },
    Rule {
        name: "array_init",
        matches: |s| ARRAY_INIT.is_match(s),
        build: |w, s| w.parse_items(body_between(s, '{', '}')?),
    },
    Rule {
        name: "array_wrapper",
        matches: |s| s.starts_with("Array[") && s.ends_with(']'),
        build: |w, s| w.parse_items(strip_wrapper(s, "Array[", "]")?),
    },
    Rule {
        name: "array_declaration",
        matches: |s| ARRAY_DECLARATION.is_match(s),
        build: |_, s| {
            Ok(Value::Typed(TypedScalar::text(
                ScalarTag::ArrayDeclaration,
                s,
            )))
        },
    },
    Rule {
        name: "new_object",
        matches: |s| NEW_OBJECT.is_match(s),
        build: |w, s| build_class(w, &NEW_OBJECT, s),
    },
    Rule {
        name: "new_anonymous",
        matches: |s| NEW_ANONYMOUS.is_match(s),
        build: |w, s| w.parse_fields(body_between(s, '{', '}')?, None),
    },
    Rule {
        name: "new_empty",
        matches: |s| NEW_EMPTY.is_match(s),
        build: |_, s| {
            let class = NEW_EMPTY
                .captures(s)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().trim().to_string());
            Ok(Value::Object(Object::new(class)))
        },
    },
    Rule {
        name: "braced",
        matches: |s| wrapped(s, '{', '}'),
        build: build_braced,
    },
    Rule {
        name: "array",
        matches: |s| wrapped(s, '[', ']'),
        build: |w, s| w.parse_items(&s[1..s.len() - 1]),
    },
    Rule {
        name: "class",
        matches: |s| CLASS.is_match(s),
        build: |w, s| build_class(w, &CLASS, s),
    },
    Rule {
        name: "enum",
        matches: |s| ENUM.is_match(s),
        build: |_, s| {
            let (enum_type, member) = s.split_once('.').unwrap_or((s, ""));
            Ok(Value::Typed(TypedScalar::enumeration(enum_type, member)))
        },
    },
];

static GRAMMAR: Grammar = Grammar {
    name: "csharp",
    quoting: Quoting::CSHARP,
    rules: RULES,
};

/// Template text of `$"..."`, `$@"..."` or `@$"..."`.
fn interpolated_template(s: &str) -> Option<&str> {
    INTERPOLATED_PREFIXES.iter().find_map(|prefix| {
        s.strip_prefix(prefix)
            .and_then(|rest| rest.strip_suffix('"'))
    })
}

/// `@"..."` where every inner quote is doubled.
fn is_verbatim(s: &str) -> bool {
    s.len() >= 3
        && s.starts_with("@\"")
        && s.ends_with('"')
        && !s[2..s.len() - 1].replace("\"\"", "").contains('"')
}

/// A collection type name is only a value when constructed or initialized.
fn collection_shape(pattern: &Regex, s: &str) -> bool {
    pattern.is_match(s) && (s.ends_with('}') || s.starts_with("new"))
}

/// Initializer body, or an empty body for a bare `new List<T>()`.
fn collection_body(s: &str) -> Result<&str> {
    if s.ends_with('}') {
        body_between(s, '{', '}')
    } else {
        Ok("")
    }
}

fn build_class(w: &Walker<'_>, pattern: &Regex, s: &str) -> Result<Value> {
    let class = pattern
        .captures(s)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string());
    w.parse_fields(body_between(s, '{', '}')?, class)
}

/// `{ ... }` is a dictionary when its first entry is `{k, v}` or `[k] = v`, and an
/// anonymous object of `P = v` properties otherwise.
fn build_braced(w: &Walker<'_>, s: &str) -> Result<Value> {
    let body = &s[1..s.len() - 1];
    let is_dictionary = w
        .split(body)?
        .first()
        .is_some_and(|first| first.starts_with('{') || first.starts_with('['));
    if is_dictionary {
        w.parse_entries(body, csharp_entry)
    } else {
        w.parse_fields(body, None)
    }
}

/// One dictionary initializer entry: `{k, v}`, `[k] = v` or `k = v`.
fn csharp_entry<'s>(w: &Walker<'_>, segment: &'s str) -> Result<(&'s str, &'s str)> {
    let invalid = || ParseError::InvalidEntry {
        entry: segment.to_string(),
    };

    if wrapped(segment, '{', '}') {
        return match w.split(&segment[1..segment.len() - 1])?.as_slice() {
            &[key, value] => Ok((key, value)),
            _ => Err(invalid()),
        };
    }

    let (key, value) = w.split_pair(segment, "=").ok_or_else(invalid)?;
    if wrapped(key, '[', ']') {
        return Ok((key[1..key.len() - 1].trim(), value));
    }
    Ok((key, value))
}

#[derive(Debug, Clone, Default)]
pub struct CSharpParser {
    options: ParseOptions,
}

impl CSharpParser {
    pub fn new(options: ParseOptions) -> Self {
        Self { options }
    }
}

impl DialectParser for CSharpParser {
    fn language(&self) -> Language {
        Language::CSharp
    }

    fn supports(&self, text: &str) -> bool {
        let text = text.trim();
        CLASS.is_match(text)
            || wrapped(text, '{', '}')
            || wrapped(text, '[', ']')
            || ["new ", "new[", "List<", "Dictionary<", "Array["]
                .iter()
                .any(|prefix| text.starts_with(prefix))
    }

    fn parse(&self, text: &str) -> Result<Value> {
        Walker::new(&GRAMMAR, self.options).parse_root(text)
    }
}
