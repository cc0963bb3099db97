//! Bracket- and quote-aware splitting of comma-separated bodies.
//!
//! Every dialect decomposes `(...)`, `[...]` and `{...}` bodies with
//! [`split_top_level`]. A comma separates two segments only when it sits at depth zero
//! and outside any quoted region. The quoting rules differ per dialect and are
//! described by [`Quoting`].
//!
//! The scan works on bytes: every delimiter is ASCII, and UTF-8 continuation bytes
//! never collide with ASCII, so slicing at a delimiter index is always on a char
//! boundary.

use crate::error::{ParseError, Result};
use crate::options::BracketMode;
use std::ops::ControlFlow;

/// Long-form quoting styles a dialect adds on top of plain `"` / `'` quotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Quoting {
    /// Kotlin raw strings: `"""..."""`, no escapes inside.
    pub triple_quoted: bool,
    /// C# verbatim strings: `@"..."`, with `""` standing for a literal quote.
    pub verbatim: bool,
    /// C# generic argument lists: `<` right after an identifier starts an argument list
    /// when a balanced `>` closes it with only type-name bytes in between, so
    /// `Dictionary<string, int>` stays one segment while `x<y, b = 1` still splits.
    pub generics: bool,
}

impl Quoting {
    pub const PLAIN: Quoting = Quoting {
        triple_quoted: false,
        verbatim: false,
        generics: false,
    };
    pub const KOTLIN: Quoting = Quoting {
        triple_quoted: true,
        verbatim: false,
        generics: false,
    };
    pub const CSHARP: Quoting = Quoting {
        triple_quoted: false,
        verbatim: true,
        generics: true,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Region {
    Code,
    Quoted(u8),
    Raw,
    Verbatim,
}

/// Split `body` into trimmed top-level segments, dropping empty ones.
///
/// In [`BracketMode::Lenient`] this never fails. In [`BracketMode::Strict`] a closer
/// that does not match the innermost opener, or an opener left unclosed, is an error.
pub fn split_top_level<'a>(
    body: &'a str,
    quoting: &Quoting,
    mode: BracketMode,
) -> Result<Vec<&'a str>> {
    let bytes = body.as_bytes();
    let mut segments = Vec::new();
    let mut start = 0;

    scan(body, quoting, mode, |i| {
        if bytes[i] == b',' {
            push_segment(&mut segments, &body[start..i]);
            start = i + 1;
        }
        ControlFlow::Continue(())
    })?;

    push_segment(&mut segments, &body[start..]);
    Ok(segments)
}

/// Byte offset of the first `needle` at depth zero outside quotes.
///
/// Always scans leniently; bracket errors are the splitter's job.
pub fn find_top_level(segment: &str, needle: &str, quoting: &Quoting) -> Option<usize> {
    let mut found = None;
    let _ = scan(segment, quoting, BracketMode::Lenient, |i| {
        if segment[i..].starts_with(needle) {
            found = Some(i);
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    });
    found
}

fn push_segment<'a>(segments: &mut Vec<&'a str>, raw: &'a str) {
    let trimmed = raw.trim();
    if !trimmed.is_empty() {
        segments.push(trimmed);
    }
}

/// Walk `text`, calling `visit` with the index of every byte that sits at depth zero
/// outside quotes. `visit` runs before that byte's own bracket effect is applied.
fn scan(
    text: &str,
    quoting: &Quoting,
    mode: BracketMode,
    mut visit: impl FnMut(usize) -> ControlFlow<()>,
) -> Result<()> {
    let bytes = text.as_bytes();
    let mut region = Region::Code;
    let mut depth: i64 = 0;
    let mut stack: Vec<u8> = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        match region {
            Region::Raw => {
                if bytes[i..].starts_with(b"\"\"\"") {
                    region = Region::Code;
                    i += 3;
                } else {
                    i += 1;
                }
                continue;
            }
            Region::Verbatim => {
                if b == b'"' {
                    if bytes.get(i + 1) == Some(&b'"') {
                        i += 2;
                        continue;
                    }
                    region = Region::Code;
                }
                i += 1;
                continue;
            }
            Region::Quoted(q) => {
                if b == b'\\' {
                    i += 2;
                    continue;
                }
                if b == q {
                    region = Region::Code;
                }
                i += 1;
                continue;
            }
            Region::Code => {}
        }

        if depth == 0 && visit(i).is_break() {
            return Ok(());
        }

        if quoting.triple_quoted && bytes[i..].starts_with(b"\"\"\"") {
            region = Region::Raw;
            i += 3;
            continue;
        }
        if quoting.verbatim && b == b'@' {
            // `@"` and the interpolated `@$"`; `$@"` reaches the `@` one byte later.
            let open = match bytes.get(i + 1) {
                Some(b'"') => Some(2),
                Some(b'$') if bytes.get(i + 2) == Some(&b'"') => Some(3),
                _ => None,
            };
            if let Some(len) = open {
                region = Region::Verbatim;
                i += len;
                continue;
            }
        }
        if let Some(end) = generic_args_end(bytes, i, quoting) {
            i = end + 1;
            continue;
        }

        match b {
            b'"' | b'\'' => region = Region::Quoted(b),
            b'(' | b'[' | b'{' => {
                depth += 1;
                stack.push(b);
            }
            b')' | b']' | b'}' => {
                depth -= 1;
                if mode == BracketMode::Strict {
                    let expected_open = opener_for(b);
                    match stack.pop() {
                        Some(open) if open == expected_open => {}
                        Some(open) => {
                            return Err(ParseError::MismatchedBracket {
                                expected: closer_for(open),
                                found: b as char,
                                offset: i,
                            });
                        }
                        None => {
                            return Err(ParseError::MissingDelimiter {
                                delimiter: expected_open as char,
                                fragment: text.to_string(),
                            });
                        }
                    }
                }
            }
            _ => {}
        }
        i += 1;
    }

    if mode == BracketMode::Strict {
        if let Some(&open) = stack.last() {
            return Err(ParseError::UnclosedBracket { open: open as char });
        }
    }
    Ok(())
}

/// Index of the `>` closing a generic argument list opened at `i`, if `bytes[i]` is
/// such an opener. Anything but type names, `,`, `.`, `?`, `[]` and whitespace
/// before the balancing `>` means `<` was an operator.
fn generic_args_end(bytes: &[u8], i: usize, quoting: &Quoting) -> Option<usize> {
    if !quoting.generics || bytes[i] != b'<' || i == 0 || !is_ident_byte(bytes[i - 1]) {
        return None;
    }
    let mut level = 0usize;
    for (j, &b) in bytes.iter().enumerate().skip(i) {
        match b {
            b'<' => level += 1,
            b'>' => {
                level -= 1;
                if level == 0 {
                    return Some(j);
                }
            }
            b',' | b'.' | b'?' | b'[' | b']' => {}
            _ if is_ident_byte(b) || b.is_ascii_whitespace() => {}
            _ => return None,
        }
    }
    None
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn opener_for(close: u8) -> u8 {
    match close {
        b')' => b'(',
        b']' => b'[',
        _ => b'{',
    }
}

fn closer_for(open: u8) -> char {
    match open {
        b'(' => ')',
        b'[' => ']',
        _ => '}',
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(body: &str) -> Vec<&str> {
        split_top_level(body, &Quoting::PLAIN, BracketMode::Lenient).unwrap()
    }

    #[test]
    fn splits_on_top_level_commas_only() {
        assert_eq!(
            split(r#"a=1, b=Inner(x=1, y=2), c=[1, 2], d={k=v, j=w}"#),
            vec!["a=1", "b=Inner(x=1, y=2)", "c=[1, 2]", "d={k=v, j=w}"]
        );
    }

    #[test]
    fn commas_inside_quotes_do_not_split() {
        assert_eq!(
            split(r#"a="x, y", b='z,', c="esc \" , still""#),
            vec![r#"a="x, y""#, "b='z,'", r#"c="esc \" , still""#]
        );
    }

    #[test]
    fn escaped_backslash_before_closing_quote() {
        assert_eq!(split(r#""a\\", "b""#), vec![r#""a\\""#, r#""b""#]);
    }

    #[test]
    fn empty_segments_are_dropped() {
        assert_eq!(split(" , a,, b , "), vec!["a", "b"]);
        assert!(split("   ").is_empty());
    }

    #[test]
    fn kotlin_raw_string_hides_quotes_and_commas() {
        let segments = split_top_level(
            r#"a="""x, "y", z""", b=2"#,
            &Quoting::KOTLIN,
            BracketMode::Lenient,
        )
        .unwrap();
        assert_eq!(segments, vec![r#"a="""x, "y", z""""#, "b=2"]);
    }

    #[test]
    fn csharp_verbatim_doubled_quote_stays_inside() {
        let segments = split_top_level(
            r#"Path = @"C:\dir, ""quoted""", Size = 1"#,
            &Quoting::CSHARP,
            BracketMode::Lenient,
        )
        .unwrap();
        assert_eq!(segments, vec![r#"Path = @"C:\dir, ""quoted""""#, "Size = 1"]);
    }

    #[test]
    fn csharp_generic_arguments_do_not_split() {
        let segments = split_top_level(
            "Map = new Dictionary<string, List<int>> { }, Size = 1, Cmp = a < b",
            &Quoting::CSHARP,
            BracketMode::Lenient,
        )
        .unwrap();
        assert_eq!(
            segments,
            vec!["Map = new Dictionary<string, List<int>> { }", "Size = 1", "Cmp = a < b"]
        );
    }

    #[test]
    fn csharp_unclosed_angle_is_a_comparison() {
        let segments = split_top_level("A = x<y, B = 1", &Quoting::CSHARP, BracketMode::Lenient)
            .unwrap();
        assert_eq!(segments, vec!["A = x<y", "B = 1"]);
    }

    #[test]
    fn csharp_interpolated_verbatim_keeps_backslash_literal() {
        for body in [r#"P = @$"C:\dir\", Q = 1"#, r#"P = $@"C:\dir\", Q = 1"#] {
            let segments = split_top_level(body, &Quoting::CSHARP, BracketMode::Lenient).unwrap();
            assert_eq!(segments.len(), 2, "{body}");
            assert_eq!(segments[1], "Q = 1");
        }
    }

    #[test]
    fn lenient_mode_ignores_bracket_kind() {
        // `(]` closes like `()` under the single counter.
        assert_eq!(split("a(], b"), vec!["a(]", "b"]);
    }

    #[test]
    fn strict_mode_rejects_mismatched_kind() {
        let err = split_top_level("a(], b", &Quoting::PLAIN, BracketMode::Strict).unwrap_err();
        assert_eq!(
            err,
            ParseError::MismatchedBracket {
                expected: ')',
                found: ']',
                offset: 2
            }
        );
    }

    #[test]
    fn strict_mode_rejects_unclosed_opener() {
        let err = split_top_level("a(1, b", &Quoting::PLAIN, BracketMode::Strict).unwrap_err();
        assert_eq!(err, ParseError::UnclosedBracket { open: '(' });
    }

    #[test]
    fn strict_mode_rejects_stray_closer() {
        let err = split_top_level("a), b", &Quoting::PLAIN, BracketMode::Strict).unwrap_err();
        assert!(matches!(err, ParseError::MissingDelimiter { delimiter: '(', .. }));
    }

    #[test]
    fn find_top_level_skips_nested_and_quoted() {
        let q = Quoting::PLAIN;
        assert_eq!(find_top_level(r#"k = "a=b""#, "=", &q), Some(2));
        assert_eq!(find_top_level(r#""a=b" = 1"#, "=", &q), Some(6));
        assert_eq!(find_top_level("f(a=1) = 2", "=", &q), Some(7));
        assert_eq!(find_top_level(r#""go to" to 3"#, " to ", &q), Some(7));
        assert_eq!(find_top_level("nothing here", "=", &q), None);
    }
}
