use dto2json_core::{dispatch, DialectParser, DispatchError, KotlinParser, ParseError};

fn parse(text: &str) -> serde_json::Value {
    dispatch("KOTLIN", text).unwrap().to_json()
}

fn assert_json_eq(actual: serde_json::Value, expected: &str) {
    let expected: serde_json::Value = serde_json::from_str(expected).unwrap();
    assert_eq!(
        actual, expected,
        "JSON mismatch:\n  actual:   {actual}\n  expected: {expected}"
    );
}

// ============================================================================
// Data classes
// ============================================================================

#[test]
fn data_class_with_list_builder() {
    assert_json_eq(
        parse(r#"Person(name="Bob", tags=listOf("a","b"))"#),
        r#"{"name":"Bob","tags":["a","b"]}"#,
    );
}

#[test]
fn data_class_to_string_with_bare_values() {
    assert_json_eq(
        parse("Pair(first=1, second=two)"),
        r#"{"first":1,"second":"two"}"#,
    );
}

#[test]
fn nested_data_classes_in_a_list() {
    assert_json_eq(
        parse("Team(lead=Member(name=Ann), members=[Member(name=Ben), Member(name=Cy)])"),
        r#"{"lead":{"name":"Ann"},"members":[{"name":"Ben"},{"name":"Cy"}]}"#,
    );
}

#[test]
fn enum_constant_is_a_string() {
    assert_json_eq(parse("Task(state=DONE)"), r#"{"state":"DONE"}"#);
}

// ============================================================================
// Builders
// ============================================================================

#[test]
fn map_builder_with_to_entries() {
    assert_json_eq(
        parse(r#"Config(env=mapOf("A" to 1, "B" to 2))"#),
        r#"{"env":{"A":1,"B":2}}"#,
    );
}

#[test]
fn map_builder_accepts_equals_entries() {
    assert_json_eq(parse("mutableMapOf(x=1, y=2)"), r#"{"x":1,"y":2}"#);
}

#[test]
fn mixed_list_builder() {
    assert_json_eq(
        parse("mutableListOf(1, 2.5, null, true)"),
        r#"[1,2.5,null,true]"#,
    );
}

#[test]
fn set_and_array_builders() {
    assert_json_eq(
        parse("Sets(a=setOf(1, 2), b=arrayOf(\"x\"), c=hashSetOf())"),
        r#"{"a":[1,2],"b":["x"],"c":[]}"#,
    );
}

#[test]
fn empty_builders() {
    assert_json_eq(
        parse("Box(items=emptyList(), tags=emptySet(), meta=emptyMap())"),
        r#"{"items":[],"tags":[],"meta":{}}"#,
    );
}

#[test]
fn braced_map_to_string() {
    assert_json_eq(parse("{a=1, b=listOf(2, 3)}"), r#"{"a":1,"b":[2,3]}"#);
}

#[test]
fn equals_before_to_picks_equals() {
    assert_json_eq(
        parse("{title=Back to the Future}"),
        r#"{"title":"Back to the Future"}"#,
    );
    assert_json_eq(parse(r#"mapOf("k" to "a=b")"#), r#"{"k":"a=b"}"#);
}

// ============================================================================
// Literals
// ============================================================================

#[test]
fn raw_string_keeps_quotes_and_commas() {
    assert_json_eq(
        parse(r#"Doc(body="""line "one", two""", n=1)"#),
        r#"{"body":"line \"one\", two","n":1}"#,
    );
}

#[test]
fn raw_string_is_not_unescaped() {
    assert_json_eq(
        parse(r#"Doc(path="""C:\temp\n""")"#),
        r#"{"path":"C:\\temp\\n"}"#,
    );
}

#[test]
fn template_escapes() {
    assert_json_eq(parse(r#"Tpl(text="cost: \$5")"#), r#"{"text":"cost: $5"}"#);
}

#[test]
fn hex_binary_and_unsigned() {
    assert_json_eq(
        parse("Flags(mask=0xFF, bits=0b101, max=18446744073709551615uL, small=3u, long=9L)"),
        r#"{"mask":255,"bits":5,"max":18446744073709551615,"small":3,"long":9}"#,
    );
}

#[test]
fn ranges() {
    assert_json_eq(
        parse("Window(range=1..10, letters='a'..'e', down=-5..-1)"),
        r#"{"range":{"start":1,"end":10},"letters":{"start":"a","end":"e"},"down":{"start":-5,"end":-1}}"#,
    );
}

#[test]
fn decimal_and_unicode_ranges() {
    assert_json_eq(
        parse(r"Span(unit=0.5..2.5, caps='\u0041'..'\u005A', c='\u00e9')"),
        r#"{"unit":{"start":0.5,"end":2.5},"caps":{"start":"A","end":"Z"},"c":"é"}"#,
    );
}

#[test]
fn lambda_is_kept_verbatim() {
    assert_json_eq(
        parse("Button(label=\"Ok\", onClick={ e -> handle(e, 1) })"),
        r#"{"label":"Ok","onClick":"{ e -> handle(e, 1) }"}"#,
    );
}

#[test]
fn char_values() {
    assert_json_eq(parse(r"C(c='x', tab='\t')"), r#"{"c":"x","tab":"\t"}"#);
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn map_entry_without_separator() {
    let err = dispatch("KOTLIN", r#"mapOf("a")"#).unwrap_err();
    assert!(matches!(
        err,
        DispatchError::MalformedInput {
            source: ParseError::InvalidEntry { .. },
            ..
        }
    ));
}

#[test]
fn negative_unsigned_literal() {
    let err = KotlinParser::default().parse("N(v=-1u)").unwrap_err();
    assert!(matches!(err, ParseError::InvalidNumber { .. }));
}

#[test]
fn bare_scalar_is_unsupported() {
    assert!(matches!(
        dispatch("KOTLIN", "42").unwrap_err(),
        DispatchError::UnsupportedSyntax { .. }
    ));
}
