//! The value tree every dialect parser produces.
//!
//! `Value` keeps more type information than JSON does (chars vs strings, 32-bit vs
//! 64-bit vs big integers, typed opaque literals, objects vs dictionaries). The JSON
//! view is produced by [`Value::to_json`], which is also what `Serialize` emits.
//!
//! Objects and dictionaries are `Vec<(String, Value)>` in insertion order rather than
//! a map type; keys are kept unique by [`Object::insert`] / [`insert_entry`].

use bigdecimal::{num_bigint::BigInt, BigDecimal};
use serde::{Serialize, Serializer};
use serde_json::{Map, Number};
use std::str::FromStr;

/// JSON field carrying an object's class name.
pub const CLASS_FIELD: &str = "__class";

/// JSON field carrying a typed scalar's tag.
pub const TYPE_FIELD: &str = "__type";

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Char(char),
    Integer(Integer),
    Float(f32),
    Double(f64),
    /// Exact decimal, used for explicit decimal suffixes and for `f64` overflow.
    Decimal(BigDecimal),
    String(String),
    Typed(TypedScalar),
    Array(Vec<Value>),
    Object(Object),
    /// Keys are parsed values reduced to strings.
    Dictionary(Vec<(String, Value)>),
}

/// An exact integer in the narrowest representation that holds it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Integer {
    I32(i32),
    I64(i64),
    Big(BigInt),
}

impl Integer {
    /// Narrow a big integer to `I32` or `I64` when it fits.
    pub fn from_big(n: BigInt) -> Self {
        if let Ok(v) = i32::try_from(&n) {
            Integer::I32(v)
        } else if let Ok(v) = i64::try_from(&n) {
            Integer::I64(v)
        } else {
            Integer::Big(n)
        }
    }

    pub fn from_u64(n: u64) -> Self {
        match i64::try_from(n) {
            Ok(v) => Integer::from(v),
            Err(_) => Integer::Big(BigInt::from(n)),
        }
    }

    fn to_json(&self) -> serde_json::Value {
        match self {
            Integer::I32(v) => serde_json::Value::Number(Number::from(*v)),
            Integer::I64(v) => serde_json::Value::Number(Number::from(*v)),
            Integer::Big(n) => {
                if let Ok(v) = i64::try_from(n) {
                    serde_json::Value::Number(Number::from(v))
                } else if let Ok(v) = u64::try_from(n) {
                    serde_json::Value::Number(Number::from(v))
                } else {
                    serde_json::Value::String(n.to_string())
                }
            }
        }
    }
}

impl From<i64> for Integer {
    fn from(v: i64) -> Self {
        match i32::try_from(v) {
            Ok(small) => Integer::I32(small),
            Err(_) => Integer::I64(v),
        }
    }
}

/// Kinds of opaque literal recognized by shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarTag {
    Guid,
    DateTime,
    Enum,
    InterpolatedString,
    /// A sized array creation without an initializer, e.g. `new int[3]`.
    ArrayDeclaration,
}

impl ScalarTag {
    pub fn as_str(self) -> &'static str {
        match self {
            ScalarTag::Guid => "Guid",
            ScalarTag::DateTime => "DateTime",
            ScalarTag::Enum => "enum",
            ScalarTag::InterpolatedString => "interpolated_string",
            ScalarTag::ArrayDeclaration => "Array",
        }
    }

    fn payload_field(self) -> &'static str {
        match self {
            ScalarTag::ArrayDeclaration => "declaration",
            _ => "value",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScalarRaw {
    Text(String),
    Enum { enum_type: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypedScalar {
    pub tag: ScalarTag,
    pub raw: ScalarRaw,
}

impl TypedScalar {
    pub fn text(tag: ScalarTag, raw: impl Into<String>) -> Self {
        Self {
            tag,
            raw: ScalarRaw::Text(raw.into()),
        }
    }

    pub fn enumeration(enum_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            tag: ScalarTag::Enum,
            raw: ScalarRaw::Enum {
                enum_type: enum_type.into(),
                value: value.into(),
            },
        }
    }

    fn to_json(&self) -> serde_json::Value {
        let mut map = Map::new();
        map.insert(TYPE_FIELD.to_string(), self.tag.as_str().into());
        match &self.raw {
            ScalarRaw::Text(text) => {
                map.insert(self.tag.payload_field().to_string(), text.as_str().into());
            }
            ScalarRaw::Enum { enum_type, value } => {
                map.insert("enum_type".to_string(), enum_type.as_str().into());
                map.insert("value".to_string(), value.as_str().into());
            }
        }
        serde_json::Value::Object(map)
    }
}

/// A constructed object: optional class name plus fields in source order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Object {
    pub class: Option<String>,
    pub fields: Vec<(String, Value)>,
}

impl Object {
    pub fn new(class: Option<String>) -> Self {
        Self {
            class,
            fields: Vec::new(),
        }
    }

    /// Insert a field. A repeated key overwrites the earlier value but keeps its
    /// position.
    pub fn insert(&mut self, key: String, value: Value) {
        insert_entry(&mut self.fields, key, value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        lookup(&self.fields, key)
    }
}

/// Insert into an ordered entry list, replacing in place on a duplicate key.
pub fn insert_entry(entries: &mut Vec<(String, Value)>, key: String, value: Value) {
    match entries.iter_mut().find(|(k, _)| *k == key) {
        Some(slot) => slot.1 = value,
        None => entries.push((key, value)),
    }
}

fn lookup<'a>(entries: &'a [(String, Value)], key: &str) -> Option<&'a Value> {
    entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
}

impl Value {
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(s.into())
    }

    pub fn int(v: i64) -> Self {
        Value::Integer(Integer::from(v))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Field or entry lookup on objects and dictionaries.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(obj) => obj.get(key),
            Value::Dictionary(entries) => lookup(entries, key),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Convert to the JSON form returned to callers.
    ///
    /// Numbers that would lose precision as a native JSON number (big integers
    /// outside 64-bit range, decimals with more digits than `f64` keeps, non-finite
    /// doubles) are emitted as strings.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Char(c) => serde_json::Value::String(c.to_string()),
            Value::Integer(n) => n.to_json(),
            // Go through the shortest f32 rendering so 2.7f stays 2.7.
            Value::Float(f) => float_to_json(f.to_string().parse().unwrap_or(f64::NAN)),
            Value::Double(f) => float_to_json(*f),
            Value::Decimal(d) => decimal_to_json(d),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Typed(t) => t.to_json(),
            Value::Array(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Object(obj) => {
                let mut map = Map::new();
                // A field literally named `__class` takes the slot instead.
                let class = obj.class.as_ref().filter(|_| obj.get(CLASS_FIELD).is_none());
                if let Some(class) = class {
                    map.insert(CLASS_FIELD.to_string(), class.as_str().into());
                }
                for (k, v) in &obj.fields {
                    map.insert(k.clone(), v.to_json());
                }
                serde_json::Value::Object(map)
            }
            Value::Dictionary(entries) => serde_json::Value::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }
}

fn float_to_json(f: f64) -> serde_json::Value {
    match Number::from_f64(f) {
        Some(n) => serde_json::Value::Number(n),
        None => serde_json::Value::String(f.to_string()),
    }
}

fn decimal_to_json(d: &BigDecimal) -> serde_json::Value {
    let exact = d.to_string();
    if let Ok(f) = exact.parse::<f64>() {
        if f.is_finite() {
            let roundtrips = BigDecimal::from_str(&f.to_string()).is_ok_and(|back| back == *d);
            if roundtrips {
                if let Some(n) = Number::from_f64(f) {
                    return serde_json::Value::Number(n);
                }
            }
        }
    }
    serde_json::Value::String(exact)
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn duplicate_key_keeps_first_position() {
        let mut obj = Object::new(None);
        obj.insert("a".into(), Value::int(1));
        obj.insert("b".into(), Value::int(2));
        obj.insert("a".into(), Value::int(3));
        assert_eq!(
            Value::Object(obj).to_json().to_string(),
            r#"{"a":3,"b":2}"#
        );
    }

    #[test]
    fn big_integer_beyond_u64_is_a_string() {
        let n = BigInt::from_str("123456789012345678901234567890").unwrap();
        let v = Value::Integer(Integer::Big(n));
        assert_eq!(v.to_json(), json!("123456789012345678901234567890"));
    }

    #[test]
    fn big_integer_within_u64_is_a_number() {
        let v = Value::Integer(Integer::from_u64(u64::MAX));
        assert_eq!(v.to_json(), json!(u64::MAX));
    }

    #[test]
    fn float_uses_short_rendering() {
        assert_eq!(Value::Float(2.7).to_json(), json!(2.7));
    }

    #[test]
    fn decimal_falls_back_to_string_when_f64_loses_digits() {
        let short = BigDecimal::from_str("19.99").unwrap();
        assert_eq!(Value::Decimal(short).to_json(), json!(19.99));

        let long = BigDecimal::from_str("79228162514264337593543950335.123").unwrap();
        assert_eq!(
            Value::Decimal(long).to_json(),
            json!("79228162514264337593543950335.123")
        );
    }

    #[test]
    fn class_name_is_emitted_first() {
        let mut obj = Object::new(Some("Person".into()));
        obj.insert("Name".into(), "Eve".into());
        assert_eq!(
            Value::Object(obj).to_json().to_string(),
            r#"{"__class":"Person","Name":"Eve"}"#
        );
    }

    #[test]
    fn field_named_like_the_class_marker_replaces_it() {
        let mut obj = Object::new(Some("X".into()));
        obj.insert(CLASS_FIELD.into(), Value::int(1));
        assert_eq!(Value::Object(obj).to_json().to_string(), r#"{"__class":1}"#);
    }

    #[test]
    fn typed_scalars_carry_their_tag() {
        let e = Value::Typed(TypedScalar::enumeration("Color", "RED"));
        assert_eq!(
            e.to_json(),
            json!({"__type": "enum", "enum_type": "Color", "value": "RED"})
        );
        let decl = Value::Typed(TypedScalar::text(ScalarTag::ArrayDeclaration, "new int[3]"));
        assert_eq!(
            decl.to_json(),
            json!({"__type": "Array", "declaration": "new int[3]"})
        );
    }
}
