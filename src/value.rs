use crate::statics;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

/// A JSON number that keeps the distinction between I64, U64 and F64.
/// Editing one leaf must not reformat integers elsewhere in the document as floats.
#[derive(Debug, Clone)]
pub enum Number {
    I64(i64),
    U64(u64),
    F64(f64),
}

/// Integers compare by value whichever variant holds them; floats only equal floats.
impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Number::I64(a), Number::I64(b)) => a == b,
            (Number::U64(a), Number::U64(b)) => a == b,
            (Number::I64(i), Number::U64(u)) | (Number::U64(u), Number::I64(i)) => {
                u64::try_from(*i).is_ok_and(|i| i == *u)
            }
            (Number::F64(a), Number::F64(b)) => a == b,
            _ => false,
        }
    }
}

impl Serialize for Number {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Number::I64(v) => serializer.serialize_i64(*v),
            Number::U64(v) => serializer.serialize_u64(*v),
            Number::F64(v) => serializer.serialize_f64(*v),
        }
    }
}

impl<'de> Deserialize<'de> for Number {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct NumberVisitor;

        impl<'de> de::Visitor<'de> for NumberVisitor {
            type Value = Number;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a JSON number")
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(Number::I64(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(Number::U64(v))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
                Ok(Number::F64(v))
            }
        }

        deserializer.deserialize_any(NumberVisitor)
    }
}

/// A JSON-compatible value as edited by the tree control.
/// Object keys keep insertion order; every edit preserves it.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<Value>),
    Object(IndexMap<String, Value>),
}

impl Default for Value {
    fn default() -> Self {
        Value::Object(IndexMap::new())
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Number(Number::I64(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Number(Number::F64(v))
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl Value {
    pub fn as_object(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Arrays and objects; everything else is a leaf.
    pub fn is_container(&self) -> bool {
        matches!(self, Value::Array(_) | Value::Object(_))
    }

    pub fn parse_json5(text: &str) -> anyhow::Result<Value> {
        Ok(json5::from_str::<Value>(text)?)
    }

    /// Pretty output with 4-space indentation and always-quoted keys.
    /// Empty containers stay on one line (`{}`, `[]`). No trailing newline.
    pub fn to_json5_pretty(&self) -> String {
        let mut out = String::new();
        self.write_json5(&mut out, 0, Some(statics::NL_LF));
        out
    }

    pub fn to_json5_compact(&self) -> String {
        let mut out = String::new();
        self.write_json5(&mut out, 0, None);
        out
    }

    fn write_json5(&self, out: &mut String, indent: usize, newline: Option<&str>) {
        match self {
            Value::Null => out.push_str(statics::EN_LITERAL_NULL),
            Value::Bool(v) => out.push_str(if *v { "true" } else { "false" }),
            Value::Number(n) => n.write_json5(out),
            Value::String(s) => write_escaped_string(out, s),
            Value::Array(values) => {
                out.push('[');
                if let Some(nl) = newline
                    && !values.is_empty()
                {
                    out.push_str(nl);
                }
                for (i, v) in values.iter().enumerate() {
                    if newline.is_some() {
                        out.push_str(&" ".repeat(indent + 4));
                    } else if i > 0 {
                        out.push(' ');
                    }
                    v.write_json5(out, indent + 4, newline);
                    if i + 1 != values.len() {
                        out.push(',');
                    }
                    if let Some(nl) = newline {
                        out.push_str(nl);
                    }
                }
                if newline.is_some() && !values.is_empty() {
                    out.push_str(&" ".repeat(indent));
                }
                out.push(']');
            }
            Value::Object(map) => {
                out.push('{');
                if let Some(nl) = newline
                    && !map.is_empty()
                {
                    out.push_str(nl);
                }
                for (i, (k, v)) in map.iter().enumerate() {
                    if newline.is_some() {
                        out.push_str(&" ".repeat(indent + 4));
                    } else if i > 0 {
                        out.push(' ');
                    }
                    write_escaped_string(out, k);
                    out.push(':');
                    if newline.is_some() {
                        out.push(' ');
                    }
                    v.write_json5(out, indent + 4, newline);
                    if i + 1 != map.len() {
                        out.push(',');
                    }
                    if let Some(nl) = newline {
                        out.push_str(nl);
                    }
                }
                if newline.is_some() && !map.is_empty() {
                    out.push_str(&" ".repeat(indent));
                }
                out.push('}');
            }
        }
    }
}

impl Number {
    fn write_json5(&self, out: &mut String) {
        match self {
            Number::I64(v) => out.push_str(&v.to_string()),
            Number::U64(v) => out.push_str(&v.to_string()),
            Number::F64(v) => {
                if v.is_nan() {
                    out.push_str("NaN");
                } else if v.is_infinite() {
                    if v.is_sign_negative() {
                        out.push_str("-Infinity");
                    } else {
                        out.push_str("Infinity");
                    }
                } else {
                    let mut buf = ryu::Buffer::new();
                    out.push_str(buf.format(*v));
                }
            }
        }
    }
}

pub(crate) fn write_escaped_string(out: &mut String, s: &str) {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                use std::fmt::Write as _;
                write!(out, "\\u{:04x}", c as u32).ok();
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(v) => serializer.serialize_bool(*v),
            Value::Number(n) => n.serialize(serializer),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(values) => values.serialize(serializer),
            Value::Object(map) => map.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ValueVisitor;

        impl<'de> de::Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a JSON value")
            }

            fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(Value::Null)
            }

            fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(Value::Null)
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
                Ok(Value::Bool(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(Value::Number(Number::I64(v)))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(Value::Number(Number::U64(v)))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
                Ok(Value::Number(Number::F64(v)))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Ok(Value::String(v.to_owned()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
                Ok(Value::String(v))
            }

            fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let mut values = Vec::new();
                while let Some(value) = seq.next_element::<Value>()? {
                    values.push(value);
                }
                Ok(Value::Array(values))
            }

            fn visit_map<A: de::MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut values = IndexMap::new();
                while let Some((key, value)) = map.next_entry::<String, Value>()? {
                    values.insert(key, value);
                }
                Ok(Value::Object(values))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::{Number, Value};
    use indexmap::IndexMap;

    #[test]
    fn parse_json5_supports_infinity_and_nan() {
        let v = Value::parse_json5("{ a: Infinity, b: -Infinity, c: NaN }").unwrap();
        let obj = v.as_object().unwrap();

        match obj.get("a").unwrap() {
            Value::Number(Number::F64(x)) => assert!(x.is_infinite() && x.is_sign_positive()),
            _ => panic!("expected Infinity"),
        }
        match obj.get("b").unwrap() {
            Value::Number(Number::F64(x)) => assert!(x.is_infinite() && x.is_sign_negative()),
            _ => panic!("expected -Infinity"),
        }
        match obj.get("c").unwrap() {
            Value::Number(Number::F64(x)) => assert!(x.is_nan()),
            _ => panic!("expected NaN"),
        }
    }

    #[test]
    fn parse_json5_keeps_key_order() {
        let v = Value::parse_json5("{ z: 1, a: 2, m: 3 }").unwrap();
        let keys: Vec<&str> = v.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn compact_output_is_single_line() {
        let v = Value::parse_json5(r#"{ a: 1, b: [true, null, "x"], c: {} }"#).unwrap();
        assert_eq!(
            v.to_json5_compact(),
            r#"{"a":1, "b":[true, null, "x"], "c":{}}"#
        );
    }

    #[test]
    fn pretty_output_indents_with_four_spaces() {
        let v = Value::parse_json5("{ a: [1, 2], b: {} }").unwrap();
        let expected = "{\n    \"a\": [\n        1,\n        2\n    ],\n    \"b\": {}\n}";
        assert_eq!(v.to_json5_pretty(), expected);
    }

    #[test]
    fn strings_escape_quotes_and_control_characters() {
        let v = Value::String("say \"hi\"\n\u{1}".to_string());
        assert_eq!(v.to_json5_compact(), "\"say \\\"hi\\\"\\n\\u0001\"");
    }

    #[test]
    fn integers_stay_integers() {
        let v = Value::parse_json5("[1, -2, 1.5]").unwrap();
        let Value::Array(items) = &v else {
            panic!("expected an array");
        };
        assert_eq!(items[0].to_json5_compact(), "1");
        assert_eq!(items[1], Value::Number(Number::I64(-2)));
        assert_eq!(items[2], Value::Number(Number::F64(1.5)));
        assert_eq!(v.to_json5_compact(), "[1, -2, 1.5]");
    }

    #[test]
    fn container_detection() {
        assert!(Value::Array(vec![]).is_container());
        assert!(Value::Object(IndexMap::new()).is_container());
        assert!(!Value::Null.is_container());
        assert!(!Value::from(3_i64).is_container());
    }

    #[test]
    fn integers_compare_by_value_across_variants() {
        assert_eq!(Value::from(4_i64), Value::parse_json5("4").unwrap());
        assert_eq!(
            Value::parse_json5("[2, 3, 4]").unwrap(),
            Value::Array(vec![
                Value::from(2_i64),
                Value::from(3_i64),
                Value::Number(Number::U64(4)),
            ])
        );
        assert_ne!(Number::I64(-1), Number::U64(u64::MAX));
        assert_ne!(Number::I64(1), Number::F64(1.0));
        assert_ne!(Value::from(1_i64), Value::parse_json5("2").unwrap());
    }
}
