//! Immediate-mode JSON object builder.
//!
//! [`JsonBuilder`] writes JSON text directly as keys and values are added,
//! without building an intermediate tree. It starts with the top-level
//! object already open and tracks nested objects as a stack of scopes.
//!
//! The builder is single-use: [`JsonBuilder::finish`] consumes it, closes
//! the root object and returns the text. Misuse (closing more objects than
//! were opened, finishing with objects still open, repeating a key within
//! one object) is reported as an [`EncodeError`] rather than producing
//! malformed output.
//!
//! Output is laid out one pair per line, indented with tabs:
//!
//! ```text
//! {
//! 	"currentScene": "flight",
//! 	"flightGlobals": {
//! 		"ready": true
//! 	}
//! }
//! ```

use std::collections::HashSet;
use std::fmt::Write as _;

use flightdeck_types::Vector3;

/// Errors raised by misuse of a [`JsonBuilder`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    /// `end_object` was called with only the root object open.
    #[error("too many end_object calls: no nested object is open")]
    UnbalancedEnd,

    /// `finish` was called while nested objects were still open.
    #[error("{open} nested object(s) still open at finish")]
    UnclosedScopes {
        /// Number of nested objects left open.
        open: usize,
    },

    /// The same key was written twice within one object.
    #[error("duplicate key {key:?} within one object")]
    DuplicateKey {
        /// The repeated key.
        key: String,
    },
}

/// A value that can be written with [`JsonBuilder::add_value`].
///
/// The variant decides the encoding. Nested objects are not values; they
/// are opened with [`JsonBuilder::start_object`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JsonValue<'a> {
    /// Encoded as `null`.
    Null,
    /// Encoded as `true` or `false`.
    Bool(bool),
    /// Encoded as a decimal integer.
    Int(i64),
    /// Encoded as a decimal number; non-finite values encode as `null`.
    Float(f64),
    /// Encoded as an escaped, quoted string.
    Text(&'a str),
    /// Encoded as a `[x, y, z]` array.
    Vector(Vector3),
}

impl From<bool> for JsonValue<'_> {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for JsonValue<'_> {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<u32> for JsonValue<'_> {
    fn from(v: u32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<i64> for JsonValue<'_> {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<usize> for JsonValue<'_> {
    fn from(v: usize) -> Self {
        i64::try_from(v).map_or(Self::Null, Self::Int)
    }
}

impl From<f32> for JsonValue<'_> {
    fn from(v: f32) -> Self {
        Self::Float(f64::from(v))
    }
}

impl From<f64> for JsonValue<'_> {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl<'a> From<&'a str> for JsonValue<'a> {
    fn from(v: &'a str) -> Self {
        Self::Text(v)
    }
}

impl<'a> From<&'a String> for JsonValue<'a> {
    fn from(v: &'a String) -> Self {
        Self::Text(v.as_str())
    }
}

impl From<Vector3> for JsonValue<'_> {
    fn from(v: Vector3) -> Self {
        Self::Vector(v)
    }
}

impl<'a, T> From<Option<T>> for JsonValue<'a>
where
    T: Into<JsonValue<'a>>,
{
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

/// Single-use, immediate-mode JSON object builder.
#[derive(Debug)]
pub struct JsonBuilder {
    buf: String,
    /// Keys written so far in each open object; index 0 is the root.
    scopes: Vec<HashSet<String>>,
    first_pair: bool,
}

impl Default for JsonBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonBuilder {
    /// Create a builder with the top-level object already open.
    pub fn new() -> Self {
        Self {
            buf: String::from("{"),
            scopes: vec![HashSet::new()],
            first_pair: true,
        }
    }

    /// Current nesting depth; the root object is depth 1.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Write `key: value` into the innermost open object.
    pub fn add_value<'a, V>(&mut self, key: &str, value: V) -> Result<(), EncodeError>
    where
        V: Into<JsonValue<'a>>,
    {
        self.write_key(key)?;
        match value.into() {
            JsonValue::Null => self.buf.push_str("null"),
            JsonValue::Bool(b) => self.buf.push_str(if b { "true" } else { "false" }),
            JsonValue::Int(n) => self.push_display(n),
            JsonValue::Float(f) => self.push_float(f),
            JsonValue::Text(s) => push_quoted(&mut self.buf, s),
            JsonValue::Vector(v) => {
                self.buf.push('[');
                self.push_float(v.x);
                self.buf.push_str(", ");
                self.push_float(v.y);
                self.buf.push_str(", ");
                self.push_float(v.z);
                self.buf.push(']');
            }
        }
        Ok(())
    }

    /// Write `key: {` and make the new object the innermost scope.
    pub fn start_object(&mut self, key: &str) -> Result<(), EncodeError> {
        self.write_key(key)?;
        self.buf.push('{');
        self.scopes.push(HashSet::new());
        self.first_pair = true;
        Ok(())
    }

    /// Close the innermost nested object.
    pub fn end_object(&mut self) -> Result<(), EncodeError> {
        if self.scopes.len() <= 1 {
            return Err(EncodeError::UnbalancedEnd);
        }
        self.scopes.pop();
        self.first_pair = false;
        self.newline();
        self.buf.push('}');
        Ok(())
    }

    /// Write a nested object whose body is produced by `body`.
    ///
    /// The object is closed after `body` returns successfully, so the
    /// start and end calls always pair up.
    pub fn object<F>(&mut self, key: &str, body: F) -> Result<(), EncodeError>
    where
        F: FnOnce(&mut Self) -> Result<(), EncodeError>,
    {
        self.start_object(key)?;
        body(self)?;
        self.end_object()
    }

    /// Close the root object and return the JSON text.
    pub fn finish(mut self) -> Result<String, EncodeError> {
        let open = self.scopes.len().saturating_sub(1);
        if open > 0 {
            return Err(EncodeError::UnclosedScopes { open });
        }
        self.buf.push_str("\n}");
        Ok(self.buf)
    }

    fn write_key(&mut self, key: &str) -> Result<(), EncodeError> {
        let inserted = self
            .scopes
            .last_mut()
            .is_some_and(|keys| keys.insert(key.to_owned()));
        if !inserted {
            return Err(EncodeError::DuplicateKey {
                key: key.to_owned(),
            });
        }
        if !self.first_pair {
            self.buf.push(',');
        }
        self.first_pair = false;
        self.newline();
        push_quoted(&mut self.buf, key);
        self.buf.push_str(": ");
        Ok(())
    }

    /// Start a new line indented one tab per open object.
    fn newline(&mut self) {
        self.buf.push('\n');
        for _ in 0..self.scopes.len() {
            self.buf.push('\t');
        }
    }

    fn push_float(&mut self, f: f64) {
        if f.is_finite() {
            self.push_display(f);
        } else {
            self.buf.push_str("null");
        }
    }

    fn push_display<T: std::fmt::Display>(&mut self, v: T) {
        // Writing into a String cannot fail.
        let _ = write!(self.buf, "{v}");
    }
}

/// Append `s` as a quoted JSON string.
fn push_quoted(buf: &mut String, s: &str) {
    buf.reserve(s.len().saturating_add(2));
    buf.push('"');
    for c in s.chars() {
        match c {
            '\\' => buf.push_str("\\\\"),
            '"' => buf.push_str("\\\""),
            '/' => buf.push_str("\\/"),
            '\u{08}' => buf.push_str("\\b"),
            '\u{0C}' => buf.push_str("\\f"),
            '\n' => buf.push_str("\\n"),
            '\r' => buf.push_str("\\r"),
            '\t' => buf.push_str("\\t"),
            c if u32::from(c) < 0x20 => {
                let _ = write!(buf, "\\u{:04x}", u32::from(c));
            }
            c => buf.push(c),
        }
    }
    buf.push('"');
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn parse(text: &str) -> serde_json::Value {
        serde_json::from_str(text).unwrap()
    }

    #[test]
    fn empty_builder_is_an_empty_object() {
        let text = JsonBuilder::new().finish().unwrap();
        assert_eq!(text, "{\n}");
        assert_eq!(parse(&text), serde_json::json!({}));
    }

    #[test]
    fn layout_is_one_pair_per_tab_indented_line() {
        let mut json = JsonBuilder::new();
        json.add_value("a", 1_i64).unwrap();
        json.start_object("b").unwrap();
        json.add_value("c", true).unwrap();
        json.end_object().unwrap();
        json.add_value("d", "x").unwrap();
        let text = json.finish().unwrap();
        assert_eq!(
            text,
            "{\n\t\"a\": 1,\n\t\"b\": {\n\t\t\"c\": true\n\t},\n\t\"d\": \"x\"\n}"
        );
    }

    #[test]
    fn nested_scopes_produce_valid_json() {
        let mut json = JsonBuilder::new();
        json.add_value("scene", "flight").unwrap();
        json.object("outer", |json| {
            json.add_value("n", 3_i32)?;
            json.object("inner", |json| {
                json.add_value("pos", Vector3::new(1.0, -2.5, 0.0))?;
                json.object("empty", |_| Ok(()))
            })?;
            json.add_value("after", false)
        })
        .unwrap();
        json.add_value("tail", 0.5_f64).unwrap();

        let value = parse(&json.finish().unwrap());
        assert_eq!(
            value,
            serde_json::json!({
                "scene": "flight",
                "outer": {
                    "n": 3,
                    "inner": { "pos": [1, -2.5, 0], "empty": {} },
                    "after": false
                },
                "tail": 0.5
            })
        );
    }

    #[test]
    fn strings_are_escaped() {
        let nasty = "a\\b \"q\" /slash/ \u{08}\u{0C}\n\r\t \u{01} caf\u{e9}";
        let mut json = JsonBuilder::new();
        json.add_value(nasty, nasty).unwrap();
        let text = json.finish().unwrap();

        assert!(text.contains("\\/slash\\/"));
        assert!(text.contains("\\u0001"));
        assert_eq!(parse(&text)[nasty], nasty);
    }

    #[test]
    fn unencodable_values_become_null() {
        let mut json = JsonBuilder::new();
        json.add_value("nan", f64::NAN).unwrap();
        json.add_value("inf", f64::INFINITY).unwrap();
        json.add_value("none", None::<f64>).unwrap();
        json.add_value("some", Some(2_u32)).unwrap();
        json.add_value("vec", Vector3::new(f64::NAN, 1.0, 2.0)).unwrap();

        let value = parse(&json.finish().unwrap());
        assert!(value["nan"].is_null());
        assert!(value["inf"].is_null());
        assert!(value["none"].is_null());
        assert_eq!(value["some"], 2);
        assert_eq!(value["vec"], serde_json::json!([null, 1, 2]));
    }

    #[test]
    fn numbers_use_plain_decimal_text() {
        let mut json = JsonBuilder::new();
        json.add_value("big", 1.0e21_f64).unwrap();
        json.add_value("small", -0.000_125_f64).unwrap();
        json.add_value("int", i64::MIN).unwrap();
        let text = json.finish().unwrap();

        assert!(text.contains("\"small\": -0.000125"));
        let value = parse(&text);
        assert_eq!(value["big"].as_f64(), Some(1.0e21));
        assert_eq!(value["int"].as_i64(), Some(i64::MIN));
    }

    #[test]
    fn extra_end_object_fails() {
        let mut json = JsonBuilder::new();
        assert_eq!(json.end_object(), Err(EncodeError::UnbalancedEnd));

        json.start_object("a").unwrap();
        json.end_object().unwrap();
        assert_eq!(json.end_object(), Err(EncodeError::UnbalancedEnd));
    }

    #[test]
    fn finishing_with_open_objects_fails() {
        let mut json = JsonBuilder::new();
        json.start_object("a").unwrap();
        json.start_object("b").unwrap();
        assert_eq!(json.depth(), 3);
        assert_eq!(json.finish(), Err(EncodeError::UnclosedScopes { open: 2 }));
    }

    #[test]
    fn duplicate_keys_in_one_object_fail() {
        let mut json = JsonBuilder::new();
        json.add_value("k", 1_i32).unwrap();
        assert_eq!(
            json.add_value("k", 2_i32),
            Err(EncodeError::DuplicateKey {
                key: "k".to_owned()
            })
        );
        assert!(json.start_object("k").is_err());
    }

    #[test]
    fn same_key_in_different_objects_is_allowed() {
        let mut json = JsonBuilder::new();
        json.add_value("name", "root").unwrap();
        json.object("child", |json| json.add_value("name", "child"))
            .unwrap();
        json.object("sibling", |json| json.add_value("name", "sibling"))
            .unwrap();
        let value = parse(&json.finish().unwrap());
        assert_eq!(value["child"]["name"], "child");
        assert_eq!(value["sibling"]["name"], "sibling");
    }

    #[test]
    fn object_helper_propagates_body_errors() {
        let mut json = JsonBuilder::new();
        let result = json.object("a", |json| {
            json.add_value("x", 1_i32)?;
            json.add_value("x", 2_i32)
        });
        assert!(matches!(result, Err(EncodeError::DuplicateKey { .. })));
    }
}
