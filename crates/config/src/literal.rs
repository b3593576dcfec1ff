//! Literal values read from environment variables.
//!
//! Responsibilities:
//! - Define `EnvValue`, the closed set of types an environment value may take.
//! - Parse literal text (`7`, `2.5`, `True`, `'text'`, `[1, 2]`, `{'k': 1}`)
//!   into an `EnvValue`.
//! - Convert between `EnvValue` and `serde_json::Value` for config overlays.
//!
//! Does NOT handle:
//! - Reading the environment or enforcing type contracts (see `loader::env`).
//!
//! Invariants:
//! - `int` and `float` are distinct kinds; `True`/`False` are `bool`, never `int`.
//! - `None` is its own kind; no [`EnvLiteral`] type has it, so it never satisfies a default.
//! - Parsing is all-or-nothing: trailing input after a value is an error.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::{Number, Value};

/// Nesting limit for lists and mappings.
const MAX_DEPTH: usize = 64;

/// The type of an [`EnvValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Int,
    Float,
    Bool,
    Str,
    List,
    Map,
    None,
}

impl ValueKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::Bool => "bool",
            ValueKind::Str => "str",
            ValueKind::List => "list",
            ValueKind::Map => "dict",
            ValueKind::None => "NoneType",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed value coerced from an environment string.
#[derive(Debug, Clone, PartialEq)]
pub enum EnvValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    List(Vec<EnvValue>),
    Map(BTreeMap<String, EnvValue>),
    /// The `None` literal.
    None,
}

impl EnvValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            EnvValue::Int(_) => ValueKind::Int,
            EnvValue::Float(_) => ValueKind::Float,
            EnvValue::Bool(_) => ValueKind::Bool,
            EnvValue::Str(_) => ValueKind::Str,
            EnvValue::List(_) => ValueKind::List,
            EnvValue::Map(_) => ValueKind::Map,
            EnvValue::None => ValueKind::None,
        }
    }

    /// Convert a JSON value into an `EnvValue`.
    ///
    /// Returns `None` for `null` (anywhere in the tree) and for unsigned
    /// integers that do not fit in `i64`.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Bool(b) => Some(EnvValue::Bool(*b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(EnvValue::Int(i))
                } else if n.is_f64() {
                    n.as_f64().map(EnvValue::Float)
                } else {
                    None
                }
            }
            Value::String(s) => Some(EnvValue::Str(s.clone())),
            Value::Array(items) => items
                .iter()
                .map(EnvValue::from_json)
                .collect::<Option<Vec<_>>>()
                .map(EnvValue::List),
            Value::Object(map) => map
                .iter()
                .map(|(k, v)| EnvValue::from_json(v).map(|v| (k.clone(), v)))
                .collect::<Option<BTreeMap<_, _>>>()
                .map(EnvValue::Map),
        }
    }
}

impl From<EnvValue> for Value {
    fn from(value: EnvValue) -> Self {
        match value {
            EnvValue::Int(i) => Value::from(i),
            // Non-finite floats have no JSON representation.
            EnvValue::Float(f) => Number::from_f64(f).map_or(Value::Null, Value::Number),
            EnvValue::Bool(b) => Value::Bool(b),
            EnvValue::Str(s) => Value::String(s),
            EnvValue::List(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            EnvValue::Map(map) => {
                Value::Object(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
            EnvValue::None => Value::Null,
        }
    }
}

/// Rust types that can be read from the environment through [`EnvValue`].
///
/// `KIND` is the single source of truth for the type an environment value
/// must resolve to.
pub trait EnvLiteral: Sized {
    const KIND: ValueKind;

    /// Extract `Self` from a value of kind `KIND`, or `None` if it does not fit.
    fn from_env_value(value: EnvValue) -> Option<Self>;
}

macro_rules! int_literal {
    ($($ty:ty),*) => {
        $(
            impl EnvLiteral for $ty {
                const KIND: ValueKind = ValueKind::Int;

                fn from_env_value(value: EnvValue) -> Option<Self> {
                    match value {
                        EnvValue::Int(i) => <$ty>::try_from(i).ok(),
                        _ => None,
                    }
                }
            }
        )*
    };
}

int_literal!(i64, i32, u16, u32, u64, usize);

impl EnvLiteral for f64 {
    const KIND: ValueKind = ValueKind::Float;

    fn from_env_value(value: EnvValue) -> Option<Self> {
        match value {
            EnvValue::Float(f) => Some(f),
            _ => None,
        }
    }
}

impl EnvLiteral for bool {
    const KIND: ValueKind = ValueKind::Bool;

    fn from_env_value(value: EnvValue) -> Option<Self> {
        match value {
            EnvValue::Bool(b) => Some(b),
            _ => None,
        }
    }
}

impl EnvLiteral for String {
    const KIND: ValueKind = ValueKind::Str;

    fn from_env_value(value: EnvValue) -> Option<Self> {
        match value {
            EnvValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl EnvLiteral for Vec<EnvValue> {
    const KIND: ValueKind = ValueKind::List;

    fn from_env_value(value: EnvValue) -> Option<Self> {
        match value {
            EnvValue::List(items) => Some(items),
            _ => None,
        }
    }
}

impl EnvLiteral for BTreeMap<String, EnvValue> {
    const KIND: ValueKind = ValueKind::Map;

    fn from_env_value(value: EnvValue) -> Option<Self> {
        match value {
            EnvValue::Map(map) => Some(map),
            _ => None,
        }
    }
}

/// Error returned when text is not a valid literal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid literal at position {position}: {message}")]
pub struct LiteralError {
    pub position: usize,
    pub message: &'static str,
}

/// Parse literal text into an [`EnvValue`].
///
/// Surrounding whitespace is ignored.
pub fn parse_literal(input: &str) -> Result<EnvValue, LiteralError> {
    let mut parser = Parser {
        text: input,
        pos: 0,
        depth: 0,
    };
    parser.skip_ws();
    let value = parser.value()?;
    parser.skip_ws();
    if parser.pos != input.len() {
        return Err(parser.error("unexpected trailing input"));
    }
    Ok(value)
}

struct Parser<'a> {
    text: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<u8> {
        self.text.as_bytes().get(self.pos).copied()
    }

    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    fn error(&self, message: &'static str) -> LiteralError {
        LiteralError {
            position: self.pos,
            message,
        }
    }

    fn eat(&mut self, byte: u8) -> bool {
        if self.peek() == Some(byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\n' | b'\r')) {
            self.pos += 1;
        }
    }

    fn value(&mut self) -> Result<EnvValue, LiteralError> {
        match self.peek() {
            Some(b'[') => self.nested(Self::list),
            Some(b'{') => self.nested(Self::map),
            Some(b'\'' | b'"') => self.string().map(EnvValue::Str),
            Some(b'+' | b'-' | b'.' | b'0'..=b'9') => self.number(),
            Some(_) => self.keyword(),
            None => Err(self.error("empty literal")),
        }
    }

    fn nested(
        &mut self,
        parse: fn(&mut Self) -> Result<EnvValue, LiteralError>,
    ) -> Result<EnvValue, LiteralError> {
        if self.depth >= MAX_DEPTH {
            return Err(self.error("nesting too deep"));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn keyword(&mut self) -> Result<EnvValue, LiteralError> {
        let rest = self.rest();
        let len = rest
            .bytes()
            .take_while(|b| b.is_ascii_alphanumeric() || *b == b'_')
            .count();
        let value = match &rest[..len] {
            "True" => EnvValue::Bool(true),
            "False" => EnvValue::Bool(false),
            "None" => EnvValue::None,
            _ => return Err(self.error("unknown identifier")),
        };
        self.pos += len;
        Ok(value)
    }

    fn string(&mut self) -> Result<String, LiteralError> {
        let quote = match self.peek() {
            Some(q @ (b'\'' | b'"')) => char::from(q),
            _ => return Err(self.error("expected string")),
        };
        self.pos += 1;

        let mut out = String::new();
        loop {
            let c = self
                .rest()
                .chars()
                .next()
                .ok_or_else(|| self.error("unterminated string"))?;
            self.pos += c.len_utf8();
            match c {
                c if c == quote => return Ok(out),
                '\n' => return Err(self.error("unterminated string")),
                '\\' => {
                    let escaped = self
                        .rest()
                        .chars()
                        .next()
                        .ok_or_else(|| self.error("unterminated string"))?;
                    self.pos += escaped.len_utf8();
                    match escaped {
                        '\\' | '\'' | '"' => out.push(escaped),
                        'n' => out.push('\n'),
                        't' => out.push('\t'),
                        'r' => out.push('\r'),
                        '0' => out.push('\0'),
                        other => {
                            // Unknown escapes are kept verbatim.
                            out.push('\\');
                            out.push(other);
                        }
                    }
                }
                c => out.push(c),
            }
        }
    }

    fn number(&mut self) -> Result<EnvValue, LiteralError> {
        let text = self.text;
        let bytes = text.as_bytes();
        let mut end = self.pos;
        if matches!(bytes.get(end), Some(b'+' | b'-')) {
            end += 1;
        }
        let body_start = end;
        while let Some(&b) = bytes.get(end) {
            let after_exponent = end > body_start
                && matches!(bytes[end - 1], b'e' | b'E')
                && !has_radix_prefix(&bytes[body_start..end]);
            if b.is_ascii_alphanumeric()
                || b == b'.'
                || b == b'_'
                || (after_exponent && matches!(b, b'+' | b'-'))
            {
                end += 1;
            } else {
                break;
            }
        }

        let value =
            parse_number(&text[self.pos..end]).ok_or_else(|| self.error("invalid number"))?;
        self.pos = end;
        Ok(value)
    }

    fn list(&mut self) -> Result<EnvValue, LiteralError> {
        self.pos += 1;
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            if self.eat(b']') {
                return Ok(EnvValue::List(items));
            }
            items.push(self.value()?);
            self.skip_ws();
            if self.eat(b',') {
                continue;
            }
            if self.eat(b']') {
                return Ok(EnvValue::List(items));
            }
            return Err(self.error("expected ',' or ']'"));
        }
    }

    fn map(&mut self) -> Result<EnvValue, LiteralError> {
        self.pos += 1;
        let mut map = BTreeMap::new();
        loop {
            self.skip_ws();
            if self.eat(b'}') {
                return Ok(EnvValue::Map(map));
            }
            if !matches!(self.peek(), Some(b'\'' | b'"')) {
                return Err(self.error("mapping keys must be strings"));
            }
            let key = self.string()?;
            self.skip_ws();
            if !self.eat(b':') {
                return Err(self.error("expected ':'"));
            }
            self.skip_ws();
            let value = self.value()?;
            map.insert(key, value);
            self.skip_ws();
            if self.eat(b',') {
                continue;
            }
            if self.eat(b'}') {
                return Ok(EnvValue::Map(map));
            }
            return Err(self.error("expected ',' or '}'"));
        }
    }
}

fn has_radix_prefix(body: &[u8]) -> bool {
    body.len() >= 2 && body[0] == b'0' && matches!(body[1], b'x' | b'X' | b'o' | b'O' | b'b' | b'B')
}

fn parse_number(token: &str) -> Option<EnvValue> {
    let (negative, body) = match token.as_bytes().first() {
        Some(b'-') => (true, &token[1..]),
        Some(b'+') => (false, &token[1..]),
        _ => (false, token),
    };
    if body.is_empty() || body.starts_with('_') || body.ends_with('_') || body.contains("__") {
        return None;
    }
    let digits: String = body.chars().filter(|c| *c != '_').collect();
    let lower = digits.to_ascii_lowercase();

    let signed = |magnitude: i128| {
        let value = if negative { -magnitude } else { magnitude };
        i64::try_from(value).ok().map(EnvValue::Int)
    };

    for (prefix, radix) in [("0x", 16), ("0o", 8), ("0b", 2)] {
        if let Some(rest) = lower.strip_prefix(prefix) {
            if rest.is_empty() {
                return None;
            }
            return i128::from_str_radix(rest, radix).ok().and_then(signed);
        }
    }

    if lower.bytes().all(|b| b.is_ascii_digit()) {
        // `007` is not a valid literal; `000` is.
        if lower.len() > 1 && lower.starts_with('0') && lower.bytes().any(|b| b != b'0') {
            return None;
        }
        return lower.parse::<i128>().ok().and_then(signed);
    }

    let float_shaped = lower
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'+' | b'-'))
        && lower.bytes().any(|b| b.is_ascii_digit());
    if !float_shaped {
        return None;
    }
    let magnitude: f64 = lower.parse().ok()?;
    Some(EnvValue::Float(if negative { -magnitude } else { magnitude }))
}
