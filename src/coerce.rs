//! Operator text to typed value conversion.
//!
//! Only a small literal grammar is understood: numbers, booleans, null,
//! quoted strings and flat sequences or mappings of those. Anything else is
//! kept as the text the operator typed.

use serde_json::{Map, Number, Value};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LiteralError {
    #[error("empty literal")]
    Empty,
    #[error("unexpected character `{found}` at offset {offset}")]
    Unexpected { found: char, offset: usize },
    #[error("unexpected end of literal")]
    UnexpectedEnd,
    #[error("unterminated string starting at offset {offset}")]
    UnterminatedString { offset: usize },
    #[error("unsupported escape `\\{0}`")]
    UnsupportedEscape(char),
    #[error("invalid number `{0}`")]
    InvalidNumber(String),
    #[error("unknown name `{0}`")]
    UnknownName(String),
    #[error("nested containers are not accepted")]
    Nested,
    #[error("trailing input at offset {offset}")]
    Trailing { offset: usize },
}

/// Returns the parsed literal, or the original text when it is not one.
pub fn coerce_value(raw: &str) -> Value {
    parse_literal(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

pub fn parse_literal(text: &str) -> Result<Value, LiteralError> {
    let mut parser = Parser::new(text);
    parser.skip_ws();
    if parser.at_end() {
        return Err(LiteralError::Empty);
    }
    let value = parser.parse_value(0)?;
    parser.skip_ws();
    if !parser.at_end() {
        return Err(LiteralError::Trailing {
            offset: parser.pos,
        });
    }
    Ok(value)
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            pos: 0,
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += 1;
        Some(ch)
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn unexpected(&self) -> LiteralError {
        match self.peek() {
            Some(found) => LiteralError::Unexpected {
                found,
                offset: self.pos,
            },
            None => LiteralError::UnexpectedEnd,
        }
    }

    fn parse_value(&mut self, depth: usize) -> Result<Value, LiteralError> {
        match self.peek() {
            Some('[') => {
                if depth > 0 {
                    return Err(LiteralError::Nested);
                }
                self.pos += 1;
                self.parse_elements(']', depth + 1).map(Value::Array)
            }
            Some('{') => {
                if depth > 0 {
                    return Err(LiteralError::Nested);
                }
                self.pos += 1;
                self.parse_mapping(depth + 1).map(Value::Object)
            }
            Some('(') => {
                self.pos += 1;
                self.parse_parenthesized(depth)
            }
            Some(quote @ ('\'' | '"')) => {
                self.pos += 1;
                self.parse_string(quote).map(Value::String)
            }
            Some(_) => self.parse_scalar_token(),
            None => Err(LiteralError::UnexpectedEnd),
        }
    }

    fn parse_elements(&mut self, close: char, depth: usize) -> Result<Vec<Value>, LiteralError> {
        self.skip_ws();
        if self.peek() == Some(close) {
            self.pos += 1;
            return Ok(Vec::new());
        }
        self.parse_remaining_elements(close, depth)
    }

    /// Consumes the separator after an element. Returns true once `close`
    /// has been consumed.
    fn finish_element(&mut self, close: char) -> Result<bool, LiteralError> {
        self.skip_ws();
        match self.peek() {
            Some(',') => {
                self.pos += 1;
                self.skip_ws();
                if self.peek() == Some(close) {
                    self.pos += 1;
                    return Ok(true);
                }
                Ok(false)
            }
            Some(ch) if ch == close => {
                self.pos += 1;
                Ok(true)
            }
            _ => Err(self.unexpected()),
        }
    }

    fn parse_parenthesized(&mut self, depth: usize) -> Result<Value, LiteralError> {
        self.skip_ws();
        if self.peek() == Some(')') {
            if depth > 0 {
                return Err(LiteralError::Nested);
            }
            self.pos += 1;
            return Ok(Value::Array(Vec::new()));
        }
        let first = self.parse_value(depth)?;
        self.skip_ws();
        match self.peek() {
            Some(')') => {
                self.pos += 1;
                Ok(first)
            }
            Some(',') => {
                if depth > 0 || first.is_array() || first.is_object() {
                    return Err(LiteralError::Nested);
                }
                let mut items = vec![first];
                if self.finish_element(')')? {
                    return Ok(Value::Array(items));
                }
                items.extend(self.parse_remaining_elements(')', depth + 1)?);
                Ok(Value::Array(items))
            }
            _ => Err(self.unexpected()),
        }
    }

    fn parse_remaining_elements(
        &mut self,
        close: char,
        depth: usize,
    ) -> Result<Vec<Value>, LiteralError> {
        let mut items = Vec::new();
        loop {
            items.push(self.parse_value(depth)?);
            if self.finish_element(close)? {
                return Ok(items);
            }
        }
    }

    fn parse_mapping(&mut self, depth: usize) -> Result<Map<String, Value>, LiteralError> {
        let mut map = Map::new();
        self.skip_ws();
        if self.peek() == Some('}') {
            self.pos += 1;
            return Ok(map);
        }
        loop {
            let key = self.parse_value(depth)?;
            self.skip_ws();
            if self.peek() != Some(':') {
                return Err(self.unexpected());
            }
            self.pos += 1;
            self.skip_ws();
            let value = self.parse_value(depth)?;
            map.insert(mapping_key(key), value);
            if self.finish_element('}')? {
                return Ok(map);
            }
        }
    }

    fn parse_string(&mut self, quote: char) -> Result<String, LiteralError> {
        let start = self.pos.saturating_sub(1);
        let mut out = String::new();
        loop {
            let Some(ch) = self.bump() else {
                return Err(LiteralError::UnterminatedString { offset: start });
            };
            match ch {
                '\\' => {
                    let Some(escaped) = self.bump() else {
                        return Err(LiteralError::UnterminatedString { offset: start });
                    };
                    out.push(match escaped {
                        'n' => '\n',
                        't' => '\t',
                        'r' => '\r',
                        '0' => '\0',
                        '\\' | '\'' | '"' => escaped,
                        other => return Err(LiteralError::UnsupportedEscape(other)),
                    });
                }
                '\n' => return Err(LiteralError::UnterminatedString { offset: start }),
                ch if ch == quote => return Ok(out),
                ch => out.push(ch),
            }
        }
    }

    fn parse_scalar_token(&mut self) -> Result<Value, LiteralError> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '_' | '.' | '+' | '-'))
        {
            self.pos += 1;
        }
        if self.pos == start {
            return Err(self.unexpected());
        }
        let token: String = self.chars[start..self.pos].iter().collect();
        match token.as_str() {
            "True" | "true" => Ok(Value::Bool(true)),
            "False" | "false" => Ok(Value::Bool(false)),
            "None" | "null" => Ok(Value::Null),
            _ if token.starts_with(|ch: char| ch.is_ascii_digit() || matches!(ch, '+' | '-' | '.')) => {
                parse_number(&token).map(Value::Number)
            }
            _ => Err(LiteralError::UnknownName(token)),
        }
    }
}

fn mapping_key(key: Value) -> String {
    match key {
        Value::String(text) => text,
        other => other.to_string(),
    }
}

fn parse_number(token: &str) -> Result<Number, LiteralError> {
    let invalid = || LiteralError::InvalidNumber(token.to_string());
    let (negative, body) = if let Some(rest) = token.strip_prefix('-') {
        (true, rest)
    } else {
        (false, token.strip_prefix('+').unwrap_or(token))
    };
    if body.is_empty() || body.starts_with(['+', '-']) {
        return Err(invalid());
    }

    let radix = match body.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        let digits = &body[2..];
        if !digits.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(invalid());
        }
        let magnitude = i128::from_str_radix(digits, radix).map_err(|_| invalid())?;
        return signed_integer(magnitude, negative).ok_or_else(invalid);
    }

    if body.bytes().all(|b| b.is_ascii_digit()) {
        if body.len() > 1 && body.starts_with('0') && body.bytes().any(|b| b != b'0') {
            return Err(invalid());
        }
        let magnitude: i128 = body.parse().map_err(|_| invalid())?;
        return signed_integer(magnitude, negative).ok_or_else(invalid);
    }

    let float_shaped = body.bytes().any(|b| b.is_ascii_digit())
        && body
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'));
    if !float_shaped {
        return Err(invalid());
    }
    let magnitude: f64 = body.parse().map_err(|_| invalid())?;
    if !magnitude.is_finite() {
        return Err(invalid());
    }
    Number::from_f64(if negative { -magnitude } else { magnitude }).ok_or_else(invalid)
}

fn signed_integer(magnitude: i128, negative: bool) -> Option<Number> {
    let value = if negative {
        magnitude.checked_neg()?
    } else {
        magnitude
    };
    integer_number(value)
}

fn integer_number(value: i128) -> Option<Number> {
    if let Ok(small) = i64::try_from(value) {
        return Some(Number::from(small));
    }
    u64::try_from(value).ok().map(Number::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn integers_floats_and_radix_prefixes() {
        assert_eq!(parse_literal("42"), Ok(json!(42)));
        assert_eq!(parse_literal("  -7 "), Ok(json!(-7)));
        assert_eq!(parse_literal("+3"), Ok(json!(3)));
        assert_eq!(parse_literal("0x1f"), Ok(json!(31)));
        assert_eq!(parse_literal("0b101"), Ok(json!(5)));
        assert_eq!(parse_literal("1.5"), Ok(json!(1.5)));
        assert_eq!(parse_literal("2e3"), Ok(json!(2000.0)));
        assert_eq!(parse_literal(".5"), Ok(json!(0.5)));
        assert_eq!(parse_literal("18446744073709551615"), Ok(json!(u64::MAX)));
    }

    #[test]
    fn rejects_malformed_numbers() {
        assert!(matches!(
            parse_literal("007"),
            Err(LiteralError::InvalidNumber(_))
        ));
        assert!(matches!(
            parse_literal("1e999"),
            Err(LiteralError::InvalidNumber(_))
        ));
        assert!(matches!(
            parse_literal("1_000"),
            Err(LiteralError::InvalidNumber(_))
        ));
        assert!(parse_literal("99999999999999999999999").is_err());
    }

    #[test]
    fn sign_is_accepted_once_before_the_digits() {
        for raw in ["0x-5", "0x+5", "--5", "+-5", "-+1.5", "0b-1"] {
            assert!(
                matches!(parse_literal(raw), Err(LiteralError::InvalidNumber(_))),
                "{raw}"
            );
        }
        assert!(matches!(
            parse_literal("-0x-80000000000000000000000000000000"),
            Err(LiteralError::InvalidNumber(_))
        ));
        assert_eq!(parse_literal("-0x10"), Ok(json!(-16)));
        assert_eq!(parse_literal("1e-3"), Ok(json!(0.001)));
    }

    #[test]
    fn names_and_quoted_strings() {
        assert_eq!(parse_literal("True"), Ok(json!(true)));
        assert_eq!(parse_literal("false"), Ok(json!(false)));
        assert_eq!(parse_literal("None"), Ok(Value::Null));
        assert_eq!(parse_literal("'it\\'s'"), Ok(json!("it's")));
        assert_eq!(parse_literal("\"a\\nb\""), Ok(json!("a\nb")));
        assert!(matches!(
            parse_literal("'open"),
            Err(LiteralError::UnterminatedString { offset: 0 })
        ));
        assert!(matches!(
            parse_literal("Tashkent"),
            Err(LiteralError::UnknownName(_))
        ));
    }

    #[test]
    fn flat_containers() {
        assert_eq!(parse_literal("[1, 2]"), Ok(json!([1, 2])));
        assert_eq!(parse_literal("[]"), Ok(json!([])));
        assert_eq!(parse_literal("['a', 2,]"), Ok(json!(["a", 2])));
        assert_eq!(parse_literal("(1,)"), Ok(json!([1])));
        assert_eq!(parse_literal("(1, 'x')"), Ok(json!([1, "x"])));
        assert_eq!(parse_literal("(5)"), Ok(json!(5)));
        assert_eq!(parse_literal("()"), Ok(json!([])));
        assert_eq!(
            parse_literal("{'a': 1, 2: True}"),
            Ok(json!({"a": 1, "2": true}))
        );
        assert_eq!(parse_literal("{}"), Ok(json!({})));
    }

    #[test]
    fn nested_and_trailing_input_is_rejected() {
        assert_eq!(parse_literal("[[1]]"), Err(LiteralError::Nested));
        assert_eq!(parse_literal("{'a': [1]}"), Err(LiteralError::Nested));
        assert_eq!(parse_literal("([1], 2)"), Err(LiteralError::Nested));
        assert!(matches!(
            parse_literal("1 2"),
            Err(LiteralError::Trailing { offset: 2 })
        ));
        assert!(matches!(
            parse_literal("{1, 2}"),
            Err(LiteralError::Unexpected { found: ',', .. })
        ));
        assert_eq!(parse_literal("   "), Err(LiteralError::Empty));
    }

    #[test]
    fn coerce_falls_back_to_original_text() {
        assert_eq!(coerce_value("hello world"), json!("hello world"));
        assert_eq!(coerce_value("[1, 2"), json!("[1, 2"));
        assert_eq!(coerce_value("__import__('os')"), json!("__import__('os')"));
        assert_eq!(coerce_value("42"), json!(42));
    }
}
