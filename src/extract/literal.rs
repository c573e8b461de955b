//! Parser for the literal point arrays Zeopoxa stores in `LATLON_ARRAY`.
//!
//! The column holds a list of point records written as Python/JSON style
//! literals, e.g. `[{'latitude': 45.5, 'longitude': -73.6}, ...]`. Only
//! literal data is accepted: containers, strings, numbers and the
//! `True`/`False`/`None` constants. Anything else is rejected.

use serde_json::{Map, Number, Value};

/// Deepest container nesting accepted before the input is rejected.
const MAX_DEPTH: usize = 128;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message} at offset {offset}")]
pub struct LiteralError {
    pub offset: usize,
    pub message: String,
}

/// Parse a complete literal into a JSON value.
pub fn parse(input: &str) -> Result<Value, LiteralError> {
    let mut parser = Parser {
        input,
        pos: 0,
        depth: 0,
    };
    let value = parser.value()?;
    parser.skip_whitespace();
    if parser.pos < input.len() {
        return Err(parser.error("unexpected trailing input"));
    }
    Ok(value)
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
    depth: usize,
}

impl Parser<'_> {
    fn current_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self) {
        if let Some(c) = self.current_char() {
            self.pos += c.len_utf8();
        }
    }

    fn skip_whitespace(&mut self) {
        while self.current_char().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    fn error(&self, message: impl Into<String>) -> LiteralError {
        LiteralError {
            offset: self.pos,
            message: message.into(),
        }
    }

    fn value(&mut self) -> Result<Value, LiteralError> {
        self.skip_whitespace();
        match self.current_char() {
            None => Err(self.error("unexpected end of input")),
            Some('[') => self.nested(|p| p.sequence(']')),
            Some('(') => self.nested(|p| p.sequence(')')),
            Some('{') => self.nested(Self::mapping),
            Some(quote @ ('\'' | '"')) => self.string(quote).map(Value::String),
            Some(c) if c.is_ascii_digit() || matches!(c, '-' | '+' | '.') => self.number(),
            Some(c) if c.is_alphabetic() || c == '_' => self.constant(),
            Some(c) => Err(self.error(format!("unexpected character '{c}'"))),
        }
    }

    fn nested(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<Value, LiteralError>,
    ) -> Result<Value, LiteralError> {
        if self.depth == MAX_DEPTH {
            return Err(self.error("nesting too deep"));
        }
        self.depth += 1;
        let value = parse(self);
        self.depth -= 1;
        value
    }

    fn sequence(&mut self, close: char) -> Result<Value, LiteralError> {
        self.advance();
        let mut items = Vec::new();
        loop {
            self.skip_whitespace();
            if self.current_char() == Some(close) {
                self.advance();
                return Ok(Value::Array(items));
            }
            items.push(self.value()?);
            self.skip_whitespace();
            match self.current_char() {
                Some(',') => self.advance(),
                Some(c) if c == close => {}
                _ => return Err(self.error(format!("expected ',' or '{close}'"))),
            }
        }
    }

    fn mapping(&mut self) -> Result<Value, LiteralError> {
        self.advance();
        let mut map = Map::new();
        loop {
            self.skip_whitespace();
            if self.current_char() == Some('}') {
                self.advance();
                return Ok(Value::Object(map));
            }
            let key = match self.value()? {
                Value::String(key) => key,
                Value::Number(key) => key.to_string(),
                _ => return Err(self.error("dictionary keys must be strings or numbers")),
            };
            self.skip_whitespace();
            if self.current_char() != Some(':') {
                return Err(self.error("expected ':'"));
            }
            self.advance();
            let value = self.value()?;
            map.insert(key, value);
            self.skip_whitespace();
            match self.current_char() {
                Some(',') => self.advance(),
                Some('}') => {}
                _ => return Err(self.error("expected ',' or '}'")),
            }
        }
    }

    fn string(&mut self, quote: char) -> Result<String, LiteralError> {
        self.advance();
        let mut value = String::new();
        loop {
            let Some(c) = self.current_char() else {
                return Err(self.error("unterminated string"));
            };
            self.advance();
            if c == quote {
                return Ok(value);
            }
            if c != '\\' {
                value.push(c);
                continue;
            }
            let Some(escaped) = self.current_char() else {
                return Err(self.error("unterminated string"));
            };
            self.advance();
            match escaped {
                'n' => value.push('\n'),
                't' => value.push('\t'),
                'r' => value.push('\r'),
                '0' => value.push('\0'),
                '\\' | '\'' | '"' => value.push(escaped),
                'x' => value.push(self.hex_escape(2)?),
                'u' => value.push(self.hex_escape(4)?),
                other => {
                    value.push('\\');
                    value.push(other);
                }
            }
        }
    }

    fn hex_escape(&mut self, digits: usize) -> Result<char, LiteralError> {
        let end = self.pos + digits;
        let code = self
            .input
            .get(self.pos..end)
            .and_then(|hex| u32::from_str_radix(hex, 16).ok())
            .and_then(char::from_u32)
            .ok_or_else(|| self.error("invalid escape sequence"))?;
        self.pos = end;
        Ok(code)
    }

    fn number(&mut self) -> Result<Value, LiteralError> {
        let start = self.pos;
        while self
            .current_char()
            .is_some_and(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
        {
            self.advance();
        }
        let text = &self.input[start..self.pos];
        if !text.contains(['.', 'e', 'E']) {
            if let Ok(int) = text.parse::<i64>() {
                return Ok(Value::Number(int.into()));
            }
        }
        text.parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| LiteralError {
                offset: start,
                message: format!("invalid number '{text}'"),
            })
    }

    fn constant(&mut self) -> Result<Value, LiteralError> {
        let start = self.pos;
        while self
            .current_char()
            .is_some_and(|c| c.is_alphanumeric() || c == '_')
        {
            self.advance();
        }
        match &self.input[start..self.pos] {
            "True" | "true" => Ok(Value::Bool(true)),
            "False" | "false" => Ok(Value::Bool(false)),
            "None" | "null" => Ok(Value::Null),
            name => Err(LiteralError {
                offset: start,
                message: format!("names are not allowed: '{name}'"),
            }),
        }
    }
}
