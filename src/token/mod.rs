//! Pull-style JSON tokens and the reader/writer interfaces the codecs drive

mod reader;
mod writer;

use std::fmt;

use crate::error::Result;

pub use reader::ValueReader;
pub use writer::ValueWriter;

/// A single JSON token.
///
/// Numbers keep their source text so that 64-bit integers and decimals are
/// never squeezed through a float.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    StartObject,
    EndObject,
    StartArray,
    EndArray,
    PropertyName(String),
    String(String),
    Number(String),
    Bool(bool),
    Null,
}

/// Token kind without payload, for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    StartObject,
    EndObject,
    StartArray,
    EndArray,
    PropertyName,
    String,
    Number,
    Boolean,
    Null,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl Token {
    pub fn kind(&self) -> TokenKind {
        match self {
            Token::StartObject => TokenKind::StartObject,
            Token::EndObject => TokenKind::EndObject,
            Token::StartArray => TokenKind::StartArray,
            Token::EndArray => TokenKind::EndArray,
            Token::PropertyName(_) => TokenKind::PropertyName,
            Token::String(_) => TokenKind::String,
            Token::Number(_) => TokenKind::Number,
            Token::Bool(_) => TokenKind::Boolean,
            Token::Null => TokenKind::Null,
        }
    }

    /// True for value tokens that are not delimiters or property names
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Token::String(_) | Token::Number(_) | Token::Bool(_) | Token::Null
        )
    }
}

const MAX_SHOWN_TEXT: usize = 40;

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::PropertyName(text) | Token::String(text) => {
                let shown: String = text.chars().take(MAX_SHOWN_TEXT).collect();
                let ellipsis = if shown.len() < text.len() { "..." } else { "" };
                write!(f, "{} {:?}{}", self.kind(), shown, ellipsis)
            }
            Token::Number(text) => write!(f, "Number {}", text),
            Token::Bool(b) => write!(f, "Boolean {}", b),
            _ => write!(f, "{}", self.kind()),
        }
    }
}

/// Describe the token under a cursor, including the end of input
pub fn describe(token: Option<&Token>) -> String {
    match token {
        Some(token) => token.to_string(),
        None => "end of input".to_string(),
    }
}

/// A forward-only cursor over JSON tokens.
///
/// A fresh reader sits before the first token; call [`TokenReader::read`]
/// once to move onto it.
pub trait TokenReader {
    /// Token under the cursor, `None` before the first read or past the end
    fn current(&self) -> Option<&Token>;

    /// Move one token forward. Returns `false` once the input is exhausted.
    fn read(&mut self) -> Result<bool>;

    /// Number of tokens read so far, i.e. the 1-based index of the current token
    fn position(&self) -> usize;

    fn kind(&self) -> Option<TokenKind> {
        self.current().map(Token::kind)
    }
}

/// A sink for JSON tokens.
///
/// Non-finite floats have no JSON spelling; callers turn them into strings
/// before they reach the writer.
pub trait TokenWriter {
    fn start_object(&mut self) -> Result<()>;
    fn end_object(&mut self) -> Result<()>;
    fn start_array(&mut self) -> Result<()>;
    fn end_array(&mut self) -> Result<()>;
    fn property_name(&mut self, name: &str) -> Result<()>;
    fn write_null(&mut self) -> Result<()>;
    fn write_bool(&mut self, value: bool) -> Result<()>;
    fn write_i64(&mut self, value: i64) -> Result<()>;
    fn write_f32(&mut self, value: f32) -> Result<()>;
    fn write_f64(&mut self, value: f64) -> Result<()>;
    /// Write a number from its exact decimal text
    fn write_number(&mut self, text: &str) -> Result<()>;
    fn write_str(&mut self, value: &str) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_payload() {
        assert_eq!(Token::StartArray.to_string(), "StartArray");
        assert_eq!(Token::Number("12".into()).to_string(), "Number 12");
        assert_eq!(Token::PropertyName("id".into()).to_string(), "PropertyName \"id\"");
        assert_eq!(describe(None), "end of input");
    }

    #[test]
    fn test_long_strings_are_shortened() {
        let token = Token::String("x".repeat(100));
        let shown = token.to_string();
        assert!(shown.ends_with("..."));
        assert!(shown.len() < 60);
    }
}
