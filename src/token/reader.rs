//! Token reader over a JSON document

use std::fmt;
use std::io::Read;

use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde_json::value::RawValue;
use serde_json::Value;

use super::{Token, TokenReader};
use crate::error::Result;

/// A JSON value waiting to be unwound.
///
/// Text input stays raw until the cursor reaches it, so object entries come
/// out exactly as written, repeated keys included.
enum Item {
    Parsed(Value),
    Raw(Box<RawValue>),
}

/// Object entries in source order, without merging repeated keys
struct Entries(Vec<(String, Box<RawValue>)>);

impl<'de> Deserialize<'de> for Entries {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = Entries;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<Entries, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, Box<RawValue>>()? {
                    entries.push(entry);
                }
                Ok(Entries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

enum Frame {
    Array(std::vec::IntoIter<Item>),
    Object(std::vec::IntoIter<(String, Item)>),
}

/// Pulls tokens out of a JSON document one at a time.
///
/// The document is checked for syntax up front and then unwound lazily as
/// the cursor advances. Object keys keep their order and are never merged.
pub struct ValueReader {
    stack: Vec<Frame>,
    pending: Option<Item>,
    current: Option<Token>,
    position: usize,
}

impl ValueReader {
    pub fn new(value: Value) -> Self {
        Self::with_root(Item::Parsed(value))
    }

    fn with_root(root: Item) -> Self {
        Self {
            stack: Vec::new(),
            pending: Some(root),
            current: None,
            position: 0,
        }
    }

    /// Parse a JSON document from text
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self::with_root(Item::Raw(serde_json::from_str(json)?)))
    }

    /// Parse a JSON document from a byte stream
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(Self::with_root(Item::Raw(serde_json::from_reader(reader)?)))
    }

    fn open(&mut self, item: Item) -> Result<Token> {
        let value = match item {
            Item::Parsed(value) => value,
            Item::Raw(raw) => match raw.get().as_bytes().first() {
                Some(b'{') => {
                    let Entries(entries) = serde_json::from_str(raw.get())?;
                    return Ok(self.open_object(
                        entries.into_iter().map(|(k, v)| (k, Item::Raw(v))).collect(),
                    ));
                }
                Some(b'[') => {
                    let items: Vec<Box<RawValue>> = serde_json::from_str(raw.get())?;
                    return Ok(self.open_array(items.into_iter().map(Item::Raw).collect()));
                }
                _ => serde_json::from_str(raw.get())?,
            },
        };

        let token = match value {
            Value::Null => Token::Null,
            Value::Bool(b) => Token::Bool(b),
            Value::Number(n) => Token::Number(n.to_string()),
            Value::String(s) => Token::String(s),
            Value::Array(items) => self.open_array(items.into_iter().map(Item::Parsed).collect()),
            Value::Object(entries) => self.open_object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, Item::Parsed(v)))
                    .collect(),
            ),
        };
        Ok(token)
    }

    fn open_array(&mut self, items: Vec<Item>) -> Token {
        self.stack.push(Frame::Array(items.into_iter()));
        Token::StartArray
    }

    fn open_object(&mut self, entries: Vec<(String, Item)>) -> Token {
        self.stack.push(Frame::Object(entries.into_iter()));
        Token::StartObject
    }

    fn next_token(&mut self) -> Result<Option<Token>> {
        if let Some(item) = self.pending.take() {
            return self.open(item).map(Some);
        }

        let Some(frame) = self.stack.last_mut() else {
            return Ok(None);
        };
        match frame {
            Frame::Array(items) => match items.next() {
                Some(item) => self.open(item).map(Some),
                None => {
                    self.stack.pop();
                    Ok(Some(Token::EndArray))
                }
            },
            Frame::Object(entries) => match entries.next() {
                Some((key, item)) => {
                    self.pending = Some(item);
                    Ok(Some(Token::PropertyName(key)))
                }
                None => {
                    self.stack.pop();
                    Ok(Some(Token::EndObject))
                }
            },
        }
    }
}

impl TokenReader for ValueReader {
    fn current(&self) -> Option<&Token> {
        self.current.as_ref()
    }

    fn read(&mut self) -> Result<bool> {
        self.current = self.next_token()?;
        if self.current.is_some() {
            self.position += 1;
        }
        Ok(self.current.is_some())
    }

    fn position(&self) -> usize {
        self.position
    }
}
