//! Token writer that assembles a `serde_json::Value`

use serde_json::{Map, Number, Value};

use super::TokenWriter;
use crate::error::{Error, Result};

enum Frame {
    Array(Vec<Value>),
    Object {
        entries: Map<String, Value>,
        key: Option<String>,
    },
}

/// Builds a JSON document from a token sequence.
///
/// Misnested calls, values without a property name inside an object and
/// repeated property names are reported as [`Error::Writer`].
#[derive(Default)]
pub struct ValueWriter {
    stack: Vec<Frame>,
    root: Option<Value>,
}

impl ValueWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the finished document
    pub fn finish(self) -> Result<Value> {
        if !self.stack.is_empty() {
            return Err(Error::Writer(format!(
                "{} unclosed container(s)",
                self.stack.len()
            )));
        }
        self.root
            .ok_or_else(|| Error::Writer("nothing was written".to_string()))
    }

    fn push(&mut self, value: Value) -> Result<()> {
        match self.stack.last_mut() {
            None => {
                if self.root.is_some() {
                    return Err(Error::Writer("document already has a root value".to_string()));
                }
                self.root = Some(value);
            }
            Some(Frame::Array(items)) => items.push(value),
            Some(Frame::Object { entries, key }) => {
                let key = key.take().ok_or_else(|| {
                    Error::Writer("value written inside an object without a property name".to_string())
                })?;
                entries.insert(key, value);
            }
        }
        Ok(())
    }
}

impl TokenWriter for ValueWriter {
    fn start_object(&mut self) -> Result<()> {
        self.stack.push(Frame::Object {
            entries: Map::new(),
            key: None,
        });
        Ok(())
    }

    fn end_object(&mut self) -> Result<()> {
        match self.stack.pop() {
            Some(Frame::Object { entries, key: None }) => self.push(Value::Object(entries)),
            Some(Frame::Object { key: Some(key), .. }) => Err(Error::Writer(format!(
                "property '{}' has no value",
                key
            ))),
            _ => Err(Error::Writer("end_object without a matching start_object".to_string())),
        }
    }

    fn start_array(&mut self) -> Result<()> {
        self.stack.push(Frame::Array(Vec::new()));
        Ok(())
    }

    fn end_array(&mut self) -> Result<()> {
        match self.stack.pop() {
            Some(Frame::Array(items)) => self.push(Value::Array(items)),
            _ => Err(Error::Writer("end_array without a matching start_array".to_string())),
        }
    }

    fn property_name(&mut self, name: &str) -> Result<()> {
        match self.stack.last_mut() {
            Some(Frame::Object { entries, key }) => {
                if key.is_some() {
                    return Err(Error::Writer(format!("property '{}' follows a property with no value", name)));
                }
                if entries.contains_key(name) {
                    return Err(Error::Writer(format!("duplicate property name '{}'", name)));
                }
                *key = Some(name.to_string());
                Ok(())
            }
            _ => Err(Error::Writer(format!("property '{}' written outside an object", name))),
        }
    }

    fn write_null(&mut self) -> Result<()> {
        self.push(Value::Null)
    }

    fn write_bool(&mut self, value: bool) -> Result<()> {
        self.push(Value::Bool(value))
    }

    fn write_i64(&mut self, value: i64) -> Result<()> {
        self.push(Value::from(value))
    }

    fn write_f32(&mut self, value: f32) -> Result<()> {
        if !value.is_finite() {
            return Err(Error::Writer(format!("{} has no JSON number form", value)));
        }
        let value = serde_json::to_value(value)?;
        self.push(value)
    }

    fn write_f64(&mut self, value: f64) -> Result<()> {
        let number = Number::from_f64(value)
            .ok_or_else(|| Error::Writer(format!("{} has no JSON number form", value)))?;
        self.push(Value::Number(number))
    }

    fn write_number(&mut self, text: &str) -> Result<()> {
        let number: Number = serde_json::from_str(text)
            .map_err(|_| Error::Writer(format!("'{}' is not a JSON number", text)))?;
        self.push(Value::Number(number))
    }

    fn write_str(&mut self, value: &str) -> Result<()> {
        self.push(Value::String(value.to_string()))
    }
}
