//! Column metadata and the type tag registry

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Value kind of a column.
///
/// The discriminants are the type tags written into the header of every
/// encoded table. They are persisted data: never renumber an existing kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ColumnKind {
    String = 0,
    Boolean = 1,
    Byte = 2,
    Int32 = 3,
    Int64 = 4,
    DateTime = 5,
    Decimal = 6,
    Float = 7,
    Double = 8,
    ByteArray = 9,
}

impl ColumnKind {
    /// Every registered kind, in tag order
    pub const ALL: [ColumnKind; 10] = [
        ColumnKind::String,
        ColumnKind::Boolean,
        ColumnKind::Byte,
        ColumnKind::Int32,
        ColumnKind::Int64,
        ColumnKind::DateTime,
        ColumnKind::Decimal,
        ColumnKind::Float,
        ColumnKind::Double,
        ColumnKind::ByteArray,
    ];

    /// Wire tag for this kind
    pub fn code(self) -> i64 {
        self as u8 as i64
    }

    /// Resolve a wire tag back to its kind
    pub fn from_code(code: i64) -> Result<ColumnKind> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.code() == code)
            .ok_or(Error::UnknownTypeTag {
                column: None,
                code: code.to_string(),
                position: None,
            })
    }

    fn integer_rank(self) -> Option<u8> {
        match self {
            ColumnKind::Byte => Some(0),
            ColumnKind::Int32 => Some(1),
            ColumnKind::Int64 => Some(2),
            _ => None,
        }
    }

    /// Widen the kind to accommodate another kind
    pub fn widen(self, other: ColumnKind) -> ColumnKind {
        if self == other {
            return self;
        }

        match (self.integer_rank(), other.integer_rank()) {
            (Some(a), Some(b)) => return if a > b { self } else { other },
            (Some(_), None) | (None, Some(_)) => {
                let non_integer = if self.integer_rank().is_none() { self } else { other };
                return match non_integer {
                    ColumnKind::Double | ColumnKind::Decimal => non_integer,
                    ColumnKind::Float => ColumnKind::Double,
                    _ => ColumnKind::String,
                };
            }
            (None, None) => {}
        }

        match (self, other) {
            (ColumnKind::Float, ColumnKind::Double) | (ColumnKind::Double, ColumnKind::Float) => {
                ColumnKind::Double
            }
            _ => ColumnKind::String,
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnKind::String => "string",
            ColumnKind::Boolean => "boolean",
            ColumnKind::Byte => "byte",
            ColumnKind::Int32 => "int32",
            ColumnKind::Int64 => "int64",
            ColumnKind::DateTime => "datetime",
            ColumnKind::Decimal => "decimal",
            ColumnKind::Float => "float",
            ColumnKind::Double => "double",
            ColumnKind::ByteArray => "bytes",
        };
        f.write_str(name)
    }
}

impl FromStr for ColumnKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "string" | "text" => Ok(ColumnKind::String),
            "boolean" | "bool" => Ok(ColumnKind::Boolean),
            "byte" | "u8" => Ok(ColumnKind::Byte),
            "int32" | "i32" | "int" => Ok(ColumnKind::Int32),
            "int64" | "i64" | "long" => Ok(ColumnKind::Int64),
            "datetime" | "timestamp" => Ok(ColumnKind::DateTime),
            "decimal" => Ok(ColumnKind::Decimal),
            "float" | "f32" => Ok(ColumnKind::Float),
            "double" | "f64" => Ok(ColumnKind::Double),
            "bytes" | "bytearray" | "binary" => Ok(ColumnKind::ByteArray),
            _ => Err(format!("Unknown column kind: {}", s)),
        }
    }
}

/// Column metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Column name, unique within its table
    pub name: String,
    /// Column index (0-based position)
    pub index: usize,
    /// Declared value kind
    pub kind: ColumnKind,
}

impl Column {
    /// Create a column with name, position and kind
    pub fn new(name: impl Into<String>, index: usize, kind: ColumnKind) -> Self {
        Self {
            name: name.into(),
            index,
            kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_canonical() {
        let expected = [
            (ColumnKind::String, 0),
            (ColumnKind::Boolean, 1),
            (ColumnKind::Byte, 2),
            (ColumnKind::Int32, 3),
            (ColumnKind::Int64, 4),
            (ColumnKind::DateTime, 5),
            (ColumnKind::Decimal, 6),
            (ColumnKind::Float, 7),
            (ColumnKind::Double, 8),
            (ColumnKind::ByteArray, 9),
        ];

        for (kind, code) in expected {
            assert_eq!(kind.code(), code);
            assert_eq!(ColumnKind::from_code(code).unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_code() {
        for code in [-1, 10, 42] {
            let err = ColumnKind::from_code(code).unwrap_err();
            assert!(matches!(err, Error::UnknownTypeTag { .. }));
        }
    }

    #[test]
    fn test_widen() {
        assert_eq!(ColumnKind::Int32.widen(ColumnKind::Int64), ColumnKind::Int64);
        assert_eq!(ColumnKind::Int64.widen(ColumnKind::Byte), ColumnKind::Int64);
        assert_eq!(ColumnKind::Int32.widen(ColumnKind::Double), ColumnKind::Double);
        assert_eq!(ColumnKind::Float.widen(ColumnKind::Double), ColumnKind::Double);
        assert_eq!(ColumnKind::Boolean.widen(ColumnKind::Int32), ColumnKind::String);
        assert_eq!(ColumnKind::DateTime.widen(ColumnKind::DateTime), ColumnKind::DateTime);
    }

    #[test]
    fn test_kind_names_parse_back() {
        for kind in ColumnKind::ALL {
            assert_eq!(kind.to_string().parse::<ColumnKind>().unwrap(), kind);
        }
        assert!("uuid".parse::<ColumnKind>().is_err());
    }
}
