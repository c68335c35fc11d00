//! Per-kind cell conventions on the wire

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

use crate::error::Result;
use crate::model::{CellValue, ColumnKind, DATETIME_FORMAT};
use crate::token::{Token, TokenWriter};

const NAN: &str = "NaN";
const INFINITY: &str = "Infinity";
const NEG_INFINITY: &str = "-Infinity";

/// Write one cell in its wire form
pub fn write_cell<W: TokenWriter + ?Sized>(writer: &mut W, cell: &CellValue) -> Result<()> {
    match cell {
        CellValue::Null => writer.write_null(),
        CellValue::String(s) => writer.write_str(s),
        CellValue::Bool(b) => writer.write_bool(*b),
        CellValue::Byte(b) => writer.write_i64(i64::from(*b)),
        CellValue::Int32(i) => writer.write_i64(i64::from(*i)),
        CellValue::Int64(i) => writer.write_i64(*i),
        CellValue::DateTime(dt) => writer.write_str(&dt.format(DATETIME_FORMAT).to_string()),
        CellValue::Decimal(d) => writer.write_number(&d.to_string()),
        CellValue::Float(f) => match non_finite_text(f64::from(*f)) {
            Some(text) => writer.write_str(text),
            None => writer.write_f32(*f),
        },
        CellValue::Double(f) => match non_finite_text(*f) {
            Some(text) => writer.write_str(text),
            None => writer.write_f64(*f),
        },
        CellValue::Bytes(bytes) => writer.write_str(&STANDARD.encode(bytes)),
    }
}

fn non_finite_text(value: f64) -> Option<&'static str> {
    if value.is_nan() {
        Some(NAN)
    } else if value == f64::INFINITY {
        Some(INFINITY)
    } else if value == f64::NEG_INFINITY {
        Some(NEG_INFINITY)
    } else {
        None
    }
}

/// Interpret a scalar token as a value of `kind`.
///
/// `null` is [`CellValue::Null`] whatever the kind. Returns `None` when the
/// token cannot represent a value of that kind.
pub fn read_cell(token: &Token, kind: ColumnKind) -> Option<CellValue> {
    match token {
        Token::Null => Some(CellValue::Null),
        Token::String(text) => parse_text(kind, text),
        Token::Number(text) => match kind {
            ColumnKind::String => Some(CellValue::String(text.clone())),
            ColumnKind::Boolean | ColumnKind::DateTime | ColumnKind::ByteArray => None,
            _ => parse_text(kind, text),
        },
        Token::Bool(b) => match kind {
            ColumnKind::Boolean => Some(CellValue::Bool(*b)),
            ColumnKind::String => Some(CellValue::String(b.to_string())),
            _ => None,
        },
        _ => None,
    }
}

/// Parse the textual form of a value of `kind`
pub fn parse_text(kind: ColumnKind, text: &str) -> Option<CellValue> {
    let value = match kind {
        ColumnKind::String => CellValue::String(text.to_string()),
        ColumnKind::Boolean => {
            if text.eq_ignore_ascii_case("true") {
                CellValue::Bool(true)
            } else if text.eq_ignore_ascii_case("false") {
                CellValue::Bool(false)
            } else {
                return None;
            }
        }
        ColumnKind::Byte => CellValue::Byte(text.parse().ok()?),
        ColumnKind::Int32 => CellValue::Int32(text.parse().ok()?),
        ColumnKind::Int64 => CellValue::Int64(text.parse().ok()?),
        ColumnKind::DateTime => CellValue::DateTime(parse_datetime(text)?),
        ColumnKind::Decimal => CellValue::Decimal(parse_decimal(text)?),
        ColumnKind::Float => CellValue::Float(match text {
            NAN => f32::NAN,
            INFINITY => f32::INFINITY,
            NEG_INFINITY => f32::NEG_INFINITY,
            _ => text
                .parse()
                .ok()
                .filter(|f: &f32| f.is_finite() && !underflows(*f == 0.0, text))?,
        }),
        ColumnKind::Double => CellValue::Double(match text {
            NAN => f64::NAN,
            INFINITY => f64::INFINITY,
            NEG_INFINITY => f64::NEG_INFINITY,
            _ => text
                .parse()
                .ok()
                .filter(|f: &f64| f.is_finite() && !underflows(*f == 0.0, text))?,
        }),
        ColumnKind::ByteArray => CellValue::Bytes(STANDARD.decode(text).ok()?),
    };
    Some(value)
}

/// A non-zero literal that rounded to zero is out of range
fn underflows(is_zero: bool, text: &str) -> bool {
    let mantissa = text.split(['e', 'E']).next().unwrap_or(text);
    is_zero && mantissa.bytes().any(|b| matches!(b, b'1'..=b'9'))
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    text.parse::<Decimal>()
        .ok()
        .or_else(|| Decimal::from_scientific(text).ok())
}

/// Parse a timestamp in the canonical layout, with a space separator, as a
/// bare date, or as RFC 3339 with an offset (normalized to UTC)
pub fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, DATETIME_FORMAT) {
        return Some(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(dt);
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|dt| dt.naive_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::ValueWriter;

    fn wire(cell: CellValue) -> String {
        let mut writer = ValueWriter::new();
        write_cell(&mut writer, &cell).unwrap();
        serde_json::to_string(&writer.finish().unwrap()).unwrap()
    }

    fn number(text: &str) -> Token {
        Token::Number(text.to_string())
    }

    fn string(text: &str) -> Token {
        Token::String(text.to_string())
    }

    #[test]
    fn test_wire_forms() {
        assert_eq!(wire(CellValue::Null), "null");
        assert_eq!(wire(CellValue::Byte(255)), "255");
        assert_eq!(wire(CellValue::Int64(i64::MIN)), "-9223372036854775808");
        assert_eq!(wire(CellValue::Decimal(Decimal::MAX)), "79228162514264337593543950335");
        assert_eq!(wire(CellValue::Double(f64::NAN)), r#""NaN""#);
        assert_eq!(wire(CellValue::Float(f32::NEG_INFINITY)), r#""-Infinity""#);
        assert_eq!(wire(CellValue::Double(2.5)), "2.5");
        assert_eq!(wire(CellValue::Bytes(vec![1, 2, 3, 4, 5, 6, 7, 8, 9])), r#""AQIDBAUGBwgJ""#);
        assert_eq!(wire(CellValue::Bytes(Vec::new())), r#""""#);

        let dt = NaiveDate::from_ymd_opt(2013, 10, 15)
            .unwrap()
            .and_hms_milli_opt(10, 30, 16, 133)
            .unwrap();
        assert_eq!(wire(CellValue::DateTime(dt)), r#""2013-10-15T10:30:16.133""#);
    }

    #[test]
    fn test_null_for_every_kind() {
        for kind in ColumnKind::ALL {
            assert_eq!(read_cell(&Token::Null, kind), Some(CellValue::Null));
        }
    }

    #[test]
    fn test_numbers_by_kind() {
        assert_eq!(read_cell(&number("255"), ColumnKind::Byte), Some(CellValue::Byte(255)));
        assert_eq!(read_cell(&number("256"), ColumnKind::Byte), None);
        assert_eq!(read_cell(&number("-1"), ColumnKind::Byte), None);
        assert_eq!(read_cell(&number("2147483648"), ColumnKind::Int32), None);
        assert_eq!(
            read_cell(&number("2147483648"), ColumnKind::Int64),
            Some(CellValue::Int64(2147483648))
        );
        assert_eq!(read_cell(&number("1.5"), ColumnKind::Int32), None);
        assert_eq!(
            read_cell(&number("1e3"), ColumnKind::Decimal),
            Some(CellValue::Decimal(Decimal::from(1000)))
        );
        assert_eq!(read_cell(&number("1"), ColumnKind::Boolean), None);
        assert_eq!(
            read_cell(&number("42"), ColumnKind::String),
            Some(CellValue::String("42".into()))
        );
    }

    #[test]
    fn test_float_specials() {
        assert_eq!(read_cell(&string("NaN"), ColumnKind::Double), Some(CellValue::Double(f64::NAN)));
        assert_eq!(
            read_cell(&string("Infinity"), ColumnKind::Float),
            Some(CellValue::Float(f32::INFINITY))
        );
        assert_eq!(
            read_cell(&string("-Infinity"), ColumnKind::Double),
            Some(CellValue::Double(f64::NEG_INFINITY))
        );
        // out of range for f32
        assert_eq!(read_cell(&number("1e39"), ColumnKind::Float), None);
        assert_eq!(read_cell(&number("1e-50"), ColumnKind::Float), None);
        assert_eq!(read_cell(&number("-1e-400"), ColumnKind::Double), None);
        assert_eq!(read_cell(&number("0e-50"), ColumnKind::Float), Some(CellValue::Float(0.0)));
        assert_eq!(read_cell(&number("-0.0"), ColumnKind::Double), Some(CellValue::Double(-0.0)));
        assert_eq!(
            read_cell(&number("1e-45"), ColumnKind::Float),
            Some(CellValue::Float(f32::from_bits(1)))
        );
    }

    #[test]
    fn test_text_kinds() {
        assert_eq!(
            read_cell(&Token::Bool(true), ColumnKind::String),
            Some(CellValue::String("true".into()))
        );
        assert_eq!(read_cell(&string("AQID"), ColumnKind::ByteArray), Some(CellValue::Bytes(vec![1, 2, 3])));
        assert_eq!(read_cell(&string("not base64!"), ColumnKind::ByteArray), None);
        assert_eq!(read_cell(&Token::Bool(false), ColumnKind::Int32), None);
        assert_eq!(read_cell(&Token::StartArray, ColumnKind::String), None);
    }

    #[test]
    fn test_datetime_layouts() {
        let expected = NaiveDate::from_ymd_opt(2020, 2, 29)
            .unwrap()
            .and_hms_opt(12, 0, 1)
            .unwrap();

        assert_eq!(parse_datetime("2020-02-29T12:00:01"), Some(expected));
        assert_eq!(parse_datetime("2020-02-29 12:00:01"), Some(expected));
        assert_eq!(parse_datetime("2020-02-29T14:00:01+02:00"), Some(expected));
        assert_eq!(parse_datetime("2020-02-29T12:00:01Z"), Some(expected));
        assert_eq!(
            parse_datetime("2020-02-29"),
            NaiveDate::from_ymd_opt(2020, 2, 29).unwrap().and_hms_opt(0, 0, 0)
        );
        assert_eq!(parse_datetime("yesterday"), None);
    }
}
