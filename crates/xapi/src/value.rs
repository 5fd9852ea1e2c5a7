//! Typed cell values and their string encodings.
//!
//! [`string_to_typed`] and [`typed_to_string`] are the value codec used by the
//! parser and the writer. Conversion of malformed text never fails: the
//! original string comes back as [`Value::String`] so that one dirty cell
//! cannot abort a whole dataset.
//!
//! | Column type | Value variant | Wire form |
//! |-------------|---------------|-----------|
//! | STRING | `String` | as-is |
//! | INT, BIGDECIMAL | `Int` | base-10 integer |
//! | FLOAT, DECIMAL | `Float` | default decimal form |
//! | DATE | `Date` | `yyyyMMdd` |
//! | DATETIME | `DateTime` | `yyyyMMddHHmmss`, `yyyyMMddHHmmssSSS` |
//! | TIME | `Time` | `HHmmss` |
//! | BLOB | `Bytes` | base64 |

use std::fmt;

use base64::Engine as _;
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, STANDARD};
use base64::engine::DecodePaddingMode;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Serialize, Serializer};
use tracing::trace;

use crate::types::ColumnType;

/// Decoder that accepts base64 with or without trailing padding.
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// A single parameter or cell value.
///
/// Absence is modelled as `Option<Value>::None` by the owning
/// [`Parameter`](crate::Parameter) or [`Col`](crate::Col).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Text, also used for values that failed typed conversion.
    String(String),
    /// `INT` and `BIGDECIMAL` values.
    Int(i64),
    /// `FLOAT` and `DECIMAL` values.
    Float(f64),
    /// `BLOB` values.
    Bytes(Vec<u8>),
    /// `DATE` values.
    Date(NaiveDate),
    /// `DATETIME` values, millisecond precision on the wire.
    DateTime(NaiveDateTime),
    /// `TIME` values.
    Time(NaiveTime),
}

impl Value {
    /// Returns the text if this is a `String` value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer if this is an `Int` value.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the number for `Float` values, widening `Int` values.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Returns the bytes if this is a `Bytes` value.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            Value::DateTime(dt) => Some(dt.date()),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            Value::DateTime(dt) => Some(*dt),
            Value::Date(d) => Some(d.and_time(NaiveTime::default())),
            _ => None,
        }
    }

    pub fn as_time(&self) -> Option<NaiveTime> {
        match self {
            Value::Time(t) => Some(*t),
            Value::DateTime(dt) => Some(dt.time()),
            _ => None,
        }
    }

    /// Short name of the variant, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Bytes(_) => "bytes",
            Value::Date(_) => "date",
            Value::DateTime(_) => "datetime",
            Value::Time(_) => "time",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.write_str(s),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(v) => write!(f, "{}", v),
            Value::Bytes(b) => f.write_str(&STANDARD.encode(b)),
            Value::Date(d) => write!(f, "{}", d.format("%Y%m%d")),
            Value::DateTime(dt) => f.write_str(&format_datetime(dt)),
            Value::Time(t) => write!(f, "{}", t.format("%H%M%S")),
        }
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(b)
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Value::Bytes(b.to_vec())
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(dt: NaiveDateTime) -> Self {
        Value::DateTime(dt)
    }
}

impl From<NaiveTime> for Value {
    fn from(t: NaiveTime) -> Self {
        Value::Time(t)
    }
}

/// JSON form: numbers stay numbers, bytes become base64, temporal values use
/// ISO-8601.
impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::String(s) => serializer.serialize_str(s),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::Bytes(b) => serializer.serialize_str(&STANDARD.encode(b)),
            Value::Date(d) => serializer.collect_str(&d.format("%Y-%m-%d")),
            Value::DateTime(dt) => serializer.collect_str(&dt.format("%Y-%m-%dT%H:%M:%S%.3f")),
            Value::Time(t) => serializer.collect_str(&t.format("%H:%M:%S")),
        }
    }
}

/// Converts wire text to a typed value according to `column_type`.
///
/// Text that does not convert is returned unchanged as [`Value::String`].
/// Callers handle absence (empty element content) before calling this.
pub fn string_to_typed(raw: &str, column_type: ColumnType) -> Value {
    let converted = match column_type {
        ColumnType::String => None,
        ColumnType::Int | ColumnType::BigDecimal => raw.trim().parse::<i64>().ok().map(Value::Int),
        ColumnType::Float | ColumnType::Decimal => raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(Value::Float),
        ColumnType::Blob => decode_blob(raw).map(Value::Bytes),
        temporal => parse_fixed_width(raw, temporal),
    };

    match converted {
        Some(value) => value,
        None => {
            if column_type != ColumnType::String {
                trace!(column_type = %column_type, raw, "value kept as text");
            }
            Value::String(raw.to_string())
        }
    }
}

/// Formats a typed value for the wire according to `column_type`.
///
/// `String` values are written verbatim whatever the declared type, which
/// keeps text that failed conversion round-trip safe.
pub fn typed_to_string(value: &Value, column_type: ColumnType) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Int(i) => i.to_string(),
        Value::Float(f) => f.to_string(),
        Value::Bytes(b) => STANDARD.encode(b),
        Value::Date(d) => match column_type {
            ColumnType::DateTime => format_datetime(&d.and_time(NaiveTime::default())),
            ColumnType::Time => NaiveTime::default().format("%H%M%S").to_string(),
            _ => d.format("%Y%m%d").to_string(),
        },
        Value::DateTime(dt) => match column_type {
            ColumnType::Date => dt.format("%Y%m%d").to_string(),
            ColumnType::Time => dt.format("%H%M%S").to_string(),
            _ => format_datetime(dt),
        },
        Value::Time(t) => match column_type {
            ColumnType::Date => epoch_date().format("%Y%m%d").to_string(),
            ColumnType::DateTime => format_datetime(&epoch_date().and_time(*t)),
            _ => t.format("%H%M%S").to_string(),
        },
    }
}

/// `yyyyMMddHHmmss`, with `SSS` appended when milliseconds are non-zero.
fn format_datetime(dt: &NaiveDateTime) -> String {
    if dt.nanosecond() / 1_000_000 == 0 {
        dt.format("%Y%m%d%H%M%S").to_string()
    } else {
        dt.format("%Y%m%d%H%M%S%3f").to_string()
    }
}

/// 1970-01-01, the date part given to bare `TIME` values.
fn epoch_date() -> NaiveDate {
    NaiveDate::default()
}

/// Parses the positional date/time encodings.
///
/// The 16 character `DATETIME` form carries a two-digit fraction that is read
/// as a millisecond count.
fn parse_fixed_width(raw: &str, column_type: ColumnType) -> Option<Value> {
    if !column_type.is_temporal() || raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let field = |start: usize, end: usize| raw[start..end].parse::<u32>().ok();

    match (column_type, raw.len()) {
        (ColumnType::Date, 8) => parse_date(raw).map(Value::Date),
        (ColumnType::DateTime, 14 | 16 | 17) => {
            let date = parse_date(&raw[..8])?;
            let millis = if raw.len() > 14 { field(14, raw.len())? } else { 0 };
            let time = NaiveTime::from_hms_milli_opt(
                field(8, 10)?,
                field(10, 12)?,
                field(12, 14)?,
                millis,
            )?;
            Some(Value::DateTime(date.and_time(time)))
        }
        (ColumnType::Time, 6) => {
            NaiveTime::from_hms_opt(field(0, 2)?, field(2, 4)?, field(4, 6)?).map(Value::Time)
        }
        _ => None,
    }
}

/// `yyyyMMdd`; the caller guarantees eight ASCII digits.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let year = raw[0..4].parse::<i32>().ok()?;
    let month = raw[4..6].parse::<u32>().ok()?;
    let day = raw[6..8].parse::<u32>().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

fn decode_blob(raw: &str) -> Option<Vec<u8>> {
    let compact: String = raw.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    LENIENT_BASE64.decode(compact.as_bytes()).ok()
}
