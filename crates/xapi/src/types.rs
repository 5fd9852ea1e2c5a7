//! Vocabulary types shared by the codec: column types, row operation tags and
//! the namespace/version descriptor written on the `Root` element.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::XapiError;

/// Declared type of a column, const column or parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ColumnType {
    /// Text, passed through unchanged.
    #[default]
    String,
    /// Base-10 integer.
    Int,
    /// Floating point number.
    Float,
    /// Decimal number, carried as floating point.
    Decimal,
    /// Large integer, carried as a base-10 integer.
    BigDecimal,
    /// `yyyyMMdd`.
    Date,
    /// `yyyyMMddHHmmss` or `yyyyMMddHHmmssSSS`.
    DateTime,
    /// `HHmmss`.
    Time,
    /// Base64 encoded bytes.
    Blob,
}

impl ColumnType {
    /// All supported column types, in wire label order.
    pub const ALL: [ColumnType; 9] = [
        ColumnType::String,
        ColumnType::Int,
        ColumnType::Float,
        ColumnType::Decimal,
        ColumnType::BigDecimal,
        ColumnType::Date,
        ColumnType::DateTime,
        ColumnType::Time,
        ColumnType::Blob,
    ];

    /// Returns the label used in `type` attributes.
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::String => "STRING",
            ColumnType::Int => "INT",
            ColumnType::Float => "FLOAT",
            ColumnType::Decimal => "DECIMAL",
            ColumnType::BigDecimal => "BIGDECIMAL",
            ColumnType::Date => "DATE",
            ColumnType::DateTime => "DATETIME",
            ColumnType::Time => "TIME",
            ColumnType::Blob => "BLOB",
        }
    }

    /// Returns true for the three fixed-width date/time types.
    pub fn is_temporal(&self) -> bool {
        matches!(
            self,
            ColumnType::Date | ColumnType::DateTime | ColumnType::Time
        )
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnType {
    type Err = XapiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "STRING" => Ok(ColumnType::String),
            "INT" => Ok(ColumnType::Int),
            "FLOAT" => Ok(ColumnType::Float),
            "DECIMAL" => Ok(ColumnType::Decimal),
            "BIGDECIMAL" => Ok(ColumnType::BigDecimal),
            "DATE" => Ok(ColumnType::Date),
            "DATETIME" => Ok(ColumnType::DateTime),
            "TIME" => Ok(ColumnType::Time),
            "BLOB" => Ok(ColumnType::Blob),
            _ => Err(XapiError::UnsupportedColumnType(s.to_string())),
        }
    }
}

/// Mutation a row stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RowType {
    Insert,
    Update,
    Delete,
}

impl RowType {
    /// Returns the label used in the `type` attribute of `Row`.
    pub fn as_str(&self) -> &'static str {
        match self {
            RowType::Insert => "insert",
            RowType::Update => "update",
            RowType::Delete => "delete",
        }
    }
}

impl fmt::Display for RowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RowType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "insert" => Ok(RowType::Insert),
            "update" => Ok(RowType::Update),
            "delete" => Ok(RowType::Delete),
            _ => Err(format!("unknown row type: {}", s)),
        }
    }
}

/// Namespace and version written on the `Root` element.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct XapiVersion {
    /// The `xmlns` attribute value.
    pub xmlns: Cow<'static, str>,
    /// The `version` attribute value.
    pub version: Cow<'static, str>,
}

impl XapiVersion {
    /// XPLATFORM namespace preset.
    pub const XPLATFORM: XapiVersion = XapiVersion {
        xmlns: Cow::Borrowed("http://www.tobesoft.com/platform/Dataset"),
        version: Cow::Borrowed("4000"),
    };

    /// Nexacro namespace preset.
    pub const NEXACRO: XapiVersion = XapiVersion {
        xmlns: Cow::Borrowed("http://www.nexacroplatform.com/platform/dataset"),
        version: Cow::Borrowed("4000"),
    };

    /// Creates a descriptor for a namespace outside the two presets.
    pub fn custom(xmlns: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            xmlns: Cow::Owned(xmlns.into()),
            version: Cow::Owned(version.into()),
        }
    }
}

impl Default for XapiVersion {
    fn default() -> Self {
        XapiVersion::NEXACRO
    }
}

impl FromStr for XapiVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "nexacro" | "nexa" => Ok(XapiVersion::NEXACRO),
            "xplatform" => Ok(XapiVersion::XPLATFORM),
            _ => Err(format!(
                "unknown X-API version preset: {} (expected nexacro or xplatform)",
                s
            )),
        }
    }
}
