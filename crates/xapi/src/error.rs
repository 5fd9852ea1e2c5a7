//! Error types for X-API parsing and writing.
//!
//! Failures fall in two tiers. Conversion of a malformed value (an `INT` cell
//! holding `abc`, a `DATE` of `20230230`) is *not* an error: the value codec
//! keeps the original text. Everything in [`XapiError`] is a hard failure that
//! aborts the whole call; no partially built [`XapiRoot`](crate::XapiRoot) is
//! returned.
//!
//! # Error families
//!
//! | Variant | Family | Raised by |
//! |---------|--------|-----------|
//! | MissingDatasetId | invalid xml | parser |
//! | MissingColumnInfo | invalid xml | parser |
//! | ColumnNotFound | invalid xml | parser, dataset accessors |
//! | ColBeforeRow | invalid xml | parser |
//! | OrgRowBeforeRow | invalid xml | parser |
//! | InvalidXml | invalid xml | parser |
//! | UnsupportedColumnType | column type | parser, `ColumnType::from_str` |
//! | RowOutOfBounds | data model | dataset accessors |
//! | EmptyBody | transport | [`parse_body`](crate::parse_body) |
//! | Io / Utf8 / Xml / Json | underlying | readers and writers |

// Variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use thiserror::Error;

/// The error type for every fallible operation in this crate.
#[derive(Error, Debug)]
pub enum XapiError {
    /// A `Dataset` element without an `id` attribute.
    #[error("Dataset element is missing the required id attribute")]
    MissingDatasetId,

    /// A `Dataset` element without a `ColumnInfo` child.
    #[error("ColumnInfo not found in dataset {dataset}")]
    MissingColumnInfo { dataset: String },

    /// A `Col` (or an accessor call) referencing a column that was never declared.
    #[error("Column with id {column} not found in dataset {dataset}")]
    ColumnNotFound { column: String, dataset: String },

    /// A `Col` element before any `Row` was opened.
    #[error("Row must be defined before Col in dataset {dataset}")]
    ColBeforeRow { dataset: String },

    /// An `OrgRow` element before any `Row` was opened.
    #[error("Row must be defined before OrgRow in dataset {dataset}")]
    OrgRowBeforeRow { dataset: String },

    /// Any other structural violation of the dataset format.
    #[error("invalid X-API XML: {0}")]
    InvalidXml(String),

    /// A column or parameter type label outside the known set.
    #[error("unsupported column type: {0}")]
    UnsupportedColumnType(String),

    /// A row index past the end of the dataset.
    #[error("Row index {row} out of bounds in dataset {dataset}")]
    RowOutOfBounds { row: usize, dataset: String },

    /// The transport delivered no body at all.
    #[error("Response body is empty")]
    EmptyBody,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("input is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("XML writer error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl XapiError {
    /// Returns true for content errors of the "invalid XML" family.
    ///
    /// Adaptors use this to answer with a client error rather than a server
    /// error.
    pub fn is_invalid_xml(&self) -> bool {
        matches!(
            self,
            XapiError::MissingDatasetId
                | XapiError::MissingColumnInfo { .. }
                | XapiError::ColumnNotFound { .. }
                | XapiError::ColBeforeRow { .. }
                | XapiError::OrgRowBeforeRow { .. }
                | XapiError::InvalidXml(_)
        )
    }
}

impl From<std::string::FromUtf8Error> for XapiError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        XapiError::Utf8(err.utf8_error())
    }
}

/// Result type alias for X-API operations.
pub type Result<T> = std::result::Result<T, XapiError>;
