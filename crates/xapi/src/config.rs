//! Codec options.
//!
//! Options are an explicit value handed to every parse and write call. There
//! is no process-wide state, so concurrent calls with different options never
//! observe each other.
//!
//! # Example
//!
//! ```rust
//! use xapi_core::{DatasetLayout, XapiOptions, XapiVersion};
//!
//! // Nexacro namespace, typed values, nested <Datasets> wrapper
//! let options = XapiOptions::default();
//!
//! // Or adjust individual settings
//! let options = XapiOptions::default()
//!     .with_version(XapiVersion::XPLATFORM)
//!     .with_parse_to_types(false)
//!     .with_dataset_layout(DatasetLayout::Flat);
//! assert!(options.validate().is_ok());
//! ```

use std::fmt;
use std::str::FromStr;

use crate::types::XapiVersion;

/// Where the writer places `Dataset` elements.
///
/// The parser accepts both shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DatasetLayout {
    /// Datasets nested in a `<Datasets>` element under `Root`.
    #[default]
    Wrapped,
    /// Datasets as direct children of `Root`.
    Flat,
}

impl fmt::Display for DatasetLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetLayout::Wrapped => write!(f, "wrapped"),
            DatasetLayout::Flat => write!(f, "flat"),
        }
    }
}

impl FromStr for DatasetLayout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "wrapped" => Ok(DatasetLayout::Wrapped),
            "flat" => Ok(DatasetLayout::Flat),
            _ => Err(format!("unknown dataset layout: {}", s)),
        }
    }
}

/// Options read at the start of each parse/write call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XapiOptions {
    /// Namespace and version written on `Root`.
    pub version: XapiVersion,
    /// Convert cell and parameter text to typed values while parsing.
    ///
    /// When false every value stays a [`Value::String`](crate::Value::String).
    pub parse_to_types: bool,
    /// Dataset placement used by the writer.
    pub dataset_layout: DatasetLayout,
}

impl Default for XapiOptions {
    fn default() -> Self {
        Self {
            version: XapiVersion::NEXACRO,
            parse_to_types: true,
            dataset_layout: DatasetLayout::Wrapped,
        }
    }
}

impl XapiOptions {
    /// Sets the namespace/version descriptor.
    pub fn with_version(mut self, version: XapiVersion) -> Self {
        self.version = version;
        self
    }

    /// Enables or disables type conversion on parse.
    pub fn with_parse_to_types(mut self, parse_to_types: bool) -> Self {
        self.parse_to_types = parse_to_types;
        self
    }

    /// Sets the dataset placement used by the writer.
    pub fn with_dataset_layout(mut self, dataset_layout: DatasetLayout) -> Self {
        self.dataset_layout = dataset_layout;
        self
    }

    /// Validates the options and returns errors if any.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.version.xmlns.trim().is_empty() {
            errors.push("X-API namespace cannot be empty".to_string());
        }

        if self.version.version.trim().is_empty() {
            errors.push("X-API version cannot be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
