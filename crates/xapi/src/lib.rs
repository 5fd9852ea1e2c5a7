//! # xapi-core
//!
//! Codec engine for the X-API (XPLATFORM / Nexacro) dataset XML format.
//!
//! ## Components
//!
//! - **Value codec** ([`value`], [`escape`]): string to typed value
//!   conversion with fixed-width date encodings and base64 blobs, plus the
//!   two entity escaping layers.
//! - **Tokenizer** ([`xml::tokenizer`]): a lenient hand-written scanner that
//!   never fails on malformed input.
//! - **Data model** ([`model`]): [`XapiRoot`], [`Dataset`], [`Row`], [`Col`].
//! - **Parser** ([`parse_str`] and friends) and **writer**
//!   ([`write_to_string`] and friends).
//!
//! Options are passed to every call as an explicit [`XapiOptions`] value.
//!
//! ## Example
//!
//! ```rust
//! use xapi_core::{ColumnDef, ColumnType, Dataset, XapiOptions, XapiRoot, parse_str, write_to_string};
//!
//! let options = XapiOptions::default();
//!
//! let mut dataset = Dataset::new("output");
//! dataset.add_column(ColumnDef::new("qty", ColumnType::Int, 4));
//! let row = dataset.new_row();
//! dataset.set_column(row, "qty", 12)?;
//!
//! let mut root = XapiRoot::new();
//! root.set_parameter("ErrorCode", 0);
//! root.add_dataset(dataset);
//!
//! let xml = write_to_string(&root, &options)?;
//! let parsed = parse_str(&xml, &options)?;
//! assert_eq!(parsed.get_dataset("output").map(|d| d.row_size()), Some(1));
//! # Ok::<(), xapi_core::XapiError>(())
//! ```
//!
//! ## Feature flags
//!
//! - `tokio` (default): [`parse_async`] and [`write_async`] over tokio's
//!   `AsyncRead`/`AsyncWrite`.

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod config;
pub mod error;
pub mod escape;
pub mod json;
pub mod model;
pub mod types;
pub mod value;
pub mod xml;

pub use config::{DatasetLayout, XapiOptions};
pub use error::{Result, XapiError};
pub use model::{Col, ColumnDef, ConstColumnDef, Dataset, Parameter, Row, XapiRoot};
pub use types::{ColumnType, RowType, XapiVersion};
pub use value::{Value, string_to_typed, typed_to_string};

pub use json::{to_json_string, to_json_string_pretty, to_json_value};
pub use xml::{parse_body, parse_reader, parse_slice, parse_str, write, write_to_string, write_to_vec};

#[cfg(feature = "tokio")]
pub use xml::{parse_async, write_async};
