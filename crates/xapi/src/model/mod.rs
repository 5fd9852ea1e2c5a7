//! In-memory data model: [`XapiRoot`] holds [`Parameter`]s and
//! [`Dataset`]s; a dataset holds column declarations and [`Row`]s of
//! [`Col`] cells.
//!
//! Everything here is a plain owned value. Nothing is shared between roots
//! and nothing runs in the background.

mod column;
mod dataset;
mod root;
mod row;

pub use column::{Col, ColumnDef, ConstColumnDef};
pub use dataset::Dataset;
pub use root::XapiRoot;
pub use row::Row;

use serde::Serialize;

use crate::types::ColumnType;
use crate::value::Value;

/// A named scalar attached to the root.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    pub id: String,
    /// Declared type; written only when set. Reads as `STRING` when absent.
    #[serde(rename = "type")]
    pub column_type: Option<ColumnType>,
    pub value: Option<Value>,
}

impl Parameter {
    /// An untyped parameter with a value.
    pub fn new(id: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            id: id.into(),
            column_type: None,
            value: Some(value.into()),
        }
    }

    /// A parameter with a declared type.
    pub fn typed(id: impl Into<String>, column_type: ColumnType, value: impl Into<Value>) -> Self {
        Self {
            id: id.into(),
            column_type: Some(column_type),
            value: Some(value.into()),
        }
    }

    /// A parameter without a value.
    pub fn empty(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            column_type: None,
            value: None,
        }
    }

    /// The declared type, `STRING` when none was declared.
    pub fn effective_type(&self) -> ColumnType {
        self.column_type.unwrap_or_default()
    }
}
