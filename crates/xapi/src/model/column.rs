use serde::Serialize;

use crate::types::ColumnType;
use crate::value::Value;

/// Declaration of a per-row column.
///
/// `size` is informational and never enforced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnDef {
    pub id: String,
    pub size: u32,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
}

impl ColumnDef {
    pub fn new(id: impl Into<String>, column_type: ColumnType, size: u32) -> Self {
        Self {
            id: id.into(),
            size,
            column_type,
        }
    }
}

/// A column with one fixed value shared by every row.
///
/// Const columns are output metadata: they take no part in the dataset's
/// column index and rows never hold cells for them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstColumnDef {
    pub id: String,
    pub size: u32,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    pub value: Option<Value>,
}

impl ConstColumnDef {
    pub fn new(
        id: impl Into<String>,
        column_type: ColumnType,
        size: u32,
        value: impl Into<Value>,
    ) -> Self {
        Self {
            id: id.into(),
            size,
            column_type,
            value: Some(value.into()),
        }
    }
}

/// One cell of a row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Col {
    /// Id of the column this cell belongs to.
    pub id: String,
    /// `None` for an empty cell.
    pub value: Option<Value>,
}

impl Col {
    pub fn new(id: impl Into<String>, value: Option<Value>) -> Self {
        Self {
            id: id.into(),
            value,
        }
    }
}
