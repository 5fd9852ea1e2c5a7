use std::collections::HashMap;

use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::error::{Result, XapiError};
use crate::model::{Col, ColumnDef, ConstColumnDef, Row};
use crate::types::RowType;
use crate::value::Value;

/// A named table: column declarations plus rows of cells.
///
/// Columns must be declared before rows reference them. The column index
/// (column id to position) is private and only grows through
/// [`add_column`](Dataset::add_column), which keeps every row aligned with the
/// position its column was declared at.
///
/// # Example
///
/// ```rust
/// use xapi_core::{ColumnDef, ColumnType, Dataset, Value};
///
/// let mut dataset = Dataset::new("output");
/// dataset.add_column(ColumnDef::new("name", ColumnType::String, 100));
/// dataset.add_column(ColumnDef::new("qty", ColumnType::Int, 4));
///
/// let row = dataset.new_row();
/// dataset.set_column(row, "name", "widget")?;
/// dataset.set_column(row, "qty", 3)?;
///
/// assert_eq!(dataset.get_column(row, "qty")?, Some(&Value::Int(3)));
/// # Ok::<(), xapi_core::XapiError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub id: String,
    const_columns: Vec<ConstColumnDef>,
    columns: Vec<ColumnDef>,
    rows: Vec<Row>,
    column_index: HashMap<String, usize>,
}

impl Dataset {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Declares a column and returns its index.
    ///
    /// Re-declaring an id points the index at the new position.
    pub fn add_column(&mut self, column: ColumnDef) -> usize {
        let index = self.columns.len();
        self.column_index.insert(column.id.clone(), index);
        self.columns.push(column);
        index
    }

    /// Declares a const column. Const columns are not indexed.
    pub fn add_const_column(&mut self, column: ConstColumnDef) {
        self.const_columns.push(column);
    }

    /// Appends an empty row and returns its index.
    pub fn new_row(&mut self) -> usize {
        self.add_row(Row::new())
    }

    /// Appends a prepared row and returns its index.
    pub fn add_row(&mut self, row: Row) -> usize {
        self.rows.push(row);
        self.rows.len() - 1
    }

    /// Position at which a column was declared.
    pub fn get_column_index(&self, column_id: &str) -> Option<usize> {
        self.column_index.get(column_id).copied()
    }

    pub fn get_column_info(&self, column_id: &str) -> Option<&ColumnDef> {
        self.get_column_index(column_id)
            .and_then(|index| self.columns.get(index))
    }

    pub fn get_const_column(&self, column_id: &str) -> Option<&ConstColumnDef> {
        self.const_columns.iter().find(|c| c.id == column_id)
    }

    /// Current value of a cell.
    ///
    /// A row index past the end yields `Ok(None)`; an undeclared column is an
    /// error.
    pub fn get_column(&self, row: usize, column_id: &str) -> Result<Option<&Value>> {
        let Some(target) = self.rows.get(row) else {
            return Ok(None);
        };
        let index = self.require_column(column_id)?;
        Ok(target.col(index).and_then(|col| col.value.as_ref()))
    }

    /// Original (pre-change) value of a cell, with the same rules as
    /// [`get_column`](Dataset::get_column).
    pub fn get_org_column(&self, row: usize, column_id: &str) -> Result<Option<&Value>> {
        let Some(target) = self.rows.get(row) else {
            return Ok(None);
        };
        let index = self.require_column(column_id)?;
        Ok(target.org_col(index).and_then(|col| col.value.as_ref()))
    }

    /// Sets the current value of a cell.
    pub fn set_column(&mut self, row: usize, column_id: &str, value: impl Into<Value>) -> Result<()> {
        self.put_cell(row, column_id, Some(value.into()), false)
    }

    /// Empties a cell. The writer emits it as a self-closing `Col`.
    pub fn clear_column(&mut self, row: usize, column_id: &str) -> Result<()> {
        self.put_cell(row, column_id, None, false)
    }

    /// Sets the original value of a cell, creating the row's original values
    /// on first use.
    pub fn set_org_column(
        &mut self,
        row: usize,
        column_id: &str,
        value: impl Into<Value>,
    ) -> Result<()> {
        self.put_cell(row, column_id, Some(value.into()), true)
    }

    /// Tags a row with the mutation it stands for, or clears the tag.
    pub fn set_row_type(&mut self, row: usize, row_type: Option<RowType>) -> Result<()> {
        let target = self.row_mut(row)?;
        target.row_type = row_type;
        Ok(())
    }

    pub fn row(&self, row: usize) -> Option<&Row> {
        self.rows.get(row)
    }

    pub fn row_mut(&mut self, row: usize) -> Result<&mut Row> {
        let dataset = &self.id;
        self.rows.get_mut(row).ok_or_else(|| XapiError::RowOutOfBounds {
            row,
            dataset: dataset.clone(),
        })
    }

    /// Column declarations in index order.
    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    pub fn iter_const_columns(&self) -> impl Iterator<Item = &ConstColumnDef> {
        self.const_columns.iter()
    }

    pub fn iter_columns(&self) -> impl Iterator<Item = &ColumnDef> {
        self.columns.iter()
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter()
    }

    pub fn column_size(&self) -> usize {
        self.columns.len()
    }

    pub fn const_column_size(&self) -> usize {
        self.const_columns.len()
    }

    pub fn row_size(&self) -> usize {
        self.rows.len()
    }

    /// Resolves a column id or fails with [`XapiError::ColumnNotFound`].
    pub(crate) fn require_column(&self, column_id: &str) -> Result<usize> {
        self.get_column_index(column_id)
            .ok_or_else(|| XapiError::ColumnNotFound {
                column: column_id.to_string(),
                dataset: self.id.clone(),
            })
    }

    fn put_cell(
        &mut self,
        row: usize,
        column_id: &str,
        value: Option<Value>,
        original: bool,
    ) -> Result<()> {
        if row >= self.rows.len() {
            return Err(XapiError::RowOutOfBounds {
                row,
                dataset: self.id.clone(),
            });
        }
        let index = self.require_column(column_id)?;
        let col = Col::new(column_id, value);
        let target = self.row_mut(row)?;
        if original {
            target.set_org_col(index, col);
        } else {
            target.set_col(index, col);
        }
        Ok(())
    }
}

impl Serialize for Dataset {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("Dataset", 4)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("constColumns", &self.const_columns)?;
        state.serialize_field("columns", &self.columns)?;
        state.serialize_field("rows", &self.rows)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ColumnType;

    fn sample() -> Dataset {
        let mut dataset = Dataset::new("ds");
        dataset.add_column(ColumnDef::new("a", ColumnType::String, 10));
        dataset.add_column(ColumnDef::new("b", ColumnType::Int, 4));
        dataset
    }

    #[test]
    fn test_column_index_is_declaration_order() {
        let mut dataset = sample();
        dataset.add_const_column(ConstColumnDef::new("k", ColumnType::String, 5, "abcd"));
        dataset.add_column(ColumnDef::new("c", ColumnType::Float, 8));

        assert_eq!(dataset.get_column_index("a"), Some(0));
        assert_eq!(dataset.get_column_index("b"), Some(1));
        assert_eq!(dataset.get_column_index("c"), Some(2));
        assert_eq!(dataset.get_column_index("k"), None);
        assert_eq!(dataset.column_size(), 3);
        assert_eq!(dataset.const_column_size(), 1);
        assert_eq!(
            dataset.get_column_info("c").map(|c| c.column_type),
            Some(ColumnType::Float)
        );
        assert_eq!(
            dataset.get_const_column("k").and_then(|c| c.value.clone()),
            Some(Value::from("abcd"))
        );
    }

    #[test]
    fn test_set_and_get() {
        let mut dataset = sample();
        let row = dataset.new_row();
        dataset.set_column(row, "b", 7).unwrap();

        assert_eq!(dataset.get_column(row, "b").unwrap(), Some(&Value::Int(7)));
        assert_eq!(dataset.get_column(row, "a").unwrap(), None);
        assert_eq!(dataset.get_column(5, "a").unwrap(), None);
        assert_eq!(dataset.row(row).map(Row::col_count), Some(1));
        assert_eq!(dataset.row(row).and_then(|r| r.col(1)).map(|c| c.id.as_str()), Some("b"));
    }

    #[test]
    fn test_unknown_column() {
        let mut dataset = sample();
        let row = dataset.new_row();
        let err = dataset.set_column(row, "zzz", "x").unwrap_err();
        assert!(matches!(err, XapiError::ColumnNotFound { ref column, .. } if column == "zzz"));
        assert!(dataset.get_column(row, "zzz").is_err());
        assert!(dataset.get_org_column(row, "zzz").is_err());
    }

    #[test]
    fn test_row_out_of_bounds() {
        let mut dataset = sample();
        let err = dataset.set_column(0, "a", "x").unwrap_err();
        assert!(matches!(err, XapiError::RowOutOfBounds { row: 0, .. }));
        assert!(dataset.set_row_type(3, Some(RowType::Insert)).is_err());
    }

    #[test]
    fn test_org_values_and_row_type() {
        let mut dataset = sample();
        let row = dataset.new_row();
        dataset.set_column(row, "a", "new").unwrap();
        dataset.set_org_column(row, "a", "old").unwrap();
        dataset.set_row_type(row, Some(RowType::Update)).unwrap();

        assert_eq!(dataset.get_column(row, "a").unwrap(), Some(&Value::from("new")));
        assert_eq!(dataset.get_org_column(row, "a").unwrap(), Some(&Value::from("old")));
        assert_eq!(dataset.row(row).and_then(|r| r.row_type), Some(RowType::Update));
    }

    #[test]
    fn test_clear_column() {
        let mut dataset = sample();
        let row = dataset.new_row();
        dataset.set_column(row, "a", "x").unwrap();
        dataset.clear_column(row, "a").unwrap();
        assert_eq!(dataset.get_column(row, "a").unwrap(), None);
        // The cell is still present, only empty
        assert_eq!(dataset.row(row).map(Row::col_count), Some(1));
    }

    #[test]
    fn test_add_prepared_row() {
        let mut dataset = sample();
        let mut row = Row::with_type(RowType::Insert);
        row.set_col(0, Col::new("a", Some(Value::from("x"))));
        let index = dataset.add_row(row);
        assert_eq!(index, 0);
        assert_eq!(dataset.row_size(), 1);
        assert_eq!(dataset.get_column(0, "a").unwrap(), Some(&Value::from("x")));
    }
}
