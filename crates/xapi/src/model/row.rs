use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::model::Col;
use crate::types::RowType;

/// A dataset row.
///
/// Cells are stored at the index of their column in the owning dataset, so a
/// row may have holes where no cell was set. The optional original row keeps
/// the pre-change values of an updated or deleted row under the same
/// alignment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    cols: Vec<Option<Col>>,
    org_row: Option<Vec<Option<Col>>>,
    /// Mutation this row stands for, if tagged.
    pub row_type: Option<RowType>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type(row_type: RowType) -> Self {
        Self {
            row_type: Some(row_type),
            ..Self::default()
        }
    }

    /// Returns the cell stored at a column index.
    pub fn col(&self, index: usize) -> Option<&Col> {
        self.cols.get(index).and_then(Option::as_ref)
    }

    /// Stores a cell at a column index, replacing any previous cell.
    pub fn set_col(&mut self, index: usize, col: Col) {
        put(&mut self.cols, index, col);
    }

    /// Removes the cell at a column index.
    pub fn clear_col(&mut self, index: usize) -> Option<Col> {
        self.cols.get_mut(index).and_then(Option::take)
    }

    /// Populated cells with their column index, in column order.
    pub fn cols(&self) -> impl Iterator<Item = (usize, &Col)> {
        populated(&self.cols)
    }

    /// Number of populated cells.
    pub fn col_count(&self) -> usize {
        self.cols.iter().flatten().count()
    }

    /// Returns true if the row carries original values.
    pub fn has_org_row(&self) -> bool {
        self.org_row.is_some()
    }

    /// Returns the original cell stored at a column index.
    pub fn org_col(&self, index: usize) -> Option<&Col> {
        self.org_row
            .as_ref()
            .and_then(|org| org.get(index))
            .and_then(Option::as_ref)
    }

    /// Stores an original cell, creating the original row on first use.
    pub fn set_org_col(&mut self, index: usize, col: Col) {
        put(self.org_row.get_or_insert_with(Vec::new), index, col);
    }

    /// Populated original cells with their column index, in column order.
    pub fn org_cols(&self) -> impl Iterator<Item = (usize, &Col)> {
        self.org_row.iter().flat_map(|org| populated(org))
    }

    /// Marks the row as carrying original values even if none are set yet.
    pub fn ensure_org_row(&mut self) {
        self.org_row.get_or_insert_with(Vec::new);
    }
}

fn put(cells: &mut Vec<Option<Col>>, index: usize, col: Col) {
    if cells.len() <= index {
        cells.resize(index + 1, None);
    }
    cells[index] = Some(col);
}

fn populated(cells: &[Option<Col>]) -> impl Iterator<Item = (usize, &Col)> {
    cells
        .iter()
        .enumerate()
        .filter_map(|(index, cell)| cell.as_ref().map(|col| (index, col)))
}

impl Serialize for Row {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let cols: Vec<&Col> = self.cols().map(|(_, col)| col).collect();
        let mut state = serializer.serialize_struct("Row", 3)?;
        state.serialize_field("type", &self.row_type)?;
        state.serialize_field("cols", &cols)?;
        if self.has_org_row() {
            let org: Vec<&Col> = self.org_cols().map(|(_, col)| col).collect();
            state.serialize_field("orgRow", &org)?;
        } else {
            state.skip_field("orgRow")?;
        }
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Value;

    #[test]
    fn test_cells_keep_their_index() {
        let mut row = Row::new();
        row.set_col(2, Col::new("c", Some(Value::from("z"))));
        row.set_col(0, Col::new("a", None));

        assert_eq!(row.col(2).map(|c| c.id.as_str()), Some("c"));
        assert!(row.col(1).is_none());
        assert!(row.col(10).is_none());
        let indexes: Vec<usize> = row.cols().map(|(i, _)| i).collect();
        assert_eq!(indexes, vec![0, 2]);
        assert_eq!(row.col_count(), 2);
    }

    #[test]
    fn test_set_col_overwrites() {
        let mut row = Row::new();
        row.set_col(0, Col::new("a", Some(Value::from(1))));
        row.set_col(0, Col::new("a", Some(Value::from(2))));
        assert_eq!(row.col(0).and_then(|c| c.value.clone()), Some(Value::Int(2)));
        assert!(row.clear_col(0).is_some());
        assert_eq!(row.col_count(), 0);
    }

    #[test]
    fn test_org_row() {
        let mut row = Row::with_type(RowType::Update);
        assert!(!row.has_org_row());
        assert_eq!(row.org_cols().count(), 0);

        row.set_org_col(1, Col::new("b", Some(Value::from("old"))));
        assert!(row.has_org_row());
        assert_eq!(row.org_col(1).map(|c| c.id.as_str()), Some("b"));
        assert!(row.org_col(0).is_none());
    }
}
