use std::ops::Range;

use crate::domain::TVError;

/// Direction of the last sort, encoded as 0 (ascending) and -1 (descending)
/// when written out as a table attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

impl Direction {
    pub fn code(self) -> i8 {
        match self {
            Direction::Ascending => 0,
            Direction::Descending => -1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Ascending => "ascending",
            Direction::Descending => "descending",
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            Direction::Ascending => "↑",
            Direction::Descending => "↓",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Cell {
    pub display: String,
    pub sort_key: Option<String>,
}

impl Cell {
    pub fn new(display: impl Into<String>, sort_key: Option<String>) -> Self {
        Cell {
            display: display.into(),
            sort_key,
        }
    }
}

pub type Row = Vec<Cell>;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TableLayout {
    /// The last row is a summary row and stays in place.
    pub total_row: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub name: String,
    header: Vec<String>,
    rows: Vec<Row>, // Data rows followed by the total row, if the layout has one
    layout: TableLayout,
    last_sorted_column: Option<usize>,
    last_sort_direction: Option<Direction>,
}

impl Table {
    pub fn new(name: impl Into<String>, header: Vec<String>, rows: Vec<Row>, layout: TableLayout) -> Self {
        Table {
            name: name.into(),
            header,
            rows,
            layout,
            last_sorted_column: None,
            last_sort_direction: None,
        }
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn layout(&self) -> TableLayout {
        self.layout
    }

    pub fn width(&self) -> usize {
        self.header.len()
    }

    /// Indices into the row list that take part in sorting.
    pub fn data_range(&self) -> Range<usize> {
        let end = if self.layout.total_row {
            self.rows.len().saturating_sub(1)
        } else {
            self.rows.len()
        };
        0..end
    }

    pub fn data_rows(&self) -> &[Row] {
        &self.rows[self.data_range()]
    }

    pub fn total_row(&self) -> Option<&Row> {
        if self.layout.total_row {
            self.rows.last()
        } else {
            None
        }
    }

    /// All rows below the header in display order, total row included.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Sort keys of `column` for each data row, or `None` if any data row
    /// has no cell at that position.
    pub fn column_keys(&self, column: usize) -> Option<Vec<Option<&str>>> {
        self.data_rows()
            .iter()
            .map(|row| row.get(column).map(|cell| cell.sort_key.as_deref()))
            .collect()
    }

    /// Moves data row `permutation[i]` to position `i` in one step.
    pub fn reorder_data_rows(&mut self, permutation: &[usize]) -> Result<(), TVError> {
        let range = self.data_range();
        if permutation.len() != range.len() {
            return Err(TVError::InvalidPermutation);
        }
        let mut seen = vec![false; permutation.len()];
        for &idx in permutation {
            if idx >= seen.len() || seen[idx] {
                return Err(TVError::InvalidPermutation);
            }
            seen[idx] = true;
        }

        let mut data: Vec<Option<Row>> = self.rows.drain(range.clone()).map(Some).collect();
        let reordered: Vec<Row> = permutation
            .iter()
            .filter_map(|&idx| data[idx].take())
            .collect();
        self.rows.splice(0..0, reordered);
        Ok(())
    }

    pub fn sort_state(&self) -> (Option<usize>, Option<Direction>) {
        (self.last_sorted_column, self.last_sort_direction)
    }

    pub fn set_sort_state(&mut self, column: usize, direction: Direction) {
        self.last_sorted_column = Some(column);
        self.last_sort_direction = Some(direction);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    fn keyed(value: &str) -> Cell {
        Cell::new(value, Some(value.to_string()))
    }

    pub(crate) fn table_from_keys(keys: &[&str], total_row: bool) -> Table {
        let mut rows: Vec<Row> = keys
            .iter()
            .enumerate()
            .map(|(idx, key)| vec![keyed(&idx.to_string()), keyed(key)])
            .collect();
        if total_row {
            rows.push(vec![Cell::new("Total", None), keyed("-1")]);
        }
        Table::new(
            "test",
            vec!["id".to_string(), "value".to_string()],
            rows,
            TableLayout { total_row },
        )
    }

    pub(crate) fn keys_of(table: &Table, column: usize) -> Vec<String> {
        table
            .data_rows()
            .iter()
            .map(|row| row[column].sort_key.clone().unwrap_or_default())
            .collect()
    }

    #[test]
    fn direction_codes() {
        assert_eq!(Direction::Ascending.code(), 0);
        assert_eq!(Direction::Descending.code(), -1);
    }

    #[test]
    fn total_row_is_not_data() {
        let table = table_from_keys(&["3", "1"], true);
        assert_eq!(table.data_range(), 0..2);
        assert_eq!(table.total_row().map(|r| r[0].display.as_str()), Some("Total"));

        let table = table_from_keys(&["3", "1"], false);
        assert_eq!(table.data_range(), 0..2);
        assert!(table.total_row().is_none());
    }

    #[test]
    fn reorder_keeps_total_row_last() {
        let mut table = table_from_keys(&["a", "b", "c"], true);
        table.reorder_data_rows(&[2, 0, 1]).unwrap();
        assert_eq!(keys_of(&table, 1), vec!["c", "a", "b"]);
        assert_eq!(table.rows().last().unwrap()[0].display, "Total");
    }

    #[test]
    fn reorder_rejects_non_permutations() {
        let mut table = table_from_keys(&["a", "b", "c"], false);
        assert!(matches!(
            table.reorder_data_rows(&[0, 0, 1]),
            Err(TVError::InvalidPermutation)
        ));
        assert!(matches!(
            table.reorder_data_rows(&[0, 1]),
            Err(TVError::InvalidPermutation)
        ));
        assert!(matches!(
            table.reorder_data_rows(&[0, 1, 3]),
            Err(TVError::InvalidPermutation)
        ));
        assert_eq!(keys_of(&table, 1), vec!["a", "b", "c"]);
    }

    #[test]
    fn column_keys_require_every_row() {
        let mut table = table_from_keys(&["a", "b"], false);
        assert_eq!(table.column_keys(1), Some(vec![Some("a"), Some("b")]));
        assert_eq!(table.column_keys(2), None);

        table.rows[1].truncate(1);
        assert_eq!(table.column_keys(1), None);
    }
}
