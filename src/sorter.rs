use std::cmp::Ordering;

use tracing::{debug, trace, warn};

use crate::domain::TVError;
use crate::table::{Direction, Table};

/// Direction for activating `column`, given the table's stored sort state.
///
/// Only the same column after an ascending sort flips to descending. A new
/// column, or the same column after a descending sort, sorts ascending.
pub fn next_direction(
    last_column: Option<usize>,
    last_direction: Option<Direction>,
    column: usize,
) -> Direction {
    match (last_column, last_direction) {
        (Some(c), Some(Direction::Ascending)) if c == column => Direction::Descending,
        _ => Direction::Ascending,
    }
}

/// Reads a key as a number if it is written as a plain decimal. Spellings
/// like `inf` or `NaN` stay text.
fn parse_number(key: &str) -> Option<f64> {
    let key = key.trim();
    if key.is_empty()
        || !key
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
    {
        return None;
    }
    key.parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// Compares two sort keys. Numeric if both keys are numbers, otherwise by
/// the raw strings. A missing key compares as the empty string.
pub fn compare_keys(a: Option<&str>, b: Option<&str>) -> Ordering {
    let a = a.unwrap_or("");
    let b = b.unwrap_or("");
    match (parse_number(a), parse_number(b)) {
        (Some(a_float), Some(b_float)) => a_float
            .partial_cmp(&b_float)
            .unwrap_or(std::cmp::Ordering::Equal),
        _ => a.cmp(b),
    }
}

fn out_of_order(left: Option<&str>, right: Option<&str>, direction: Direction) -> bool {
    matches!(
        (compare_keys(left, right), direction),
        (Ordering::Greater, Direction::Ascending) | (Ordering::Less, Direction::Descending)
    )
}

/// Bubble sorts `keys` and returns the resulting order as indices into `keys`.
///
/// Equal keys are never swapped. Mixed numeric and text keys do not form a
/// total order, so passes are capped at `keys.len()`.
pub fn sort_permutation(keys: &[Option<&str>], direction: Direction) -> Vec<usize> {
    let mut order: Vec<usize> = (0..keys.len()).collect();
    let mut passes = 0;
    let mut is_moved = keys.len() > 1;
    while is_moved && passes < keys.len() {
        is_moved = false;
        for pos in 1..order.len() {
            if out_of_order(keys[order[pos - 1]], keys[order[pos]], direction) {
                order.swap(pos - 1, pos);
                is_moved = true;
            }
        }
        passes += 1;
    }
    if is_moved {
        warn!("Stopped sorting after {passes} passes, keys are not totally ordered");
    }
    trace!("Sorted {} keys in {passes} passes", keys.len());
    order
}

/// Sorts the data rows of `table` by `column` and records the column and the
/// applied direction on the table.
///
/// Fails without touching the table if `column` is outside the header or a
/// data row has no cell at `column`.
pub fn sort_by_column(table: &mut Table, column: usize) -> Result<Direction, TVError> {
    let (last_column, last_direction) = table.sort_state();
    let direction = next_direction(last_column, last_direction, column);

    let permutation = {
        let keys = table
            .column_keys(column)
            .filter(|_| column < table.width())
            .ok_or(TVError::ColumnOutOfRange {
                column,
                width: table.width(),
            })?;
        sort_permutation(&keys, direction)
    };
    table.reorder_data_rows(&permutation)?;
    table.set_sort_state(column, direction);

    debug!(
        "Sorted table \"{}\" by column {column} {}",
        table.name,
        direction.as_str()
    );
    Ok(direction)
}
