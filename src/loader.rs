use polars::prelude::*;
use rayon::prelude::*;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

use crate::domain::TVError;
use crate::table::{Cell, Row, Table, TableLayout};

#[derive(Debug, PartialEq)]
enum FileType {
    CSV,
    PARQUET,
    ARROW,
}

#[derive(Debug)]
struct FileInfo {
    path: PathBuf,
    file_size: u64,
    file_type: FileType,
}

struct Column {
    name: String,
    cells: Vec<Cell>,
}

/// Reads a data file into a table. With `layout.total_row` the last row of
/// the file is kept as the total row.
pub fn load_table(path: PathBuf, layout: TableLayout) -> Result<Table, TVError> {
    let file_info = get_file_info(path)?;
    let frame = match file_info.file_type {
        FileType::CSV => load_csv(&file_info.path)?,
        FileType::PARQUET => load_parquet(&file_info.path)?,
        FileType::ARROW => load_arrow(&file_info.path)?,
    };

    // Each column is converted in its own rayon task.
    let start_time = Instant::now();
    let df = frame.collect()?;
    let columns: Result<Vec<Column>, _> = df
        .get_column_names()
        .par_iter()
        .map(|name| load_column(&df, name))
        .collect();
    let columns = columns?;
    if columns.is_empty() {
        return Err(TVError::EmptyTable);
    }
    info!(
        "Loading {} ({} bytes) took {}ms ...",
        file_info.path.display(),
        file_info.file_size,
        start_time.elapsed().as_millis()
    );

    let name = file_info
        .path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("???")
        .to_string();
    Ok(table_from_columns(name, columns, layout))
}

fn table_from_columns(name: String, columns: Vec<Column>, layout: TableLayout) -> Table {
    let nrows = columns[0].cells.len();
    let mut rows: Vec<Row> = (0..nrows).map(|_| Vec::with_capacity(columns.len())).collect();
    let mut header = Vec::with_capacity(columns.len());
    for column in columns {
        debug!("Column \"{}\", # rows {}", column.name, column.cells.len());
        header.push(column.name);
        for (row, cell) in rows.iter_mut().zip(column.cells) {
            row.push(cell);
        }
    }
    Table::new(name, header, rows, layout)
}

fn load_column(df: &DataFrame, col_name: &str) -> Result<Column, PolarsError> {
    let col = df.column(col_name)?.cast(&DataType::String)?;
    let series = col.str()?;
    let cells = series.into_iter().map(to_cell).collect();
    Ok(Column {
        name: col_name.to_string(),
        cells,
    })
}

fn to_cell(value: Option<&str>) -> Cell {
    match value {
        Some(s) => Cell::new(
            s.replace("\r\n", " ↵ ").replace('\n', " ↵ "),
            Some(s.to_string()),
        ),
        None => Cell::new("∅", None),
    }
}

fn detect_file_type(path: &Path) -> Result<FileType, TVError> {
    match path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_uppercase())
        .as_deref()
    {
        Some("CSV") => Ok(FileType::CSV),
        Some("PARQUET") | Some("PQ") => Ok(FileType::PARQUET),
        Some("ARROW") | Some("IPC") | Some("FEATHER") => Ok(FileType::ARROW),
        _ => Err(TVError::UnknownFileType),
    }
}

fn get_file_info(path: PathBuf) -> Result<FileInfo, TVError> {
    let metadata = fs::metadata(&path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => TVError::FileNotFound,
        ErrorKind::PermissionDenied => TVError::PermissionDenied,
        _ => TVError::IoError(e),
    })?;
    if !metadata.is_file() {
        return Err(TVError::LoadingFailed("Not a file!".into()));
    }

    let file_size = metadata.len();
    let file_type = detect_file_type(&path)?;

    Ok(FileInfo {
        path,
        file_size,
        file_type,
    })
}

fn load_csv(path: &Path) -> Result<LazyFrame, PolarsError> {
    LazyCsvReader::new(PlPath::Local(path.into()))
        .with_has_header(true)
        .finish()
}

fn load_parquet(path: &Path) -> Result<LazyFrame, PolarsError> {
    LazyFrame::scan_parquet(PlPath::Local(path.into()), ScanArgsParquet::default())
}

fn load_arrow(path: &Path) -> Result<LazyFrame, PolarsError> {
    LazyFrame::scan_ipc(
        PlPath::Local(path.into()),
        polars::io::ipc::IpcScanOptions,
        UnifiedScanArgs::default(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sorter::sort_by_column;

    fn fixture(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures")
            .join(name)
    }

    #[test]
    fn detects_file_types() {
        assert_eq!(detect_file_type(Path::new("a.csv")).unwrap(), FileType::CSV);
        assert_eq!(detect_file_type(Path::new("a.PQ")).unwrap(), FileType::PARQUET);
        assert_eq!(detect_file_type(Path::new("a.feather")).unwrap(), FileType::ARROW);
        assert!(matches!(
            detect_file_type(Path::new("a.txt")),
            Err(TVError::UnknownFileType)
        ));
    }

    #[test]
    fn missing_file() {
        assert!(matches!(
            load_table(fixture("does_not_exist.csv"), TableLayout::default()),
            Err(TVError::FileNotFound)
        ));
    }

    #[test]
    fn directory_is_not_a_table() {
        assert!(matches!(
            load_table(fixture(""), TableLayout::default()),
            Err(TVError::LoadingFailed(_))
        ));
    }

    #[test]
    fn nulls_have_no_sort_key() {
        assert_eq!(to_cell(None), Cell::new("∅", None));
        assert_eq!(
            to_cell(Some("a\nb")),
            Cell::new("a ↵ b", Some("a\nb".to_string()))
        );
    }

    #[test]
    fn load_and_sort_fixture() {
        let layout = TableLayout { total_row: true };
        let mut table = load_table(fixture("recipes.csv"), layout).unwrap();
        assert_eq!(table.header(), ["item", "count", "time"]);
        assert_eq!(table.data_rows().len(), 4);
        assert_eq!(table.total_row().unwrap()[0].display, "Total");

        sort_by_column(&mut table, 1).unwrap();
        let items: Vec<&str> = table.data_rows().iter().map(|r| r[0].display.as_str()).collect();
        assert_eq!(items, vec!["gear", "plate", "cable", "circuit"]);

        sort_by_column(&mut table, 0).unwrap();
        let items: Vec<&str> = table.data_rows().iter().map(|r| r[0].display.as_str()).collect();
        assert_eq!(items, vec!["cable", "circuit", "gear", "plate"]);
        assert_eq!(table.total_row().unwrap()[0].display, "Total");
    }
}
