use std::fmt;
use std::io::Error;

use derive_setters::Setters;
use polars::error::PolarsError;

#[derive(Debug)]
pub enum TVError {
    IoError(Error),
    PolarsError(PolarsError),
    LoadingFailed(String),
    FileNotFound,
    PermissionDenied,
    UnknownFileType,
    ColumnOutOfRange { column: usize, width: usize },
    ZeroColumn,
    InvalidPermutation,
    EmptyTable,
}

impl From<Error> for TVError {
    fn from(err: Error) -> Self {
        TVError::IoError(err)
    }
}

impl From<PolarsError> for TVError {
    fn from(err: PolarsError) -> Self {
        TVError::PolarsError(err)
    }
}

impl fmt::Display for TVError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TVError::IoError(e) => write!(f, "io error: {e}"),
            TVError::PolarsError(e) => write!(f, "failed to read data: {e}"),
            TVError::LoadingFailed(reason) => write!(f, "loading failed: {reason}"),
            TVError::FileNotFound => write!(f, "file not found"),
            TVError::PermissionDenied => write!(f, "permission denied"),
            TVError::UnknownFileType => write!(f, "unknown file type"),
            // Columns are counted from 1 for the user
            TVError::ColumnOutOfRange { column, width } => {
                write!(f, "column {} out of range, table has {width} columns", column + 1)
            }
            TVError::ZeroColumn => write!(f, "columns are numbered from 1"),
            TVError::InvalidPermutation => write!(f, "row order is not a permutation of the data rows"),
            TVError::EmptyTable => write!(f, "table has no columns"),
        }
    }
}

impl std::error::Error for TVError {}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Message {
    Quit,
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    SortCurrentColumn,
    SortColumn(usize),
    Resize(usize, usize),
}

#[derive(Debug, Clone, Setters)]
#[setters(prefix = "with_")]
pub struct TVConfig {
    pub event_poll_time: u64,
    pub max_column_width: usize,
    pub total_row: bool,
}

impl Default for TVConfig {
    fn default() -> Self {
        TVConfig {
            event_poll_time: 100,
            max_column_width: 40,
            total_row: false,
        }
    }
}

pub const HELP_TEXT: &str = " ←/→ column  ↑/↓ scroll  s sort  1-9 sort column  q quit ";
