use std::path::PathBuf;
use tracing::{error, info, trace};

use crate::domain::{Message, TVConfig, TVError};
use crate::loader::load_table;
use crate::sorter::sort_by_column;
use crate::table::{Table, TableLayout};
use crate::ui::{CMDLINE_HEIGH, TABLE_CHROME_HEIGHT};

#[derive(Debug, PartialEq)]
pub enum Status {
    READY,
    QUITTING,
}

pub struct Model {
    config: TVConfig,
    pub status: Status,
    table: Table,
    curser_column: usize,
    offset_row: usize,
    table_height: usize,
    status_message: String,
}

impl Model {
    pub fn new(config: &TVConfig, table: Table) -> Self {
        Self {
            config: config.clone(),
            status: Status::READY,
            table,
            curser_column: 0,
            offset_row: 0,
            table_height: 0,
            status_message: "Started tvsort!".to_string(),
        }
    }

    pub fn load(config: &TVConfig, path: PathBuf) -> Result<Self, TVError> {
        let layout = TableLayout {
            total_row: config.total_row,
        };
        let table = load_table(path, layout)?;
        let mut model = Model::new(config, table);
        model.set_status_message(format!(
            "Loaded {} rows ...",
            model.table.data_rows().len()
        ));
        Ok(model)
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut Table {
        &mut self.table
    }

    pub fn config(&self) -> &TVConfig {
        &self.config
    }

    pub fn curser_column(&self) -> usize {
        self.curser_column
    }

    pub fn offset_row(&self) -> usize {
        self.offset_row
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    fn set_status_message(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
    }

    pub fn quit(&mut self) {
        self.status = Status::QUITTING;
    }

    pub fn update(&mut self, message: Option<Message>) -> Result<(), TVError> {
        if let Some(msg) = message {
            trace!("Update: {:?}", msg);
            match msg {
                Message::Quit => self.quit(),
                Message::MoveLeft => self.curser_column = self.curser_column.saturating_sub(1),
                Message::MoveRight => {
                    if self.curser_column + 1 < self.table.width() {
                        self.curser_column += 1;
                    }
                }
                Message::MoveUp => self.offset_row = self.offset_row.saturating_sub(1),
                Message::MoveDown => {
                    let max_offset = self.table.rows().len().saturating_sub(self.table_height);
                    self.offset_row = std::cmp::min(self.offset_row + 1, max_offset);
                }
                Message::SortCurrentColumn => self.sort_column(self.curser_column),
                Message::SortColumn(column) => self.sort_column(column),
                Message::Resize(_width, height) => {
                    self.table_height =
                        height.saturating_sub((CMDLINE_HEIGH + TABLE_CHROME_HEIGHT) as usize)
                }
            }
        }
        Ok(())
    }

    /// Sorts by `column` as a header activation would. Errors end up in the
    /// status line, the table stays as it was.
    fn sort_column(&mut self, column: usize) {
        match sort_by_column(&mut self.table, column) {
            Ok(direction) => {
                self.curser_column = column;
                let name = self
                    .table
                    .header()
                    .get(column)
                    .cloned()
                    .unwrap_or_else(|| (column + 1).to_string());
                info!("Sorted \"{name}\" {}", direction.as_str());
                self.set_status_message(format!("Sorted \"{name}\" {}", direction.as_str()));
            }
            Err(e) => {
                error!("Sorting column {column} failed: {e}");
                self.set_status_message(format!("Can not sort: {e}"));
            }
        }
    }
}
