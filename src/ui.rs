use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    style::{Modifier, Style, Stylize},
    symbols::border,
    text::Line,
    widgets::{Block, Cell, Paragraph, Row, Table},
};

use crate::domain::HELP_TEXT;
use crate::model::Model;
use crate::table;

pub const COLUMN_WIDTH_MARGIN: usize = 2;
pub const CMDLINE_HEIGH: u16 = 1;
pub const TABLE_CHROME_HEIGHT: u16 = 3; // Border top and bottom plus the header row

#[derive(Default)]
pub struct TableUI;

impl TableUI {
    pub fn new() -> Self {
        TableUI
    }

    pub fn draw(&mut self, model: &Model, frame: &mut Frame) {
        let [table_area, status_area] =
            Layout::vertical([Constraint::Min(TABLE_CHROME_HEIGHT), Constraint::Length(CMDLINE_HEIGH)])
                .areas(frame.area());

        let data = model.table();
        let header = Row::new(data.header().iter().enumerate().map(|(idx, _)| {
            let cell = Cell::from(header_label(data, idx));
            if idx == model.curser_column() {
                cell.style(Style::default().add_modifier(Modifier::REVERSED))
            } else {
                cell
            }
        }))
        .bold();

        let visible = table_area.height.saturating_sub(TABLE_CHROME_HEIGHT) as usize;
        let total = data.total_row();
        let rows = data
            .rows()
            .iter()
            .skip(model.offset_row())
            .take(visible)
            .map(|row| {
                let ui_row = Row::new(row.iter().map(|cell| Cell::from(cell.display.as_str())));
                if total.is_some_and(|t| std::ptr::eq(t, row)) {
                    ui_row.italic()
                } else {
                    ui_row
                }
            });

        let widths = column_widths(data, model.config().max_column_width)
            .into_iter()
            .map(|w| Constraint::Length(column_length(w)));

        let block = Block::bordered()
            .title(Line::from(format!(" {} ", data.name).bold()).centered())
            .title_bottom(Line::from(HELP_TEXT.blue()).centered())
            .border_set(border::THICK);

        frame.render_widget(Table::new(rows, widths).header(header).block(block), table_area);
        frame.render_widget(Paragraph::new(model.status_message()), status_area);
    }
}

/// Column name with the sort direction arrow on the last sorted column.
pub fn header_label(table: &table::Table, column: usize) -> String {
    let name = table.header().get(column).map(String::as_str).unwrap_or("");
    match table.sort_state() {
        (Some(c), Some(direction)) if c == column => format!("{name} {}", direction.arrow()),
        _ => name.to_string(),
    }
}

fn column_length(width: usize) -> u16 {
    u16::try_from(width).unwrap_or(u16::MAX)
}

pub fn column_widths(table: &table::Table, max_column_width: usize) -> Vec<usize> {
    (0..table.width())
        .map(|idx| {
            let content = table
                .rows()
                .iter()
                .filter_map(|row| row.get(idx))
                .map(|cell| cell.display.chars().count())
                .max()
                .unwrap_or(0);
            let width = std::cmp::max(header_label(table, idx).chars().count(), content) + COLUMN_WIDTH_MARGIN;
            std::cmp::min(width, max_column_width)
        })
        .collect()
}
