use std::fs::{self, File};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Mutex;

use clap::Parser;
use tracing::{debug, info};
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod controller;
mod domain;
mod html;
mod loader;
mod model;
mod sorter;
mod table;
mod ui;

use controller::Controller;
use domain::{Message, TVConfig, TVError};
use model::{Model, Status};
use ui::TableUI;

/// View a table and sort its rows by column. Activating the same column again
/// flips between ascending and descending order.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Data file to load (csv, parquet, arrow)
    file: String,

    /// Treat the last row as a total row that is never sorted
    #[arg(short, long)]
    total_row: bool,

    /// Sort by this column (1 based). Repeat to toggle the direction
    #[arg(short, long = "sort", value_name = "COLUMN")]
    sort: Vec<usize>,

    /// Write the table as html to this file
    #[arg(long, value_name = "FILE")]
    html: Option<String>,

    /// Print the table as tab separated values
    #[arg(short, long)]
    print: bool,

    /// Maximum rendered column width
    #[arg(long, default_value_t = 40)]
    max_column_width: usize,

    /// Log file, the terminal belongs to the table view
    #[arg(long, value_name = "FILE")]
    log_file: Option<String>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(args) {
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
        Ok(_) => ExitCode::SUCCESS,
    }
}

fn expand_path(path: &str) -> Result<PathBuf, TVError> {
    shellexpand::full(path)
        .map(|p| PathBuf::from(p.as_ref()))
        .map_err(|e| TVError::LoadingFailed(e.to_string()))
}

fn init_logging(log_file: Option<&str>) -> Result<(), TVError> {
    let path = match log_file {
        Some(p) => expand_path(p)?,
        None => std::env::temp_dir().join("tvsort.log"),
    };
    let file = File::create(&path)?;
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
        .with(ErrorLayer::default())
        .init();
    debug!("Logging to {}", path.display());
    Ok(())
}

fn run(args: Args) -> Result<(), TVError> {
    init_logging(args.log_file.as_deref())?;

    let cfg = TVConfig::default()
        .with_max_column_width(args.max_column_width)
        .with_total_row(args.total_row);
    let path = expand_path(&args.file)?;
    info!("Starting tvsort on {}", path.display());
    let mut model = Model::load(&cfg, path)?;

    if args.sort.is_empty() && args.html.is_none() && !args.print {
        return run_interactive(&cfg, model);
    }

    apply_sorts(model.table_mut(), &args.sort)?;

    if let Some(out) = args.html {
        let out = expand_path(&out)?;
        fs::write(&out, html::render_html(model.table()))?;
        info!("Wrote {}", out.display());
    }
    if args.print {
        print_table(model.table());
    }
    Ok(())
}

/// Applies each 1 based column of `columns` as one activation, in order.
fn apply_sorts(table: &mut table::Table, columns: &[usize]) -> Result<(), TVError> {
    for &column in columns {
        let column = column.checked_sub(1).ok_or(TVError::ZeroColumn)?;
        let direction = sorter::sort_by_column(table, column)?;
        info!("Sorted column {} {}", column + 1, direction.as_str());
    }
    Ok(())
}

fn tsv_field(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('\t', "\\t")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
}

fn tsv_line<'a>(values: impl Iterator<Item = &'a str>) -> String {
    values.map(tsv_field).collect::<Vec<_>>().join("\t")
}

fn print_table(table: &table::Table) {
    println!("{}", tsv_line(table.header().iter().map(String::as_str)));
    for row in table.rows() {
        println!("{}", tsv_line(row.iter().map(|c| c.display.as_str())));
    }
}

fn run_interactive(cfg: &TVConfig, mut model: Model) -> Result<(), TVError> {
    let mut ui = TableUI::new();
    let controller = Controller::new(cfg);

    let mut terminal = ratatui::init();
    let result = (|| -> Result<(), TVError> {
        let size = terminal.size()?;
        model.update(Some(Message::Resize(size.width as usize, size.height as usize)))?;
        while model.status != Status::QUITTING {
            terminal.draw(|f| ui.draw(&model, f))?;
            if let Some(message) = controller.handle_event()? {
                model.update(Some(message))?;
            };
        }
        Ok(())
    })();
    ratatui::restore();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Direction;
    use crate::table::tests::{keys_of, table_from_keys};

    #[test]
    fn repeated_sort_flags_toggle() {
        let mut table = table_from_keys(&["b", "c", "a"], false);
        apply_sorts(&mut table, &[2, 2]).unwrap();
        assert_eq!(keys_of(&table, 1), vec!["c", "b", "a"]);
        assert_eq!(table.sort_state(), (Some(1), Some(Direction::Descending)));

        apply_sorts(&mut table, &[1]).unwrap();
        assert_eq!(table.sort_state(), (Some(0), Some(Direction::Ascending)));
    }

    #[test]
    fn sort_flag_zero_is_rejected() {
        let mut table = table_from_keys(&["b", "a"], false);
        assert!(matches!(apply_sorts(&mut table, &[0]), Err(TVError::ZeroColumn)));
        assert_eq!(table.sort_state(), (None, None));
    }

    #[test]
    fn sort_flag_errors_name_the_given_column() {
        let mut table = table_from_keys(&["b", "a"], false);
        let err = apply_sorts(&mut table, &[5]).unwrap_err();
        assert_eq!(err.to_string(), "column 5 out of range, table has 2 columns");
    }

    #[test]
    fn tsv_escapes_separators() {
        assert_eq!(tsv_line(["a\tb", "c\nd", "e\\f"].into_iter()), "a\\tb\tc\\nd\te\\\\f");
        assert_eq!(tsv_line(["plain", "x"].into_iter()), "plain\tx");
    }
}
