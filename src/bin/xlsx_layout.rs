use std::error::Error as StdError;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use led_layout::{
    generate_sheet_layout, write_layout, GridSheet, Layout, SheetLayoutConfig, XlsxSheet,
};

/// Extracts LED positions from the installation workbook and prints the
/// layout as JSON.
#[derive(Parser)]
#[command(name = "xlsx-layout")]
struct Cli {
    /// Workbook (.xlsx, .xls, .ods, ...) or a CSV export of the layout sheet.
    workbook: PathBuf,
    /// Sheet to read instead of the configured one. For CSV input this names
    /// the exported sheet in diagnostics.
    #[arg(long)]
    sheet: Option<String>,
    /// JSON file overriding parts of the layout configuration.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Read the input as CSV regardless of its extension.
    #[arg(long)]
    csv: bool,
    /// Indent the JSON output.
    #[arg(long)]
    pretty: bool,
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false)
}

fn load_layout(cli: &Cli) -> Result<Layout, Box<dyn StdError>> {
    let mut config = match &cli.config {
        Some(path) => SheetLayoutConfig::from_json_file(path)?,
        None => SheetLayoutConfig::default(),
    };
    if let Some(sheet) = &cli.sheet {
        config.sheet_name = sheet.clone();
    }

    let layout = if cli.csv || is_csv(&cli.workbook) {
        let sheet = GridSheet::from_csv_path(&cli.workbook, config.sheet_name.as_str())?;
        generate_sheet_layout(&sheet, &config)?
    } else {
        let sheet = XlsxSheet::open(&cli.workbook, &config.sheet_name)?;
        generate_sheet_layout(&sheet, &config)?
    };
    Ok(layout)
}

fn run(cli: Cli) -> Result<(), Box<dyn StdError>> {
    let layout = load_layout(&cli)?;
    write_layout(std::io::stdout().lock(), &layout, cli.pretty)?;
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("xlsx-layout: {}", e);
            ExitCode::FAILURE
        }
    }
}
