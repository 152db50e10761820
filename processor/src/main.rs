//! KPI Excel Processor CLI - turn a KPI spreadsheet into definition files
//!
//! ```bash
//! kpi-excel-processor kpis.xlsx
//! kpi-excel-processor kpis.csv --output-dir defs --code-file kpi_registry.py
//! ```
//!
//! Exits with 1 when the input cannot be loaded or lacks the expected columns.

use clap::Parser;
use kpi_excel_processor::logs::{log_error, set_quiet};
use kpi_excel_processor::{KpiExcelProcessor, ProcessorOptions, DEFAULT_OUTPUT_DIR};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "kpi-excel-processor")]
#[command(about = "Convert KPI spreadsheets or CSV files into JSON definitions", long_about = None)]
#[command(version)]
struct Cli {
    /// Input file (.csv, .xlsx, .xls, .xlsb, .ods)
    input_file: PathBuf,

    /// Directory for per-KPI JSON files
    #[arg(long, env = "KPI_OUTPUT_DIR", default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Also generate a Python KPI_REGISTRY module at this path
    #[arg(long, env = "KPI_CODE_FILE")]
    code_file: Option<PathBuf>,

    /// CSV delimiter (auto-detect if not specified)
    #[arg(short, long)]
    delimiter: Option<char>,

    /// Only print errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    set_quiet(cli.quiet);

    let processor = KpiExcelProcessor::new(ProcessorOptions {
        output_dir: cli.output_dir,
        code_file: cli.code_file,
        delimiter: cli.delimiter,
    });

    if let Err(e) = processor.run(&cli.input_file) {
        log_error(e.to_string());
        std::process::exit(1);
    }
}
