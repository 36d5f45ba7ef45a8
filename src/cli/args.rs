use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "windfarm-processor")]
#[command(about = "Converts the Danish wind turbine registry into per-municipality JSON files")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(short, long, global = true, help = "Hide the progress spinner")]
    pub quiet: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,

    #[arg(
        short,
        long,
        global = true,
        help = "Configuration file [default: windfarm.toml if present]"
    )]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Transform the registry spreadsheet into one JSON file per municipality
    Transform {
        #[arg(short, long, help = "Input spreadsheet (.xlsx, .xls, .ods) or CSV export")]
        input: Option<PathBuf>,

        #[arg(short, long, help = "Output directory [default: data/communes]")]
        output_dir: Option<PathBuf>,

        #[arg(short, long, help = "Column profile: danish or english")]
        profile: Option<String>,

        #[arg(long, help = "Zero-based header row, overriding the profile's offset")]
        header_row: Option<usize>,

        #[arg(short, long, help = "Worksheet name [default: first sheet]")]
        sheet: Option<String>,

        #[arg(long, help = "Placeholder for missing descriptive values [default: unknown]")]
        sentinel: Option<String>,

        #[arg(long, help = "Skip writing summary_statistics.json")]
        no_summary: bool,

        #[arg(long, help = "Run every stage but write no files")]
        validate_only: bool,
    },

    /// Serve the landing page and exported region files over HTTP
    Serve {
        #[arg(long, help = "Bind address [default: 127.0.0.1]")]
        host: Option<String>,

        #[arg(short, long, help = "Port [default: 5000]")]
        port: Option<u16>,

        #[arg(long, help = "Directory containing index.html [default: static]")]
        web_root: Option<PathBuf>,

        #[arg(long, help = "Directory of region JSON files [default: data/communes]")]
        data_dir: Option<PathBuf>,
    },
}
