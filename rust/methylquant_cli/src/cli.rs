use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the JSON configuration file
    #[arg(short, long)]
    pub config: PathBuf,

    /// Peptide identification CSV (will over-write the config file)
    #[arg(short, long)]
    pub peptide_file: Option<PathBuf>,

    /// Directory with one scan-stream JSON per raw file (will over-write
    /// the config file)
    #[arg(short, long)]
    pub scan_data_dir: Option<PathBuf>,

    /// Path to the output directory
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Write only the headline quantitation columns
    #[arg(long)]
    pub summary: bool,
}
