mod cli;
mod config;
mod errors;
mod processing;

use clap::Parser;
use methylquant::{
    MassShiftProfile,
    OutputStyle,
};
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use config::{
    Config,
    InputConfig,
    OutputConfig,
};

fn main() -> std::result::Result<(), errors::CliError> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        ) // This uses RUST_LOG environment variable
        .init();

    // Parse command line arguments
    let args = Cli::parse();

    // Load and parse configuration
    let conf = match std::fs::File::open(args.config.clone()) {
        Ok(x) => x,
        Err(e) => {
            return Err(errors::CliError::Io {
                source: e.to_string(),
                path: Some(args.config.to_string_lossy().to_string()),
            });
        }
    };
    let config: Result<Config, _> = serde_json::from_reader(conf);
    let mut config = match config {
        Ok(x) => x,
        Err(e) => {
            return Err(errors::CliError::ParseError { msg: e.to_string() });
        }
    };

    // Override config with command line arguments if provided
    if let Some(peptide_file) = args.peptide_file {
        match config.input.as_mut() {
            Some(input) => input.peptide_files = vec![peptide_file],
            None => {
                config.input = Some(InputConfig {
                    peptide_files: vec![peptide_file],
                    scan_data_dir: std::path::PathBuf::from("."),
                });
            }
        }
    }
    if let Some(scan_data_dir) = args.scan_data_dir {
        match config.input.as_mut() {
            Some(input) => input.scan_data_dir = scan_data_dir,
            None => {
                return Err(errors::CliError::Config {
                    source: "A scan data dir was given but no peptide files, please provide them in either the config file or with the --peptide-file flag".to_string(),
                });
            }
        }
    }
    let input = match config.input {
        Some(ref x) => x.clone(),
        None => {
            return Err(errors::CliError::Config {
                source: "No input provided, please provide one in either the config file or with the --peptide-file flag".to_string(),
            });
        }
    };
    if let Some(output_dir) = args.output_dir {
        config.output = Some(OutputConfig {
            directory: output_dir,
        });
    }
    if args.summary {
        config.analysis.output_style = OutputStyle::Summary;
    }
    if let Some(ref label) = config.analysis.label {
        config.analysis.mass_shift_profile = match MassShiftProfile::with_stock_label(label) {
            Some(profile) => profile,
            None => {
                return Err(errors::CliError::Config {
                    source: format!(
                        "Unknown label '{}', the stock labels are 13CD3 and 13C4",
                        label
                    ),
                });
            }
        };
    }

    let output_config = match config.output {
        Some(ref x) => x.clone(),
        None => {
            return Err(errors::CliError::Config {
                source: "No output directory provided, please provide one in either the config file or with the --output-dir flag".to_string(),
            });
        }
    };
    info!("Parsed configuration: {:#?}", config.clone());

    // Create output directory
    match std::fs::create_dir_all(&output_config.directory) {
        Ok(_) => println!("Created output directory"),
        Err(e) => {
            return Err(errors::CliError::Io {
                source: e.to_string(),
                path: Some(output_config.directory.to_string_lossy().to_string()),
            });
        }
    };

    for peptide_file in &input.peptide_files {
        processing::process_peptide_file(
            peptide_file,
            &input.scan_data_dir,
            &config.analysis,
            &output_config,
        )?;
    }
    Ok(())
}
