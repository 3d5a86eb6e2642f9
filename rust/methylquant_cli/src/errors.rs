#[derive(Debug)]
pub enum CliError {
    Config {
        source: String,
    },
    ParseError {
        msg: String,
    },
    Io {
        source: String,
        path: Option<String>,
    },
    Quant {
        source: String,
    },
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Config { source } => write!(f, "Error interpreting the config: {}", source),
            CliError::ParseError { msg } => write!(f, "Error parsing config: {}", msg),
            CliError::Io { source, path } => {
                if let Some(path) = path {
                    write!(f, "Error reading file {}: {}", path, source)
                } else {
                    write!(f, "Error reading file: {}", source)
                }
            }
            CliError::Quant { source } => write!(f, "Error during quantitation: {}", source),
        }
    }
}

impl From<methylquant::MethylQuantError> for CliError {
    fn from(e: methylquant::MethylQuantError) -> Self {
        CliError::Quant {
            source: format!("{:?}", e),
        }
    }
}
