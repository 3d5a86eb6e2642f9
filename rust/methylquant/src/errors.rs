use std::path::PathBuf;

#[derive(Debug)]
pub enum MethylQuantError {
    InvalidParameter {
        field: &'static str,
        reason: String,
    },
    MissingColumn {
        column: String,
        path: Option<PathBuf>,
    },
    UnresolvedScan {
        scan_number: usize,
        num_scans: usize,
    },
    MalformedScanData {
        context: String,
    },
    Io {
        source: std::io::Error,
        path: Option<PathBuf>,
    },
    ParseError {
        msg: String,
    },
}

impl std::fmt::Display for MethylQuantError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for MethylQuantError {}

pub type Result<T> = std::result::Result<T, MethylQuantError>;

impl From<std::io::Error> for MethylQuantError {
    fn from(x: std::io::Error) -> Self {
        Self::Io {
            source: x,
            path: None,
        }
    }
}

impl From<serde_json::Error> for MethylQuantError {
    fn from(x: serde_json::Error) -> Self {
        Self::ParseError { msg: x.to_string() }
    }
}

impl From<csv::Error> for MethylQuantError {
    fn from(x: csv::Error) -> Self {
        Self::ParseError { msg: x.to_string() }
    }
}

impl From<std::num::ParseIntError> for MethylQuantError {
    fn from(x: std::num::ParseIntError) -> Self {
        Self::ParseError { msg: x.to_string() }
    }
}

impl From<std::num::ParseFloatError> for MethylQuantError {
    fn from(x: std::num::ParseFloatError) -> Self {
        Self::ParseError { msg: x.to_string() }
    }
}
