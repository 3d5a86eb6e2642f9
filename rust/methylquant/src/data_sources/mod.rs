pub mod peptide_csv;
pub mod scan_source;

pub use peptide_csv::PeptideCsvReader;
pub use scan_source::{
    InMemoryScanSource,
    ScanDataSource,
};
