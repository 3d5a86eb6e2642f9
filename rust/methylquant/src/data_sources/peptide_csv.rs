use crate::errors::{
    MethylQuantError,
    Result,
};
use crate::models::PeptideIdentification;
use std::path::Path;
use tracing::info;

const SEQUENCE_COLUMN: &str = "sequence";
const MODIFICATIONS_COLUMN: &str = "modifications";
const CHARGE_COLUMN: &str = "charge";
const DATA_FILE_COLUMN: &str = "data file";
const START_SCAN_COLUMN: &str = "start scan";
const CALC_MZ_COLUMN: &str = "calc m/z";
const MASS_DIFFERENCE_COLUMN: &str = "mass difference";

/// Reader for the sequenced-peptides CSV file.
///
/// Header matching is case-insensitive. The required columns are
/// Sequence, Modifications, Charge, Data File, Start Scan and Calc m/z;
/// Mass Difference is optional and overrides the computed shift when a
/// cell carries a value. All columns, known or not, are preserved in
/// order for output passthrough.
pub struct PeptideCsvReader {
    headers: Vec<String>,
    rows: Vec<PeptideIdentification>,
    has_mass_difference: bool,
}

fn column_index(headers: &[String], name: &str, path: &Path) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
        .ok_or_else(|| MethylQuantError::MissingColumn {
            column: name.to_string(),
            path: Some(path.to_path_buf()),
        })
}

impl PeptideCsvReader {
    pub fn from_path(path: &Path) -> Result<Self> {
        let mut reader = csv::Reader::from_path(path)?;
        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.to_string())
            .collect();

        let sequence_idx = column_index(&headers, SEQUENCE_COLUMN, path)?;
        let modifications_idx = column_index(&headers, MODIFICATIONS_COLUMN, path)?;
        let charge_idx = column_index(&headers, CHARGE_COLUMN, path)?;
        let data_file_idx = column_index(&headers, DATA_FILE_COLUMN, path)?;
        let start_scan_idx = column_index(&headers, START_SCAN_COLUMN, path)?;
        let calc_mz_idx = column_index(&headers, CALC_MZ_COLUMN, path)?;
        let mass_difference_idx = headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(MASS_DIFFERENCE_COLUMN));

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let field = |idx: usize| record.get(idx).unwrap_or("").trim().to_string();

            let mass_diff_override = match mass_difference_idx {
                Some(idx) => {
                    let cell = field(idx);
                    if cell.is_empty() {
                        None
                    } else {
                        Some(cell.parse::<f64>()?)
                    }
                }
                None => None,
            };

            rows.push(PeptideIdentification {
                sequence: field(sequence_idx).to_uppercase(),
                modifications: field(modifications_idx),
                charge: field(charge_idx).parse()?,
                calc_mz: field(calc_mz_idx).parse()?,
                msms_scan: field(start_scan_idx).parse()?,
                data_file: field(data_file_idx),
                mass_diff_override,
                passthrough: record.iter().map(|f| f.to_string()).collect(),
            });
        }
        info!("Read {} peptide rows from {}", rows.len(), path.display());
        Ok(PeptideCsvReader {
            headers,
            rows,
            has_mass_difference: mass_difference_idx.is_some(),
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn has_mass_difference_column(&self) -> bool {
        self.has_mass_difference
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Unique raw-file names referenced by the `Data File` column, sorted.
    pub fn data_files(&self) -> Vec<String> {
        let mut files: Vec<String> = self.rows.iter().map(|r| r.data_file.clone()).collect();
        files.sort();
        files.dedup();
        files
    }

    /// Rows for one raw file, ascending by MS/MS scan number.
    pub fn rows_for_data_file(&self, data_file: &str) -> Vec<&PeptideIdentification> {
        let mut rows: Vec<&PeptideIdentification> = self
            .rows
            .iter()
            .filter(|r| r.data_file == data_file)
            .collect();
        rows.sort_by_key(|r| r.msms_scan);
        rows
    }
}
