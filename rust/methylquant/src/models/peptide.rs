use serde::{
    Deserialize,
    Serialize,
};

/// One identified peptide row from an MS/MS search, as read from the
/// sequenced-peptides file. Immutable once read.
///
/// `mass_diff_override`, when present, is used verbatim as the expected
/// light/heavy m/z difference instead of computing it from the
/// [`crate::MassShiftProfile`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeptideIdentification {
    pub sequence: String,
    pub modifications: String,
    pub charge: u8,
    pub calc_mz: f64,
    pub msms_scan: usize,
    pub data_file: String,
    #[serde(default)]
    pub mass_diff_override: Option<f64>,
    /// The full original row, preserved column-for-column for output.
    #[serde(default)]
    pub passthrough: Vec<String>,
}
