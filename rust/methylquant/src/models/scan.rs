use serde::{
    Deserialize,
    Serialize,
};

/// A single centroided peak. Zero-intensity entries are stripped when a
/// scan stream is indexed, so downstream code only sees `intensity > 0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Peak {
    pub mz: f64,
    pub intensity: f64,
}

/// Everything we keep per scan after the raw file is enumerated once
/// at load time. Immutable afterwards.
///
/// `precursor_mass` is only meaningful for scans with `ms_level >= 2`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanRecord {
    pub scan_number: usize,
    pub retention_time: f64,
    pub precursor_mass: f64,
    pub ms_level: u8,
    pub peaks: Vec<Peak>,
}

impl ScanRecord {
    pub fn is_ms1(&self) -> bool {
        self.ms_level == 1
    }
}
