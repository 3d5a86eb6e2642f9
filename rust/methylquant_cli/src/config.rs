use methylquant::{
    MassShiftProfile,
    OutputStyle,
    QuantParams,
    SequencedPartner,
};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub input: Option<InputConfig>,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    pub output: Option<OutputConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct InputConfig {
    /// Peptide identification CSVs, one output table written per file.
    pub peptide_files: Vec<PathBuf>,
    /// Directory holding `<Data File>.json` scan streams.
    pub scan_data_dir: PathBuf,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AnalysisConfig {
    pub params: QuantParams,
    pub sequenced_partner: SequencedPartner,
    pub output_style: OutputStyle,
    /// Stock label name (13CD3 or 13C4); replaces the profile's label
    /// list when set.
    pub label: Option<String>,
    pub mass_shift_profile: MassShiftProfile,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OutputConfig {
    pub directory: PathBuf,
}
