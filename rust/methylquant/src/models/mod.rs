mod isotopes;
mod mass_shift;
mod params;
mod peptide;
mod scan;

pub use isotopes::{
    IsotopeMassSet,
    C13_MASS_DIFF,
};
pub use mass_shift::{
    LabelEntry,
    MassShiftProfile,
    ModificationEntry,
    SequencedPartner,
};
pub use params::QuantParams;
pub use peptide::PeptideIdentification;
pub use scan::{
    Peak,
    ScanRecord,
};
