pub mod data_sources;
pub mod errors;
pub mod models;
pub mod scoring;
pub mod search;

pub use data_sources::{
    InMemoryScanSource,
    PeptideCsvReader,
    ScanDataSource,
};
pub use errors::{
    MethylQuantError,
    Result,
};
pub use models::{
    IsotopeMassSet,
    MassShiftProfile,
    Peak,
    PeptideIdentification,
    QuantParams,
    ScanRecord,
    SequencedPartner,
};
pub use scoring::{
    Confidence,
    OutputStyle,
    PairQuantifier,
    PairResult,
    ResultCsvWriter,
};
pub use search::{
    IntensityMatch,
    ScanSearchEngine,
};
