pub mod correlation;
pub mod pipeline;
pub mod results;
pub mod score;

pub use correlation::{
    h_to_l_ratio,
    pearson,
};
pub use pipeline::PairQuantifier;
pub use results::{
    ElutionStrategyResult,
    IsotopeStrategyResult,
    OutputStyle,
    PairResult,
    ResultCsvWriter,
};
pub use score::{
    quant_confidence,
    quant_score,
    Confidence,
};
