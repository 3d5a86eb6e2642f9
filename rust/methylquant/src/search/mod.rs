pub mod engine;
pub mod intensity;
mod keys;

pub use engine::{
    BoundaryDirection,
    ScanSearchEngine,
};
pub use intensity::{
    best_match,
    IntensityMatch,
};
