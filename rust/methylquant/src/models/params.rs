use crate::errors::{
    MethylQuantError,
    Result,
};
use serde::{
    Deserialize,
    Serialize,
};

/// User-tunable search parameters.
///
/// All windows are symmetric around the MS/MS retention time; the ppm
/// tolerance is symmetric around each target mass.
///
/// Example:
/// ```
/// use methylquant::QuantParams;
///
/// let params = QuantParams::default();
/// assert!(params.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct QuantParams {
    /// Mass error tolerance (ppm) when matching predicted isotope masses
    /// against observed peaks.
    pub mass_error_ppm: f64,
    /// How far (minutes) around the MS/MS RT to search for the point of
    /// maximum light/heavy overlap.
    pub overlap_window_minutes: f64,
    /// How far (minutes) around the MS/MS RT elution boundaries may extend.
    pub elution_window_minutes: f64,
    /// How many weak MS1 scans to tolerate in each direction before
    /// closing an elution boundary. The count accumulates over the whole
    /// walk, it does not reset at a strong scan.
    pub empty_ms_allowed: u32,
    /// Minimum number of matched envelope members (of the six light+heavy
    /// targets) for a scan to count as containing the pair.
    pub min_isotopomers_allowed: u32,
    /// Per-isotope elution-profile correlations above this value count as
    /// "good" and contribute to the second H/L ratio.
    pub pearson_threshold: f64,
}

impl Default for QuantParams {
    fn default() -> Self {
        QuantParams {
            mass_error_ppm: 10.0,
            overlap_window_minutes: 0.14,
            elution_window_minutes: 1.0,
            empty_ms_allowed: 1,
            min_isotopomers_allowed: 5,
            pearson_threshold: 0.5,
        }
    }
}

impl QuantParams {
    pub fn validate(&self) -> Result<()> {
        fn finite_non_negative(field: &'static str, value: f64) -> Result<()> {
            if !value.is_finite() || value < 0.0 {
                return Err(MethylQuantError::InvalidParameter {
                    field,
                    reason: format!("expected a finite non-negative number, got {}", value),
                });
            }
            Ok(())
        }
        finite_non_negative("mass_error_ppm", self.mass_error_ppm)?;
        finite_non_negative("overlap_window_minutes", self.overlap_window_minutes)?;
        finite_non_negative("elution_window_minutes", self.elution_window_minutes)?;
        finite_non_negative("pearson_threshold", self.pearson_threshold)?;
        if self.pearson_threshold > 1.0 {
            return Err(MethylQuantError::InvalidParameter {
                field: "pearson_threshold",
                reason: format!("expected a value in [0, 1], got {}", self.pearson_threshold),
            });
        }
        if self.min_isotopomers_allowed > 6 {
            return Err(MethylQuantError::InvalidParameter {
                field: "min_isotopomers_allowed",
                reason: format!(
                    "only six isotope targets exist, got {}",
                    self.min_isotopomers_allowed
                ),
            });
        }
        Ok(())
    }
}
