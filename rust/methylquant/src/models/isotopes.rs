use crate::errors::{
    MethylQuantError,
    Result,
};

/// Mass difference between 12C and 13C, the spacing of the natural
/// isotope envelope before charge scaling.
pub const C13_MASS_DIFF: f64 = 1.00335;

/// The expected 3+3 isotope envelope for a methyl-SILAC pair.
///
/// Both triples are monotonically increasing and differ element-wise by
/// the constant partner shift. `light` is always the lower triple,
/// regardless of which partner was sequenced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IsotopeMassSet {
    pub light: [f64; 3],
    pub heavy: [f64; 3],
}

impl IsotopeMassSet {
    /// Derive the six target masses for one peptide.
    ///
    /// The instrument sometimes fragments the 2nd or 3rd isotopic peak
    /// rather than the monoisotopic one, so the difference between the
    /// observed precursor m/z and the calculated m/z is rounded to a
    /// whole number of isotope spacings to recover the monoisotopic peak.
    pub fn from_precursor(
        precursor_mass: f64,
        charge: u8,
        calc_mz: f64,
        mz_shift: f64,
    ) -> Result<Self> {
        if charge == 0 {
            return Err(MethylQuantError::InvalidParameter {
                field: "charge",
                reason: "charge state must be a positive integer".to_string(),
            });
        }
        let spacing = C13_MASS_DIFF / f64::from(charge);
        let peak_offset = ((precursor_mass - calc_mz) / spacing).round();

        let first = precursor_mass - peak_offset * spacing;
        let sequenced = [first, first + spacing, first + 2.0 * spacing];
        let partner = [
            sequenced[0] + mz_shift,
            sequenced[1] + mz_shift,
            sequenced[2] + mz_shift,
        ];

        // Both triples are monotonic with the same spacing, so comparing
        // first elements decides element-wise dominance. A zero shift
        // keeps the sequenced triple as light.
        let (light, heavy) = if partner[0] < sequenced[0] {
            (partner, sequenced)
        } else {
            (sequenced, partner)
        };
        Ok(IsotopeMassSet { light, heavy })
    }

    pub fn all_masses(&self) -> [f64; 6] {
        [
            self.light[0],
            self.light[1],
            self.light[2],
            self.heavy[0],
            self.heavy[1],
            self.heavy[2],
        ]
    }
}
