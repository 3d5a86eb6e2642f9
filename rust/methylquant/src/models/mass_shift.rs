use crate::errors::{
    MethylQuantError,
    Result,
};
use serde::{
    Deserialize,
    Serialize,
};

/// Which methyl-SILAC partner was actually sequenced by MS/MS.
///
/// A sequenced light peptide expects its heavy partner at a positive m/z
/// shift; a sequenced heavy peptide expects the light partner at the
/// negative of that shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SequencedPartner {
    #[default]
    #[serde(rename = "light")]
    Light,
    #[serde(rename = "heavy")]
    Heavy,
}

impl SequencedPartner {
    pub fn sign(&self) -> f64 {
        match self {
            SequencedPartner::Light => 1.0,
            SequencedPartner::Heavy => -1.0,
        }
    }
}

/// An isotopic label on a specific residue. The label contributes its mass
/// once per occurrence of the residue in the peptide sequence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LabelEntry {
    pub name: String,
    pub residue: char,
    pub mass: f64,
}

/// A variable modification that shifts mass between partners. Contributes
/// its mass once per `(Name)` annotation in the modifications text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModificationEntry {
    pub name: String,
    pub mass: f64,
}

/// The experiment's label and modification mass table.
///
/// Passed explicitly into the calculation; there is no process-wide
/// default list that can be mutated behind the caller's back.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MassShiftProfile {
    pub labels: Vec<LabelEntry>,
    pub modifications: Vec<ModificationEntry>,
}

impl Default for MassShiftProfile {
    /// The 13CD3-methionine methyl-SILAC setup.
    fn default() -> Self {
        MassShiftProfile {
            labels: vec![LabelEntry {
                name: "13CD3".to_string(),
                residue: 'M',
                mass: 4.022185,
            }],
            modifications: vec![
                ModificationEntry {
                    name: "Methyl".to_string(),
                    mass: 4.022185,
                },
                ModificationEntry {
                    name: "Dimethyl".to_string(),
                    mass: 8.04437,
                },
                ModificationEntry {
                    name: "Trimethyl".to_string(),
                    mass: 12.066555,
                },
            ],
        }
    }
}

impl MassShiftProfile {
    /// An empty profile; every expected shift computes to 0.
    pub fn empty() -> Self {
        MassShiftProfile {
            labels: Vec::new(),
            modifications: Vec::new(),
        }
    }

    /// The stock methionine labels, selectable by name.
    pub fn stock_labels() -> Vec<LabelEntry> {
        vec![
            LabelEntry {
                name: "13CD3".to_string(),
                residue: 'M',
                mass: 4.022185,
            },
            LabelEntry {
                name: "13C4".to_string(),
                residue: 'M',
                mass: 0.008766,
            },
        ]
    }

    /// A profile carrying the named stock label and the standard methyl
    /// modification table. `None` for an unknown label name.
    pub fn with_stock_label(name: &str) -> Option<Self> {
        let label = Self::stock_labels().into_iter().find(|l| l.name == name)?;
        Some(MassShiftProfile {
            labels: vec![label],
            ..Self::default()
        })
    }

    fn label_shift(&self, sequence: &str) -> f64 {
        self.labels
            .iter()
            .map(|l| sequence.matches(l.residue).count() as f64 * l.mass)
            .sum()
    }

    fn modification_shift(&self, modifications: &str) -> f64 {
        self.modifications
            .iter()
            .map(|m| {
                let pattern = format!("({})", m.name);
                modifications.matches(&pattern).count() as f64 * m.mass
            })
            .sum()
    }

    /// Expected m/z difference to the un-sequenced partner.
    ///
    /// Sum of label and modification contributions, signed by which
    /// partner was sequenced and divided by the charge state.
    pub fn expected_mz_shift(
        &self,
        sequence: &str,
        modifications: &str,
        charge: u8,
        partner: SequencedPartner,
    ) -> Result<f64> {
        if charge == 0 {
            return Err(MethylQuantError::InvalidParameter {
                field: "charge",
                reason: "charge state must be a positive integer".to_string(),
            });
        }
        let shift = self.label_shift(sequence) + self.modification_shift(modifications);
        Ok(shift * partner.sign() / f64::from(charge))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_profile_shifts_nothing() {
        let profile = MassShiftProfile::empty();
        for seq in ["MMM", "PEPTIDEK", ""] {
            let shift = profile
                .expected_mz_shift(seq, "(Methyl)", 2, SequencedPartner::Light)
                .unwrap();
            assert_eq!(shift, 0.0);
        }
    }

    #[test]
    fn test_label_counting() {
        let profile = MassShiftProfile::default();
        let shift = profile
            .expected_mz_shift("MAMK", "", 1, SequencedPartner::Light)
            .unwrap();
        assert!((shift - 2.0 * 4.022185).abs() < 1e-9);
    }

    #[test]
    fn test_modification_counting_is_parenthesised() {
        let profile = MassShiftProfile::default();
        // "(Dimethyl)" must not also count as "(Methyl)".
        let shift = profile
            .expected_mz_shift("PEPTIDEK", "R2(Dimethyl)", 1, SequencedPartner::Light)
            .unwrap();
        assert!((shift - 8.04437).abs() < 1e-9);
    }

    #[test]
    fn test_heavy_sequenced_negates_and_charge_scales() {
        let profile = MassShiftProfile::default();
        let light = profile
            .expected_mz_shift("MK", "", 2, SequencedPartner::Light)
            .unwrap();
        let heavy = profile
            .expected_mz_shift("MK", "", 2, SequencedPartner::Heavy)
            .unwrap();
        assert!((light - 4.022185 / 2.0).abs() < 1e-9);
        assert!((light + heavy).abs() < 1e-12);
    }

    #[test]
    fn test_zero_charge_is_rejected() {
        let profile = MassShiftProfile::default();
        let res = profile.expected_mz_shift("MK", "", 0, SequencedPartner::Light);
        assert!(matches!(
            res,
            Err(MethylQuantError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_stock_label_lookup_by_name() {
        let profile = MassShiftProfile::with_stock_label("13C4").unwrap();
        let shift = profile
            .expected_mz_shift("MK", "", 1, SequencedPartner::Light)
            .unwrap();
        assert!((shift - 0.008766).abs() < 1e-9);
        assert_eq!(
            MassShiftProfile::with_stock_label("13CD3").unwrap(),
            MassShiftProfile::default()
        );
        assert!(MassShiftProfile::with_stock_label("15N").is_none());
    }
}
