use super::correlation::{
    h_to_l_ratio,
    pearson,
};
use super::results::{
    ElutionStrategyResult,
    IsotopeStrategyResult,
    PairResult,
};
use super::score::{
    quant_confidence,
    quant_score,
};
use crate::data_sources::ScanDataSource;
use crate::errors::Result;
use crate::models::{
    IsotopeMassSet,
    MassShiftProfile,
    PeptideIdentification,
    QuantParams,
    SequencedPartner,
};
use crate::search::{
    BoundaryDirection,
    IntensityMatch,
    ScanSearchEngine,
};
use tracing::debug;

/// Runs both quantitation strategies for each identified peptide of one
/// raw file and folds their evidence into a score.
pub struct PairQuantifier<'a, S: ScanDataSource> {
    engine: ScanSearchEngine<'a, S>,
    profile: MassShiftProfile,
    partner: SequencedPartner,
}

impl<'a, S: ScanDataSource> PairQuantifier<'a, S> {
    pub fn new(
        source: &'a S,
        params: QuantParams,
        profile: MassShiftProfile,
        partner: SequencedPartner,
    ) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            engine: ScanSearchEngine::new(source, params),
            profile,
            partner,
        })
    }

    pub fn quantify(&mut self, peptide: &PeptideIdentification) -> Result<PairResult> {
        let mass_shift = match peptide.mass_diff_override {
            Some(shift) => shift,
            None => self.profile.expected_mz_shift(
                &peptide.sequence,
                &peptide.modifications,
                peptide.charge,
                self.partner,
            )?,
        };
        let source = self.engine.source();
        let msms_rt = source.retention_time(peptide.msms_scan)?;
        let precursor_mass = source.precursor_mass(peptide.msms_scan)?;
        let masses = IsotopeMassSet::from_precursor(
            precursor_mass,
            peptide.charge,
            peptide.calc_mz,
            mass_shift,
        )?;
        debug!(
            "Quantifying {} at scan {} with shift {:.6}",
            peptide.sequence, peptide.msms_scan, mass_shift
        );

        let overlap_scan = self
            .engine
            .max_overlap_scan(&masses, peptide.msms_scan, msms_rt)?;
        let isotope = self.isotope_strategy(&masses, peptide.msms_scan, msms_rt, overlap_scan)?;
        let elution = self.elution_strategy(&masses, msms_rt, overlap_scan)?;

        let score = quant_score(
            isotope.correlation,
            isotope.ratio,
            elution.good_count,
            elution.ratio,
        );
        let confidence = quant_confidence(
            isotope.correlation,
            isotope.ratio,
            elution.good_count,
            elution.ratio,
        );
        Ok(PairResult {
            mass_shift,
            isotope,
            elution,
            score,
            confidence,
        })
    }

    /// Averages the whole envelope over the pair's shared elution range
    /// and correlates the light distribution against the heavy one.
    fn isotope_strategy(
        &mut self,
        masses: &IsotopeMassSet,
        msms_scan: usize,
        msms_rt: f64,
        overlap_scan: usize,
    ) -> Result<IsotopeStrategyResult> {
        let start_scan = self.engine.pair_elution_boundary(
            masses,
            msms_scan,
            msms_rt,
            overlap_scan,
            BoundaryDirection::Start,
        )?;
        let stop_scan = self.engine.pair_elution_boundary(
            masses,
            msms_scan,
            msms_rt,
            overlap_scan,
            BoundaryDirection::Stop,
        )?;

        let mut light = [IntensityMatch::absent(0.0); 3];
        let mut heavy = [IntensityMatch::absent(0.0); 3];
        for i in 0..3 {
            light[i] = self
                .engine
                .averaged_intensity(masses.light[i], start_scan, stop_scan)?;
            heavy[i] = self
                .engine
                .averaged_intensity(masses.heavy[i], start_scan, stop_scan)?;
        }
        let light_intensities: Vec<f64> = light.iter().map(|h| h.intensity).collect();
        let heavy_intensities: Vec<f64> = heavy.iter().map(|h| h.intensity).collect();

        let source = self.engine.source();
        Ok(IsotopeStrategyResult {
            start_scan,
            stop_scan,
            start_rt: source.retention_time(start_scan)?,
            stop_rt: source.retention_time(stop_scan)?,
            light,
            heavy,
            correlation: pearson(&light_intensities, &heavy_intensities),
            ratio: h_to_l_ratio(&light_intensities, &heavy_intensities),
        })
    }

    /// Traces every isotopomer's own elution profile and correlates each
    /// light profile against its heavy partner. The second H/L ratio
    /// only uses isotopomers whose profiles correlated above threshold.
    fn elution_strategy(
        &mut self,
        masses: &IsotopeMassSet,
        msms_rt: f64,
        overlap_scan: usize,
    ) -> Result<ElutionStrategyResult> {
        let threshold = self.engine.params().pearson_threshold;
        let mut light = [IntensityMatch::absent(0.0); 3];
        let mut heavy = [IntensityMatch::absent(0.0); 3];
        let mut correlations = [None; 3];

        for i in 0..3 {
            let light_mz = masses.light[i];
            let heavy_mz = masses.heavy[i];
            let light_start = self.engine.isotope_elution_boundary(
                light_mz,
                msms_rt,
                overlap_scan,
                BoundaryDirection::Start,
            )?;
            let light_stop = self.engine.isotope_elution_boundary(
                light_mz,
                msms_rt,
                overlap_scan,
                BoundaryDirection::Stop,
            )?;
            let heavy_start = self.engine.isotope_elution_boundary(
                heavy_mz,
                msms_rt,
                overlap_scan,
                BoundaryDirection::Start,
            )?;
            let heavy_stop = self.engine.isotope_elution_boundary(
                heavy_mz,
                msms_rt,
                overlap_scan,
                BoundaryDirection::Stop,
            )?;
            let start_scan = light_start.min(heavy_start);
            let stop_scan = light_stop.max(heavy_stop);

            let light_profile = self.engine.intensity_profile(light_mz, start_scan, stop_scan)?;
            let heavy_profile = self.engine.intensity_profile(heavy_mz, start_scan, stop_scan)?;
            let light_trace: Vec<f64> = light_profile.iter().map(|&(_, i)| i).collect();
            let heavy_trace: Vec<f64> = heavy_profile.iter().map(|&(_, i)| i).collect();
            correlations[i] = pearson(&light_trace, &heavy_trace);

            light[i] = self
                .engine
                .averaged_intensity(light_mz, start_scan, stop_scan)?;
            heavy[i] = self
                .engine
                .averaged_intensity(heavy_mz, start_scan, stop_scan)?;
        }

        let good: Vec<usize> = (0..3)
            .filter(|&i| correlations[i].map_or(false, |c| c > threshold))
            .collect();
        let good_light: Vec<f64> = good.iter().map(|&i| light[i].intensity).collect();
        let good_heavy: Vec<f64> = good.iter().map(|&i| heavy[i].intensity).collect();

        Ok(ElutionStrategyResult {
            light,
            heavy,
            correlations,
            good_count: good.len(),
            ratio: h_to_l_ratio(&good_light, &good_heavy),
        })
    }
}
