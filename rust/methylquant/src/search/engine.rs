use super::intensity::{
    best_match,
    IntensityMatch,
};
use super::keys::{
    PairSearchKey,
    PairSearchKind,
    RangeMatchKey,
    ScanMatchKey,
};
use crate::data_sources::ScanDataSource;
use crate::errors::Result;
use crate::models::{
    IsotopeMassSet,
    QuantParams,
};
use std::collections::HashMap;
use tracing::debug;

/// Which way an elution boundary search walks from its anchor scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryDirection {
    /// Toward earlier retention times.
    Start,
    /// Toward later retention times.
    Stop,
}

/// Locates pair signal across MS1 scans and memoizes every expensive
/// lookup so repeated identifications of the same precursor are free.
pub struct ScanSearchEngine<'a, S: ScanDataSource> {
    source: &'a S,
    params: QuantParams,
    pair_scan_cache: HashMap<PairSearchKey, usize>,
    scan_match_cache: HashMap<ScanMatchKey, Option<IntensityMatch>>,
    range_match_cache: HashMap<RangeMatchKey, IntensityMatch>,
}

impl<'a, S: ScanDataSource> ScanSearchEngine<'a, S> {
    pub fn new(source: &'a S, params: QuantParams) -> Self {
        Self {
            source,
            params,
            pair_scan_cache: HashMap::new(),
            scan_match_cache: HashMap::new(),
            range_match_cache: HashMap::new(),
        }
    }

    pub fn source(&self) -> &'a S {
        self.source
    }

    pub fn params(&self) -> &QuantParams {
        &self.params
    }

    /// Returns the MS1 scan inside the overlap window with the largest
    /// summed envelope intensity. Scans matching fewer than
    /// `min_isotopomers_allowed` of the six envelope masses contribute
    /// nothing, and when no scan contributes the MS/MS scan number is
    /// returned unchanged.
    pub fn max_overlap_scan(
        &mut self,
        masses: &IsotopeMassSet,
        msms_scan: usize,
        msms_rt: f64,
    ) -> Result<usize> {
        let key = PairSearchKey::new(masses, msms_scan, PairSearchKind::Overlap);
        if let Some(&scan) = self.pair_scan_cache.get(&key) {
            return Ok(scan);
        }

        let window_start = (msms_rt - self.params.overlap_window_minutes)
            .max(self.source.run_start_time());
        let window_stop = (msms_rt + self.params.overlap_window_minutes)
            .min(self.source.run_end_time());
        let mut candidates = Vec::new();
        for &scan in self.source.ms1_scan_numbers() {
            let rt = self.source.retention_time(scan)?;
            if rt >= window_start && rt <= window_stop {
                candidates.push(scan);
            }
        }

        let mut best_scan = msms_scan;
        let mut best_total = 0.0_f64;
        for scan in candidates {
            let (matched, total) = self.envelope_match(masses, scan)?;
            if matched < self.params.min_isotopomers_allowed as usize {
                continue;
            }
            if total > best_total {
                best_total = total;
                best_scan = scan;
            }
        }

        debug!(
            "Max overlap for MS/MS scan {} found at scan {}",
            msms_scan, best_scan
        );
        self.pair_scan_cache.insert(key, best_scan);
        Ok(best_scan)
    }

    /// Walks MS1 scans outward from the overlap scan until the pair
    /// envelope fades, tolerating up to `empty_ms_allowed` weak scans.
    /// Leaving the elution time window always terminates the walk, and a
    /// fully exhausted walk falls back to the overlap scan itself.
    pub fn pair_elution_boundary(
        &mut self,
        masses: &IsotopeMassSet,
        msms_scan: usize,
        msms_rt: f64,
        overlap_scan: usize,
        direction: BoundaryDirection,
    ) -> Result<usize> {
        let kind = match direction {
            BoundaryDirection::Start => PairSearchKind::ElutionStart,
            BoundaryDirection::Stop => PairSearchKind::ElutionStop,
        };
        let key = PairSearchKey::new(masses, msms_scan, kind);
        if let Some(&scan) = self.pair_scan_cache.get(&key) {
            return Ok(scan);
        }

        let mut boundary = overlap_scan;
        let mut weak_scans = 0_u32;
        for scan in self.directional_scans(overlap_scan, direction) {
            if !self.within_elution_window(scan, msms_rt)? {
                boundary = scan;
                break;
            }
            let (matched, _) = self.envelope_match(masses, scan)?;
            if matched > 2 && matched < self.params.min_isotopomers_allowed as usize {
                weak_scans += 1;
                if weak_scans > self.params.empty_ms_allowed {
                    boundary = scan;
                    break;
                }
            } else if matched < 3 {
                boundary = scan;
                break;
            }
        }

        self.pair_scan_cache.insert(key, boundary);
        Ok(boundary)
    }

    /// Walks MS1 scans outward from the overlap scan until a single
    /// isotopomer mass stops matching or the elution window is left.
    pub fn isotope_elution_boundary(
        &mut self,
        mz: f64,
        msms_rt: f64,
        overlap_scan: usize,
        direction: BoundaryDirection,
    ) -> Result<usize> {
        let mut boundary = overlap_scan;
        for scan in self.directional_scans(overlap_scan, direction) {
            if !self.within_elution_window(scan, msms_rt)? {
                boundary = scan;
                break;
            }
            let faded = match self.matched_intensity(mz, scan)? {
                Some(hit) => hit.intensity <= 0.0,
                None => true,
            };
            if faded {
                boundary = scan;
                break;
            }
        }
        Ok(boundary)
    }

    /// Matches a single m/z against one scan, memoized per (m/z, scan).
    pub fn matched_intensity(
        &mut self,
        mz: f64,
        scan_number: usize,
    ) -> Result<Option<IntensityMatch>> {
        let key = ScanMatchKey::new(mz, scan_number);
        if let Some(hit) = self.scan_match_cache.get(&key) {
            return Ok(*hit);
        }
        let hit = best_match(mz, self.source.peaks(scan_number)?, self.params.mass_error_ppm);
        self.scan_match_cache.insert(key, hit);
        Ok(hit)
    }

    /// Matches a single m/z against the averaged spectrum of a scan
    /// range. A miss yields the target m/z with zero intensity so the
    /// result always carries six entries per envelope.
    pub fn averaged_intensity(
        &mut self,
        mz: f64,
        start_scan: usize,
        stop_scan: usize,
    ) -> Result<IntensityMatch> {
        let key = RangeMatchKey::new(mz, start_scan, stop_scan);
        if let Some(hit) = self.range_match_cache.get(&key) {
            return Ok(*hit);
        }
        let peaks = self.source.averaged_peaks(start_scan, stop_scan)?;
        let hit = best_match(mz, &peaks, self.params.mass_error_ppm)
            .unwrap_or_else(|| IntensityMatch::absent(mz));
        self.range_match_cache.insert(key, hit);
        Ok(hit)
    }

    /// Per-scan elution profile of one m/z across a scan range. Scans
    /// without a match report zero intensity at their retention time.
    pub fn intensity_profile(
        &mut self,
        mz: f64,
        start_scan: usize,
        stop_scan: usize,
    ) -> Result<Vec<(f64, f64)>> {
        let scans = self.ms1_scans_between(start_scan, stop_scan);
        let mut profile = Vec::with_capacity(scans.len());
        for scan in scans {
            let rt = self.source.retention_time(scan)?;
            let intensity = self
                .matched_intensity(mz, scan)?
                .map_or(0.0, |hit| hit.intensity);
            profile.push((rt, intensity));
        }
        Ok(profile)
    }

    fn envelope_match(&mut self, masses: &IsotopeMassSet, scan: usize) -> Result<(usize, f64)> {
        let mut matched = 0_usize;
        let mut total = 0.0_f64;
        for mz in masses.all_masses() {
            if let Some(hit) = self.matched_intensity(mz, scan)? {
                matched += 1;
                total += hit.intensity;
            }
        }
        Ok((matched, total))
    }

    fn within_elution_window(&self, scan: usize, msms_rt: f64) -> Result<bool> {
        let rt = self.source.retention_time(scan)?;
        Ok((rt - msms_rt).abs() <= self.params.elution_window_minutes)
    }

    fn ms1_scans_between(&self, first_scan: usize, last_scan: usize) -> Vec<usize> {
        self.source
            .ms1_scan_numbers()
            .iter()
            .copied()
            .filter(|&s| s >= first_scan && s <= last_scan)
            .collect()
    }

    fn directional_scans(&self, from_scan: usize, direction: BoundaryDirection) -> Vec<usize> {
        let ms1 = self.source.ms1_scan_numbers();
        match direction {
            BoundaryDirection::Start => ms1
                .iter()
                .copied()
                .filter(|&s| s <= from_scan)
                .rev()
                .collect(),
            BoundaryDirection::Stop => {
                ms1.iter().copied().filter(|&s| s >= from_scan).collect()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_sources::InMemoryScanSource;
    use crate::models::{
        Peak,
        ScanRecord,
    };
    use std::cell::Cell;
    use std::sync::Arc;

    fn envelope() -> IsotopeMassSet {
        IsotopeMassSet {
            light: [500.0, 500.5, 501.0],
            heavy: [502.0, 502.5, 503.0],
        }
    }

    fn envelope_peaks(intensity: f64) -> Vec<Peak> {
        envelope()
            .all_masses()
            .iter()
            .map(|&mz| Peak { mz, intensity })
            .collect()
    }

    fn ms1(scan_number: usize, retention_time: f64, peaks: Vec<Peak>) -> ScanRecord {
        ScanRecord {
            scan_number,
            retention_time,
            precursor_mass: 0.0,
            ms_level: 1,
            peaks,
        }
    }

    fn msms(scan_number: usize, retention_time: f64) -> ScanRecord {
        ScanRecord {
            scan_number,
            retention_time,
            precursor_mass: 500.0,
            ms_level: 2,
            peaks: Vec::new(),
        }
    }

    /// MS1 scans every 0.1 min with the full envelope present, an MS/MS
    /// scan in the middle of the run.
    fn full_signal_source() -> InMemoryScanSource {
        let mut scans = Vec::new();
        for i in 0..9 {
            let scan_number = i + 1;
            let rt = 0.1 * i as f64;
            if scan_number == 5 {
                scans.push(msms(scan_number, rt));
            } else {
                scans.push(ms1(scan_number, rt, envelope_peaks(100.0 + i as f64)));
            }
        }
        InMemoryScanSource::try_new(scans).unwrap()
    }

    fn params() -> QuantParams {
        QuantParams {
            mass_error_ppm: 10.0,
            overlap_window_minutes: 0.14,
            elution_window_minutes: 1.0,
            empty_ms_allowed: 1,
            min_isotopomers_allowed: 5,
            pearson_threshold: 0.5,
        }
    }

    #[test]
    fn overlap_picks_most_intense_qualifying_scan() {
        let source = full_signal_source();
        let mut engine = ScanSearchEngine::new(&source, params());
        // Window of 0.14 min around scan 5 (rt 0.4) covers scans 4 and 6;
        // scan 6 carries the larger envelope.
        let scan = engine.max_overlap_scan(&envelope(), 5, 0.4).unwrap();
        assert_eq!(scan, 6);
    }

    #[test]
    fn overlap_without_signal_returns_msms_scan() {
        let scans = vec![
            ms1(1, 0.0, vec![Peak { mz: 900.0, intensity: 50.0 }]),
            msms(2, 0.1),
            ms1(3, 0.2, vec![Peak { mz: 900.0, intensity: 50.0 }]),
        ];
        let source = InMemoryScanSource::try_new(scans).unwrap();
        let mut engine = ScanSearchEngine::new(&source, params());
        let scan = engine.max_overlap_scan(&envelope(), 2, 0.1).unwrap();
        assert_eq!(scan, 2);
    }

    #[test]
    fn sparse_scans_do_not_qualify_for_overlap() {
        // Only 4 of 6 envelope masses present, below the minimum of 5.
        let sparse: Vec<Peak> = envelope_peaks(1000.0).into_iter().take(4).collect();
        let scans = vec![ms1(1, 0.0, sparse), msms(2, 0.05)];
        let source = InMemoryScanSource::try_new(scans).unwrap();
        let mut engine = ScanSearchEngine::new(&source, params());
        let scan = engine.max_overlap_scan(&envelope(), 2, 0.05).unwrap();
        assert_eq!(scan, 2);
    }

    #[test]
    fn boundary_stops_where_envelope_disappears() {
        let scans = vec![
            ms1(1, 0.0, Vec::new()),
            ms1(2, 0.1, envelope_peaks(100.0)),
            ms1(3, 0.2, envelope_peaks(200.0)),
            msms(4, 0.25),
            ms1(5, 0.3, envelope_peaks(150.0)),
            ms1(6, 0.4, Vec::new()),
        ];
        let source = InMemoryScanSource::try_new(scans).unwrap();
        let mut engine = ScanSearchEngine::new(&source, params());
        let masses = envelope();
        let overlap = engine.max_overlap_scan(&masses, 4, 0.25).unwrap();
        assert_eq!(overlap, 3);
        let start = engine
            .pair_elution_boundary(&masses, 4, 0.25, overlap, BoundaryDirection::Start)
            .unwrap();
        let stop = engine
            .pair_elution_boundary(&masses, 4, 0.25, overlap, BoundaryDirection::Stop)
            .unwrap();
        assert_eq!(start, 1);
        assert_eq!(stop, 6);
    }

    #[test]
    fn boundary_tolerates_allowed_weak_scans() {
        // Scan 2 matches 4 of 6 masses, weak but tolerated once.
        let weak: Vec<Peak> = envelope_peaks(50.0).into_iter().take(4).collect();
        let scans = vec![
            ms1(1, 0.0, envelope_peaks(100.0)),
            ms1(2, 0.1, weak.clone()),
            ms1(3, 0.2, envelope_peaks(200.0)),
            msms(4, 0.25),
            ms1(5, 0.3, weak.clone()),
            ms1(6, 0.4, weak),
        ];
        let source = InMemoryScanSource::try_new(scans).unwrap();
        let mut engine = ScanSearchEngine::new(&source, params());
        let masses = envelope();
        let start = engine
            .pair_elution_boundary(&masses, 4, 0.25, 3, BoundaryDirection::Start)
            .unwrap();
        // Walk passes the weak scan 2, exhausts at scan 1, keeps scan 3.
        assert_eq!(start, 3);
        let stop = engine
            .pair_elution_boundary(&masses, 4, 0.25, 3, BoundaryDirection::Stop)
            .unwrap();
        // Second consecutive weak scan exceeds the allowance of one.
        assert_eq!(stop, 6);
    }

    #[test]
    fn weak_scan_allowance_accumulates_across_strong_scans() {
        // Weak scans 3 and 5 are separated by a strong scan; the counter
        // still reaches two and exceeds the allowance of one.
        let weak: Vec<Peak> = envelope_peaks(50.0).into_iter().take(4).collect();
        let scans = vec![
            ms1(1, 0.0, envelope_peaks(100.0)),
            msms(2, 0.05),
            ms1(3, 0.1, weak.clone()),
            ms1(4, 0.2, envelope_peaks(200.0)),
            ms1(5, 0.3, weak),
            ms1(6, 0.4, envelope_peaks(150.0)),
        ];
        let source = InMemoryScanSource::try_new(scans).unwrap();
        let mut engine = ScanSearchEngine::new(&source, params());
        let stop = engine
            .pair_elution_boundary(&envelope(), 2, 0.05, 1, BoundaryDirection::Stop)
            .unwrap();
        assert_eq!(stop, 5);
    }

    #[test]
    fn boundary_respects_elution_window() {
        let scans = vec![
            ms1(1, 0.0, envelope_peaks(100.0)),
            msms(2, 0.05),
            ms1(3, 0.1, envelope_peaks(200.0)),
            ms1(4, 2.0, envelope_peaks(300.0)),
        ];
        let source = InMemoryScanSource::try_new(scans).unwrap();
        let mut engine = ScanSearchEngine::new(&source, params());
        let masses = envelope();
        let stop = engine
            .pair_elution_boundary(&masses, 2, 0.05, 3, BoundaryDirection::Stop)
            .unwrap();
        // Scan 4 is 1.95 min past the MS/MS scan, outside the 1 min window.
        assert_eq!(stop, 4);
    }

    #[test]
    fn isotope_boundary_stops_on_missing_match() {
        let single = |intensity: f64| vec![Peak { mz: 500.0, intensity }];
        let scans = vec![
            ms1(1, 0.0, Vec::new()),
            ms1(2, 0.1, single(100.0)),
            ms1(3, 0.2, single(200.0)),
            ms1(4, 0.3, single(150.0)),
            ms1(5, 0.4, Vec::new()),
        ];
        let source = InMemoryScanSource::try_new(scans).unwrap();
        let mut engine = ScanSearchEngine::new(&source, params());
        let start = engine
            .isotope_elution_boundary(500.0, 0.2, 3, BoundaryDirection::Start)
            .unwrap();
        let stop = engine
            .isotope_elution_boundary(500.0, 0.2, 3, BoundaryDirection::Stop)
            .unwrap();
        assert_eq!(start, 1);
        assert_eq!(stop, 5);
    }

    #[test]
    fn profile_reports_zero_for_unmatched_scans() {
        let scans = vec![
            ms1(1, 0.0, vec![Peak { mz: 500.0, intensity: 80.0 }]),
            ms1(2, 0.1, Vec::new()),
            ms1(3, 0.2, vec![Peak { mz: 500.0, intensity: 120.0 }]),
        ];
        let source = InMemoryScanSource::try_new(scans).unwrap();
        let mut engine = ScanSearchEngine::new(&source, params());
        let profile = engine.intensity_profile(500.0, 1, 3).unwrap();
        assert_eq!(profile.len(), 3);
        assert!((profile[0].1 - 80.0).abs() < 1e-9);
        assert!((profile[1].1 - 0.0).abs() < 1e-9);
        assert!((profile[2].1 - 120.0).abs() < 1e-9);
    }

    /// Delegating source that counts how many times scan data is read.
    struct CountingSource {
        inner: InMemoryScanSource,
        scan_reads: Cell<usize>,
    }

    impl CountingSource {
        fn new(inner: InMemoryScanSource) -> Self {
            Self {
                inner,
                scan_reads: Cell::new(0),
            }
        }
    }

    impl ScanDataSource for CountingSource {
        fn num_scans(&self) -> usize {
            self.inner.num_scans()
        }

        fn scan(&self, scan_number: usize) -> crate::errors::Result<&ScanRecord> {
            self.scan_reads.set(self.scan_reads.get() + 1);
            self.inner.scan(scan_number)
        }

        fn ms1_scan_numbers(&self) -> &[usize] {
            self.inner.ms1_scan_numbers()
        }

        fn scan_at_retention_time(&self, retention_time: f64) -> usize {
            self.inner.scan_at_retention_time(retention_time)
        }

        fn averaged_peaks(
            &self,
            start_scan: usize,
            stop_scan: usize,
        ) -> crate::errors::Result<Arc<[Peak]>> {
            self.scan_reads.set(self.scan_reads.get() + 1);
            self.inner.averaged_peaks(start_scan, stop_scan)
        }

        fn run_start_time(&self) -> f64 {
            self.inner.run_start_time()
        }

        fn run_end_time(&self) -> f64 {
            self.inner.run_end_time()
        }
    }

    #[test]
    fn repeated_searches_hit_the_cache() {
        let source = CountingSource::new(full_signal_source());
        let mut engine = ScanSearchEngine::new(&source, params());
        let masses = envelope();

        let overlap = engine.max_overlap_scan(&masses, 5, 0.4).unwrap();
        let start = engine
            .pair_elution_boundary(&masses, 5, 0.4, overlap, BoundaryDirection::Start)
            .unwrap();
        let avg = engine.averaged_intensity(500.0, start, overlap).unwrap();
        let reads_after_first_pass = source.scan_reads.get();
        assert!(reads_after_first_pass > 0);

        let overlap_again = engine.max_overlap_scan(&masses, 5, 0.4).unwrap();
        let start_again = engine
            .pair_elution_boundary(&masses, 5, 0.4, overlap, BoundaryDirection::Start)
            .unwrap();
        let avg_again = engine.averaged_intensity(500.0, start, overlap).unwrap();

        assert_eq!(overlap, overlap_again);
        assert_eq!(start, start_again);
        assert!((avg.intensity - avg_again.intensity).abs() < 1e-9);
        assert_eq!(source.scan_reads.get(), reads_after_first_pass);
    }
}
