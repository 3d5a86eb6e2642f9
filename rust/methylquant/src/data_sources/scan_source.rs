use crate::errors::{
    MethylQuantError,
    Result,
};
use crate::models::{
    Peak,
    ScanRecord,
};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Read-only access to one raw file's scan stream.
///
/// Implementations index every scan once at load time, trading startup
/// latency for O(1) random access afterwards. Scan numbers start at 1 and
/// retention time is monotonically non-decreasing with scan number.
///
/// Out-of-range scan numbers are a hard [`MethylQuantError::UnresolvedScan`]
/// error rather than a silent empty answer: they indicate broken boundary
/// arithmetic upstream.
pub trait ScanDataSource {
    fn num_scans(&self) -> usize;
    fn scan(&self, scan_number: usize) -> Result<&ScanRecord>;
    /// Ordered list of MS1-only scan numbers, derived once at load.
    fn ms1_scan_numbers(&self) -> &[usize];
    /// The scan number whose retention time is closest from above to `rt`.
    fn scan_at_retention_time(&self, rt: f64) -> usize;
    /// Averaged MS1 spectrum over the inclusive scan range.
    fn averaged_peaks(&self, start_scan: usize, stop_scan: usize) -> Result<Arc<[Peak]>>;
    fn run_start_time(&self) -> f64;
    fn run_end_time(&self) -> f64;

    fn retention_time(&self, scan_number: usize) -> Result<f64> {
        Ok(self.scan(scan_number)?.retention_time)
    }

    fn precursor_mass(&self, scan_number: usize) -> Result<f64> {
        Ok(self.scan(scan_number)?.precursor_mass)
    }

    fn ms_level(&self, scan_number: usize) -> Result<u8> {
        Ok(self.scan(scan_number)?.ms_level)
    }

    fn peaks(&self, scan_number: usize) -> Result<&[Peak]> {
        Ok(&self.scan(scan_number)?.peaks)
    }
}

/// Relative width of the m/z bins used when merging peak lists into an
/// averaged spectrum.
const AVERAGING_BIN_PPM: f64 = 5.0;

/// A fully in-memory scan index, the concrete [`ScanDataSource`] used by
/// the CLI. Built once per raw file and dropped (with all its caches)
/// when the file is done.
pub struct InMemoryScanSource {
    scans: Vec<ScanRecord>,
    ms1_scans: Vec<usize>,
    averaged_cache: RefCell<HashMap<(usize, usize), Arc<[Peak]>>>,
}

impl InMemoryScanSource {
    /// Validates and indexes a scan stream.
    ///
    /// Scan numbers must be contiguous from 1 and retention times
    /// monotonically non-decreasing. Zero-intensity peaks are dropped
    /// here so downstream code never sees them.
    pub fn try_new(mut scans: Vec<ScanRecord>) -> Result<Self> {
        if scans.is_empty() {
            return Err(MethylQuantError::MalformedScanData {
                context: "scan stream is empty".to_string(),
            });
        }
        for (idx, scan) in scans.iter().enumerate() {
            if scan.scan_number != idx + 1 {
                return Err(MethylQuantError::MalformedScanData {
                    context: format!(
                        "scan numbers must be contiguous from 1, found {} at position {}",
                        scan.scan_number, idx
                    ),
                });
            }
            if idx > 0 && scan.retention_time < scans[idx - 1].retention_time {
                return Err(MethylQuantError::MalformedScanData {
                    context: format!(
                        "retention time decreases at scan {}",
                        scan.scan_number
                    ),
                });
            }
        }
        for scan in scans.iter_mut() {
            scan.peaks.retain(|p| p.intensity > 0.0);
        }
        let ms1_scans: Vec<usize> = scans
            .iter()
            .filter(|s| s.is_ms1())
            .map(|s| s.scan_number)
            .collect();
        Ok(InMemoryScanSource {
            scans,
            ms1_scans,
            averaged_cache: RefCell::new(HashMap::new()),
        })
    }

    /// Loads a JSON-serialized scan stream (an array of scan records).
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path).map_err(|e| MethylQuantError::Io {
            source: e,
            path: Some(path.to_path_buf()),
        })?;
        let reader = std::io::BufReader::new(file);
        let scans: Vec<ScanRecord> = serde_json::from_reader(reader)?;
        let out = Self::try_new(scans)?;
        info!(
            "Indexed {} scans ({} MS1) from {}",
            out.num_scans(),
            out.ms1_scans.len(),
            path.display()
        );
        Ok(out)
    }

    fn compute_averaged(&self, start_scan: usize, stop_scan: usize) -> Result<Arc<[Peak]>> {
        let ms1_in_range: Vec<usize> = self
            .ms1_scans
            .iter()
            .copied()
            .filter(|&s| s >= start_scan && s <= stop_scan)
            .collect();
        if ms1_in_range.is_empty() {
            return Ok(Vec::new().into());
        }

        let mut pooled: Vec<Peak> = Vec::new();
        for scan_number in &ms1_in_range {
            pooled.extend_from_slice(self.peaks(*scan_number)?);
        }
        pooled.sort_unstable_by(|a, b| a.mz.total_cmp(&b.mz));

        // Merge peaks that fall in the same narrow m/z bin; intensity is
        // averaged over the number of contributing MS1 scans so sparse
        // signals are penalised the way a real averaged spectrum would.
        let n_scans = ms1_in_range.len() as f64;
        let mut merged: Vec<Peak> = Vec::with_capacity(pooled.len());
        let mut iter = pooled.into_iter();
        if let Some(first) = iter.next() {
            let mut group_mz_weighted = first.mz * first.intensity;
            let mut group_intensity = first.intensity;
            let mut group_anchor = first.mz;
            for peak in iter {
                let bin = group_anchor * AVERAGING_BIN_PPM / 1e6;
                if peak.mz - group_anchor <= bin {
                    group_mz_weighted += peak.mz * peak.intensity;
                    group_intensity += peak.intensity;
                } else {
                    merged.push(Peak {
                        mz: group_mz_weighted / group_intensity,
                        intensity: group_intensity / n_scans,
                    });
                    group_mz_weighted = peak.mz * peak.intensity;
                    group_intensity = peak.intensity;
                    group_anchor = peak.mz;
                }
            }
            merged.push(Peak {
                mz: group_mz_weighted / group_intensity,
                intensity: group_intensity / n_scans,
            });
        }
        Ok(merged.into())
    }
}

impl ScanDataSource for InMemoryScanSource {
    fn num_scans(&self) -> usize {
        self.scans.len()
    }

    fn scan(&self, scan_number: usize) -> Result<&ScanRecord> {
        if scan_number == 0 || scan_number > self.scans.len() {
            return Err(MethylQuantError::UnresolvedScan {
                scan_number,
                num_scans: self.scans.len(),
            });
        }
        Ok(&self.scans[scan_number - 1])
    }

    fn ms1_scan_numbers(&self) -> &[usize] {
        &self.ms1_scans
    }

    fn scan_at_retention_time(&self, rt: f64) -> usize {
        let idx = self
            .scans
            .partition_point(|s| s.retention_time < rt)
            .min(self.scans.len() - 1);
        self.scans[idx].scan_number
    }

    fn averaged_peaks(&self, start_scan: usize, stop_scan: usize) -> Result<Arc<[Peak]>> {
        // Resolve both endpoints so an out-of-range request fails loudly.
        self.scan(start_scan)?;
        self.scan(stop_scan)?;
        if let Some(cached) = self.averaged_cache.borrow().get(&(start_scan, stop_scan)) {
            return Ok(cached.clone());
        }
        let computed = self.compute_averaged(start_scan, stop_scan)?;
        self.averaged_cache
            .borrow_mut()
            .insert((start_scan, stop_scan), computed.clone());
        Ok(computed)
    }

    fn run_start_time(&self) -> f64 {
        self.scans[0].retention_time
    }

    fn run_end_time(&self) -> f64 {
        self.scans[self.scans.len() - 1].retention_time
    }
}
