use crate::models::IsotopeMassSet;

/// An m/z value made hashable through its exact bit pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct MzKey(u64);

impl From<f64> for MzKey {
    fn from(mz: f64) -> Self {
        Self(mz.to_bits())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum PairSearchKind {
    Overlap,
    ElutionStart,
    ElutionStop,
}

/// Cache key for whole-envelope searches anchored at an MS/MS scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct PairSearchKey {
    light: [MzKey; 3],
    heavy: [MzKey; 3],
    msms_scan: usize,
    kind: PairSearchKind,
}

impl PairSearchKey {
    pub(crate) fn new(masses: &IsotopeMassSet, msms_scan: usize, kind: PairSearchKind) -> Self {
        Self {
            light: masses.light.map(MzKey::from),
            heavy: masses.heavy.map(MzKey::from),
            msms_scan,
            kind,
        }
    }
}

/// Cache key for a single m/z matched against a single scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct ScanMatchKey {
    mz: MzKey,
    scan_number: usize,
}

impl ScanMatchKey {
    pub(crate) fn new(mz: f64, scan_number: usize) -> Self {
        Self {
            mz: mz.into(),
            scan_number,
        }
    }
}

/// Cache key for a single m/z matched against an averaged scan range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct RangeMatchKey {
    mz: MzKey,
    start_scan: usize,
    stop_scan: usize,
}

impl RangeMatchKey {
    pub(crate) fn new(mz: f64, start_scan: usize, stop_scan: usize) -> Self {
        Self {
            mz: mz.into(),
            start_scan,
            stop_scan,
        }
    }
}
