use crate::models::Peak;
use serde::Serialize;

/// A centroid peak matched to a target m/z within a ppm tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IntensityMatch {
    pub mz: f64,
    pub intensity: f64,
}

impl IntensityMatch {
    pub fn absent(target_mz: f64) -> Self {
        Self {
            mz: target_mz,
            intensity: 0.0,
        }
    }
}

/// Finds the most intense peak within `mass_error_ppm` of `target_mz`.
///
/// The tolerance window is open on both sides and scales with the target
/// mass. Ties keep the first peak encountered in m/z order.
pub fn best_match(target_mz: f64, peaks: &[Peak], mass_error_ppm: f64) -> Option<IntensityMatch> {
    let tolerance = target_mz * mass_error_ppm / 1e6;
    let lower = target_mz - tolerance;
    let upper = target_mz + tolerance;

    let mut best: Option<IntensityMatch> = None;
    for peak in peaks {
        if peak.mz <= lower || peak.mz >= upper {
            continue;
        }
        let replace = match best {
            Some(ref current) => peak.intensity > current.intensity,
            None => true,
        };
        if replace {
            best = Some(IntensityMatch {
                mz: peak.mz,
                intensity: peak.intensity,
            });
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peak(mz: f64, intensity: f64) -> Peak {
        Peak { mz, intensity }
    }

    #[test]
    fn picks_most_intense_peak_in_window() {
        let peaks = vec![
            peak(500.000, 100.0),
            peak(500.002, 900.0),
            peak(500.004, 300.0),
        ];
        let hit = best_match(500.0, &peaks, 10.0).unwrap();
        assert!((hit.mz - 500.002).abs() < 1e-9);
        assert!((hit.intensity - 900.0).abs() < 1e-9);
    }

    #[test]
    fn window_scales_with_target_mass() {
        // 10 ppm of 500 is 0.005; a peak 0.006 away is out.
        let peaks = vec![peak(500.006, 500.0)];
        assert!(best_match(500.0, &peaks, 10.0).is_none());
        // 10 ppm of 1000 is 0.01; the same absolute offset is now in.
        let peaks = vec![peak(1000.006, 500.0)];
        assert!(best_match(1000.0, &peaks, 10.0).is_some());
    }

    #[test]
    fn window_edges_are_exclusive() {
        let peaks = vec![peak(500.005, 500.0)];
        assert!(best_match(500.0, &peaks, 10.0).is_none());
    }

    #[test]
    fn tie_keeps_first_peak() {
        let peaks = vec![peak(499.998, 400.0), peak(500.002, 400.0)];
        let hit = best_match(500.0, &peaks, 10.0).unwrap();
        assert!((hit.mz - 499.998).abs() < 1e-9);
    }

    #[test]
    fn empty_spectrum_has_no_match() {
        assert!(best_match(500.0, &[], 10.0).is_none());
    }
}
