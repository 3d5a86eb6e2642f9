use super::score::Confidence;
use crate::errors::Result;
use crate::models::PeptideIdentification;
use crate::search::IntensityMatch;
use serde::Deserialize;
use std::io::Write;

/// How much of the quantitation evidence ends up in the output table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputStyle {
    /// Every matched mass, intensity, boundary and correlation.
    #[default]
    Full,
    /// Only the headline correlation, ratio, score and confidence columns.
    Summary,
}

/// Evidence from averaging the pair envelope over its shared elution
/// range and correlating the two isotope distributions.
#[derive(Debug, Clone)]
pub struct IsotopeStrategyResult {
    pub start_scan: usize,
    pub stop_scan: usize,
    pub start_rt: f64,
    pub stop_rt: f64,
    pub light: [IntensityMatch; 3],
    pub heavy: [IntensityMatch; 3],
    pub correlation: Option<f64>,
    pub ratio: Option<f64>,
}

/// Evidence from correlating per-isotopomer elution profiles between
/// the light and heavy partners.
#[derive(Debug, Clone)]
pub struct ElutionStrategyResult {
    pub light: [IntensityMatch; 3],
    pub heavy: [IntensityMatch; 3],
    pub correlations: [Option<f64>; 3],
    pub good_count: usize,
    pub ratio: Option<f64>,
}

/// Complete quantitation outcome for one identified peptide.
#[derive(Debug, Clone)]
pub struct PairResult {
    pub mass_shift: f64,
    pub isotope: IsotopeStrategyResult,
    pub elution: ElutionStrategyResult,
    pub score: f64,
    pub confidence: Confidence,
}

const FULL_HEADERS: &[&str] = &[
    "Peptide Start Scan",
    "Peptide Stop Scan",
    "Peptide Start RT (min)",
    "Peptide Stop RT (min)",
    "Light m/z 1",
    "Light Intensity 1",
    "Light m/z 2",
    "Light Intensity 2",
    "Light m/z 3",
    "Light Intensity 3",
    "Heavy m/z 1",
    "Heavy Intensity 1",
    "Heavy m/z 2",
    "Heavy Intensity 2",
    "Heavy m/z 3",
    "Heavy Intensity 3",
    "Isotope Distribution Correlation",
    "H/L Ratio #1",
    "Light m/z 1 Elution",
    "Light Intensity 1 Elution",
    "Heavy m/z 1 Elution",
    "Heavy Intensity 1 Elution",
    "Light m/z 2 Elution",
    "Light Intensity 2 Elution",
    "Heavy m/z 2 Elution",
    "Heavy Intensity 2 Elution",
    "Light m/z 3 Elution",
    "Light Intensity 3 Elution",
    "Heavy m/z 3 Elution",
    "Heavy Intensity 3 Elution",
    "Elution Profile Correlation 1",
    "Elution Profile Correlation 2",
    "Elution Profile Correlation 3",
    "# Good Elution Profile Correlations",
    "H/L Ratio #2",
    "MethylQuant Score",
    "MethylQuant Confidence",
];

const SUMMARY_HEADERS: &[&str] = &[
    "Isotope Distribution Correlation",
    "# Good Elution Profile Correlations",
    "H/L Ratio #1",
    "H/L Ratio #2",
    "MethylQuant Score",
    "MethylQuant Confidence",
];

fn fmt_opt(value: Option<f64>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "NA".to_string(),
    }
}

impl PairResult {
    pub fn quant_headers(style: OutputStyle) -> &'static [&'static str] {
        match style {
            OutputStyle::Full => FULL_HEADERS,
            OutputStyle::Summary => SUMMARY_HEADERS,
        }
    }

    pub fn quant_row(&self, style: OutputStyle) -> Vec<String> {
        match style {
            OutputStyle::Full => {
                let mut row = Vec::with_capacity(FULL_HEADERS.len());
                row.push(self.isotope.start_scan.to_string());
                row.push(self.isotope.stop_scan.to_string());
                row.push(self.isotope.start_rt.to_string());
                row.push(self.isotope.stop_rt.to_string());
                for hit in self.isotope.light.iter().chain(self.isotope.heavy.iter()) {
                    row.push(hit.mz.to_string());
                    row.push(hit.intensity.to_string());
                }
                row.push(fmt_opt(self.isotope.correlation));
                row.push(fmt_opt(self.isotope.ratio));
                for i in 0..3 {
                    let light = &self.elution.light[i];
                    let heavy = &self.elution.heavy[i];
                    row.push(light.mz.to_string());
                    row.push(light.intensity.to_string());
                    row.push(heavy.mz.to_string());
                    row.push(heavy.intensity.to_string());
                }
                for corr in &self.elution.correlations {
                    row.push(fmt_opt(*corr));
                }
                row.push(self.elution.good_count.to_string());
                row.push(fmt_opt(self.elution.ratio));
                row.push(self.score.to_string());
                row.push(self.confidence.to_string());
                row
            }
            OutputStyle::Summary => vec![
                fmt_opt(self.isotope.correlation),
                self.elution.good_count.to_string(),
                fmt_opt(self.isotope.ratio),
                fmt_opt(self.elution.ratio),
                self.score.to_string(),
                self.confidence.to_string(),
            ],
        }
    }
}

/// Writes quantitation rows next to the untouched input columns.
///
/// When the input had no Mass Difference column one is appended so the
/// shift every row was searched with is always on record.
pub struct ResultCsvWriter<W: Write> {
    writer: csv::Writer<W>,
    style: OutputStyle,
    write_mass_difference: bool,
}

impl<W: Write> ResultCsvWriter<W> {
    pub fn new(
        inner: W,
        style: OutputStyle,
        passthrough_headers: &[String],
        write_mass_difference: bool,
    ) -> Result<Self> {
        let mut writer = csv::Writer::from_writer(inner);
        let mut header: Vec<String> = passthrough_headers.to_vec();
        if write_mass_difference {
            header.push("Mass Difference".to_string());
        }
        header.extend(
            PairResult::quant_headers(style)
                .iter()
                .map(|h| h.to_string()),
        );
        writer.write_record(&header)?;
        Ok(Self {
            writer,
            style,
            write_mass_difference,
        })
    }

    pub fn write_result(
        &mut self,
        peptide: &PeptideIdentification,
        result: &PairResult,
    ) -> Result<()> {
        let mut row = peptide.passthrough.clone();
        if self.write_mass_difference {
            row.push(result.mass_shift.to_string());
        }
        row.extend(result.quant_row(self.style));
        self.writer.write_record(&row)?;
        Ok(())
    }

    /// Writes a row whose quantitation columns are all blank, keeping
    /// the output aligned with the input when a row could not be
    /// processed.
    pub fn write_failure(&mut self, peptide: &PeptideIdentification) -> Result<()> {
        let mut row = peptide.passthrough.clone();
        let blanks = PairResult::quant_headers(self.style).len()
            + usize::from(self.write_mass_difference);
        row.extend(std::iter::repeat(String::new()).take(blanks));
        self.writer.write_record(&row)?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
