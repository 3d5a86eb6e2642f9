use crate::config::{
    AnalysisConfig,
    OutputConfig,
};
use crate::errors::CliError;
use indicatif::{
    ProgressIterator,
    ProgressStyle,
};
use methylquant::{
    InMemoryScanSource,
    PairQuantifier,
    PeptideCsvReader,
    ResultCsvWriter,
};
use std::fs::File;
use std::path::Path;
use std::time::Instant;
use tracing::{
    info,
    warn,
};

/// Quantifies every row of one peptide identification CSV and writes
/// the result table next to the untouched input columns.
///
/// Rows are grouped by raw file so each scan stream is loaded exactly
/// once, and within a file processed in ascending MS/MS scan order. A
/// row that fails keeps its place in the output with blank quantitation
/// columns rather than aborting the file.
pub fn process_peptide_file(
    peptide_path: &Path,
    scan_data_dir: &Path,
    analysis: &AnalysisConfig,
    output: &OutputConfig,
) -> Result<(), CliError> {
    let start = Instant::now();
    let reader = PeptideCsvReader::from_path(peptide_path)?;
    info!(
        "Read {} identifications from {}",
        reader.len(),
        peptide_path.display()
    );

    let stem = peptide_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "results".to_string());
    let out_path = output.directory.join(format!("{}_quant.csv", stem));
    let out_file = File::create(&out_path).map_err(|e| CliError::Io {
        source: e.to_string(),
        path: Some(out_path.to_string_lossy().to_string()),
    })?;
    let mut writer = ResultCsvWriter::new(
        out_file,
        analysis.output_style,
        reader.headers(),
        !reader.has_mass_difference_column(),
    )?;

    let style = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({eta})",
    )
    .unwrap();
    let mut n_quantified = 0_usize;
    let mut n_failed = 0_usize;
    for data_file in reader.data_files() {
        let scan_path = scan_data_dir.join(format!("{}.json", data_file));
        let source = InMemoryScanSource::from_json_file(&scan_path)?;
        let mut quantifier = PairQuantifier::new(
            &source,
            analysis.params.clone(),
            analysis.mass_shift_profile.clone(),
            analysis.sequenced_partner,
        )?;

        let rows = reader.rows_for_data_file(&data_file);
        info!("Quantifying {} rows against {}", rows.len(), data_file);
        for row in rows.into_iter().progress_with_style(style.clone()) {
            match quantifier.quantify(row) {
                Ok(result) => {
                    writer.write_result(row, &result)?;
                    n_quantified += 1;
                }
                Err(e) => {
                    warn!(
                        "Skipping {} at scan {}: {:?}",
                        row.sequence, row.msms_scan, e
                    );
                    writer.write_failure(row)?;
                    n_failed += 1;
                }
            }
        }
    }
    writer.flush()?;

    info!(
        "Wrote {} ({} quantified, {} failed) in {:?}",
        out_path.display(),
        n_quantified,
        n_failed,
        start.elapsed()
    );
    Ok(())
}
