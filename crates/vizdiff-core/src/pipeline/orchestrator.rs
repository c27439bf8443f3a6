use std::sync::Arc;
use std::time::Instant;

use tracing::info;

use crate::analysis::{analyze_differences, perceptual_similarity};
use crate::consts::SCORE_MODEL_VERSION;
use crate::diff::compute_difference;
use crate::error::{Result, StageError};
use crate::io::decode;
use crate::mask::{build_mask, IgnoreRegion};
use crate::preprocess::normalize;
use crate::visualize::generate;

use super::config::CompareConfig;
use super::types::{ComparisonResult, ComparisonStage, NoOpReporter, ProgressReporter};

/// Run one stage: report it, and tag any failure with the stage.
fn run_stage<T>(
    stage: ComparisonStage,
    reporter: &Arc<dyn ProgressReporter>,
    f: impl FnOnce() -> Result<T>,
) -> std::result::Result<T, StageError> {
    reporter.begin_stage(stage);
    let out = f().map_err(|error| StageError { stage, error })?;
    reporter.finish_stage();
    Ok(out)
}

/// Compare two encoded images with a thread-safe progress reporter.
///
/// Stages run strictly in order (decode, normalize, mask, score, visualize);
/// the first failure aborts the call and no partial result is returned.
/// `regions` may belong to either image; they are unioned into one mask that
/// applies to both.
pub fn compare_reported(
    before: &[u8],
    after: &[u8],
    regions: &[IgnoreRegion],
    config: &CompareConfig,
    reporter: Arc<dyn ProgressReporter>,
) -> std::result::Result<ComparisonResult, StageError> {
    let start = Instant::now();

    let (before_grid, after_grid) = run_stage(ComparisonStage::Decoding, &reporter, || {
        config.validate()?;
        let (b, a) = rayon::join(|| decode(before), || decode(after));
        Ok((b?, a?))
    })?;
    info!(
        before = %before_grid.dimensions(),
        after = %after_grid.dimensions(),
        "Decoded inputs"
    );

    let pair = run_stage(ComparisonStage::Preprocessing, &reporter, || {
        normalize(&before_grid, &after_grid, &config.preprocess)
    })?;
    drop((before_grid, after_grid));
    let working = pair.working_dimensions();

    let mask = run_stage(ComparisonStage::Masking, &reporter, || {
        let resolved = regions
            .iter()
            .map(|r| pair.resolve_region(r))
            .collect::<Result<Vec<IgnoreRegion>>>()?;
        build_mask(working, &resolved)
    })?;

    let (report, analysis) = run_stage(ComparisonStage::Scoring, &reporter, || {
        let mut report = compute_difference(&pair.before, &pair.after, &mask, config.sensitivity)?;
        if config.analysis.perceptual {
            report.metrics.perceptual = Some(perceptual_similarity(&pair.before, &pair.after, &mask));
        }
        let analysis = config.analysis.regions.then(|| {
            analyze_differences(
                &pair.before,
                &pair.after,
                &report.difference_map,
                &report.changed,
                &mask,
            )
        });
        Ok((report, analysis))
    })?;
    info!(
        score = report.score,
        difference_percentage = report.metrics.difference_percentage,
        "Scored image pair"
    );

    let visualizations = run_stage(ComparisonStage::Visualizing, &reporter, || {
        if config.visualizations.enabled().is_empty() {
            return Ok(None);
        }
        generate(&pair.before, &pair.after, &report, &config.visualizations).map(Some)
    })?;

    reporter.begin_stage(ComparisonStage::Done);
    reporter.finish_stage();

    let processing_time_ms = start.elapsed().as_secs_f64() * 1000.0;
    info!(
        dimensions = %working,
        score = report.score,
        elapsed_ms = processing_time_ms,
        "Comparison complete"
    );

    Ok(ComparisonResult {
        difference_score: report.score,
        metrics: report.metrics,
        visualizations,
        analysis,
        dimensions: working.to_string(),
        before_dimensions: pair.original_before,
        after_dimensions: pair.original_after,
        score_version: SCORE_MODEL_VERSION,
        processing_time_ms,
    })
}

/// Compare two encoded images.
///
/// Convenience wrapper around [`compare_reported`] with a no-op reporter.
pub fn compare(
    before: &[u8],
    after: &[u8],
    regions: &[IgnoreRegion],
    config: &CompareConfig,
) -> std::result::Result<ComparisonResult, StageError> {
    compare_reported(before, after, regions, config, Arc::new(NoOpReporter))
}
