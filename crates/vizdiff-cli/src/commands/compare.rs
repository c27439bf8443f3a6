use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Args;
use tracing::info;
use vizdiff_core::mask::IgnoreRegion;
use vizdiff_core::pipeline::{compare_reported, CompareConfig};
use vizdiff_core::preprocess::ReconcileMode;
use vizdiff_core::visualize::VisualizationOptions;

use crate::progress::StageProgress;
use crate::summary::print_comparison_summary;

#[derive(Args)]
pub struct CompareArgs {
    /// The reference ("before") image
    pub before: PathBuf,

    /// The candidate ("after") image
    pub after: PathBuf,

    /// Comparison config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Sensitivity from 1 (lenient) to 100 (strict)
    #[arg(short, long)]
    pub sensitivity: Option<f32>,

    /// Longest side, in pixels, images are downscaled to
    #[arg(long)]
    pub max_dimension: Option<u32>,

    /// Crop mismatched images to their shared top-left area instead of resampling
    #[arg(long)]
    pub crop: bool,

    /// JSON file with a list of ignore regions
    #[arg(long)]
    pub regions: Option<PathBuf>,

    /// Ignore a rectangle given as x,y,width,height in before-image pixels (repeatable)
    #[arg(long = "ignore-rect", value_parser = parse_rect)]
    pub ignore_rect: Vec<IgnoreRegion>,

    /// Directory to write visualization PNGs into
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,

    /// Skip rendering visualizations
    #[arg(long)]
    pub no_visualizations: bool,

    /// Print the full result as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: &CompareArgs) -> Result<()> {
    let config = build_config(args)?;
    let regions = load_regions(args)?;

    let before = std::fs::read(&args.before)
        .with_context(|| format!("Failed to read {}", args.before.display()))?;
    let after = std::fs::read(&args.after)
        .with_context(|| format!("Failed to read {}", args.after.display()))?;

    let progress = Arc::new(StageProgress::new(args.json)?);
    let outcome = compare_reported(&before, &after, &regions, &config, progress.clone());
    progress.finish();
    let result = outcome.context("Comparison failed")?;

    let mut written = Vec::new();
    if let (Some(dir), Some(vis)) = (&args.out_dir, &result.visualizations) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
        for (kind, png) in vis.iter() {
            let path = dir.join(format!("{}.png", kind.key()));
            std::fs::write(&path, png)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            written.push(path);
        }
        info!(count = written.len(), dir = %dir.display(), "Wrote visualizations");
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_comparison_summary(&args.before, &args.after, &result, &written);
    }

    Ok(())
}

fn build_config(args: &CompareArgs) -> Result<CompareConfig> {
    let mut config = if let Some(ref config_path) = args.config {
        let contents = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config {}", config_path.display()))?;
        toml::from_str(&contents).context("Invalid comparison config")?
    } else {
        CompareConfig::default()
    };

    if let Some(s) = args.sensitivity {
        config.sensitivity = s;
    }
    if let Some(max) = args.max_dimension {
        config.preprocess.max_dimension = max;
    }
    if args.crop {
        config.preprocess.reconcile = ReconcileMode::Crop;
    }
    // Renderings only go somewhere with an output directory or JSON.
    if args.no_visualizations || (args.out_dir.is_none() && !args.json) {
        config.visualizations = VisualizationOptions::none();
    }

    config.validate().context("Invalid comparison settings")?;
    Ok(config)
}

fn load_regions(args: &CompareArgs) -> Result<Vec<IgnoreRegion>> {
    let mut regions = match args.regions {
        Some(ref path) => read_regions_file(path)?,
        None => Vec::new(),
    };
    regions.extend(args.ignore_rect.iter().cloned());
    Ok(regions)
}

fn read_regions_file(path: &Path) -> Result<Vec<IgnoreRegion>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read regions {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Invalid regions file {}", path.display()))
}

fn parse_rect(s: &str) -> Result<IgnoreRegion> {
    let parts: Vec<f64> = s
        .split(',')
        .map(|p| p.trim().parse::<f64>())
        .collect::<std::result::Result<_, _>>()
        .with_context(|| format!("Expected x,y,width,height, got '{s}'"))?;
    let [x, y, width, height] = parts[..] else {
        bail!("Expected 4 comma-separated numbers, got {}", parts.len());
    };
    Ok(IgnoreRegion::rectangle(x, y, width, height))
}
