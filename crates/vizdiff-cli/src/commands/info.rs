use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use vizdiff_core::io::probe;

#[derive(Args)]
pub struct InfoArgs {
    /// Input image file
    pub file: PathBuf,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let bytes = std::fs::read(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let info = probe(&bytes).with_context(|| format!("Cannot inspect {}", args.file.display()))?;

    println!("File:        {}", args.file.display());
    println!("Format:      {}", info.format);
    println!("Dimensions:  {}", info.dimensions);
    println!("Pixels:      {}", info.dimensions.pixel_count());
    println!("File size:   {:.1} KB", bytes.len() as f64 / 1024.0);

    Ok(())
}
