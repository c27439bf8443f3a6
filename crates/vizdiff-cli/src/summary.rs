use std::path::Path;

use console::Style;
use vizdiff_core::pipeline::ComparisonResult;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    score_low: Style,
    score_mid: Style,
    score_high: Style,
    disabled: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            score_low: Style::new().green().bold(),
            score_mid: Style::new().yellow().bold(),
            score_high: Style::new().red().bold(),
            disabled: Style::new().dim().yellow(),
            path: Style::new().underlined(),
        }
    }

    fn score(&self, score: f64) -> &Style {
        if score < 10.0 {
            &self.score_low
        } else if score < 40.0 {
            &self.score_mid
        } else {
            &self.score_high
        }
    }
}

pub fn print_comparison_summary(
    before: &Path,
    after: &Path,
    result: &ComparisonResult,
    written: &[std::path::PathBuf],
) {
    let s = Styles::new();
    let m = &result.metrics;

    println!();
    println!("  {}", s.title.apply_to("Image Comparison"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(16)));
    println!();

    println!(
        "  {:<14}{} ({})",
        s.label.apply_to("Before"),
        s.path.apply_to(before.display()),
        result.before_dimensions
    );
    println!(
        "  {:<14}{} ({})",
        s.label.apply_to("After"),
        s.path.apply_to(after.display()),
        result.after_dimensions
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Working size"),
        s.value.apply_to(&result.dimensions)
    );
    println!();

    println!(
        "  {:<14}{}  {}",
        s.header.apply_to("Score"),
        s.score(result.difference_score)
            .apply_to(format!("{:.2}", result.difference_score)),
        s.label.apply_to(format!("model v{}", result.score_version))
    );
    println!();

    println!("  {}", s.header.apply_to("Metrics"));
    println!(
        "    {:<14}{}",
        s.label.apply_to("Changed"),
        s.value.apply_to(format!(
            "{:.2}% ({} / {} px)",
            m.difference_percentage, m.changed_pixels, m.total_pixels
        ))
    );
    println!(
        "    {:<14}{}",
        s.label.apply_to("SSIM"),
        s.value.apply_to(format!("{:.4}", m.ssim))
    );
    println!(
        "    {:<14}{}",
        s.label.apply_to("MSE"),
        s.value.apply_to(format!("{:.6}", m.mse))
    );
    if let Some(ref p) = m.perceptual {
        println!(
            "    {:<14}{}",
            s.label.apply_to("Perceptual"),
            s.value.apply_to(format!(
                "{:.3} (colour {:.3}, edges {:.3}, hash {:.3})",
                p.overall, p.color_similarity, p.edge_similarity, p.phash_similarity
            ))
        );
    }
    println!();

    match result.analysis {
        Some(ref a) if a.has_differences => {
            println!("  {}", s.header.apply_to("Regions"));
            if let Some(bbox) = a.difference_bbox {
                println!(
                    "    {:<14}{}",
                    s.label.apply_to("Extent"),
                    s.value.apply_to(format!(
                        "{}x{} at ({}, {})",
                        bbox.width, bbox.height, bbox.x, bbox.y
                    ))
                );
            }
            for r in &a.regions {
                println!(
                    "    {}. {}",
                    s.label.apply_to(r.id + 1),
                    s.value.apply_to(format!(
                        "{} px, {}x{} at ({}, {})",
                        r.area, r.bbox.width, r.bbox.height, r.bbox.x, r.bbox.y
                    ))
                );
            }
            let t = &a.change_types;
            println!(
                "    {:<14}{}",
                s.label.apply_to("Changes"),
                s.value.apply_to(format!(
                    "{} colour, {} new, {} removed",
                    t.color_changes, t.new_objects, t.removed_objects
                ))
            );
        }
        Some(_) => {
            println!(
                "  {:<14}{}",
                s.header.apply_to("Regions"),
                s.disabled.apply_to("no differences")
            );
        }
        None => {
            println!(
                "  {:<14}{}",
                s.header.apply_to("Regions"),
                s.disabled.apply_to("disabled")
            );
        }
    }
    println!();

    if !written.is_empty() {
        println!("  {}", s.header.apply_to("Visualizations"));
        for path in written {
            println!("    {}", s.path.apply_to(path.display()));
        }
        println!();
    }

    println!(
        "  {}",
        s.label
            .apply_to(format!("Completed in {:.0} ms", result.processing_time_ms))
    );
}
