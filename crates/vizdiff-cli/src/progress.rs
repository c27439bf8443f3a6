use indicatif::{ProgressBar, ProgressStyle};
use vizdiff_core::pipeline::{ComparisonStage, ProgressReporter};

/// Number of stages a comparison reports, `Done` included.
const STAGE_COUNT: u64 = 6;

/// Drives an indicatif bar from comparison stage events.
pub struct StageProgress {
    bar: ProgressBar,
}

impl StageProgress {
    pub fn new(hidden: bool) -> anyhow::Result<Self> {
        let bar = if hidden {
            ProgressBar::hidden()
        } else {
            ProgressBar::new(STAGE_COUNT)
        };
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner} {msg:28} [{bar:30}] {pos}/{len}")?
                .progress_chars("=> "),
        );
        Ok(Self { bar })
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressReporter for StageProgress {
    fn begin_stage(&self, stage: ComparisonStage) {
        self.bar.set_message(stage.to_string());
        self.bar.tick();
    }

    fn finish_stage(&self) {
        self.bar.inc(1);
    }
}
