//! Progress events streamed to front ends while a run executes.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    LoadingStudy,
    CheckingCache,
    LoadingCachedResult,
    CompilingStudy,
    Sweeping,
    SavingResults,
    Completed,
}

impl RunStage {
    pub fn label(&self) -> &'static str {
        match self {
            RunStage::LoadingStudy => "loading study",
            RunStage::CheckingCache => "checking cache",
            RunStage::LoadingCachedResult => "loading cached result",
            RunStage::CompilingStudy => "compiling study",
            RunStage::Sweeping => "sweeping",
            RunStage::SavingResults => "saving results",
            RunStage::Completed => "completed",
        }
    }
}

/// State of the sweep after one pressure step.
#[derive(Debug, Clone, Default)]
pub struct SweepProgress {
    pub step: usize,
    pub step_count: usize,
    pub pressure_pa: f64,
    pub saturation: f64,
    pub percolating: bool,
}

impl SweepProgress {
    pub fn fraction_complete(&self) -> f64 {
        if self.step_count == 0 {
            return 0.0;
        }
        (self.step + 1) as f64 / self.step_count as f64
    }
}

#[derive(Debug, Clone)]
pub struct RunProgressEvent {
    pub stage: RunStage,
    pub elapsed_wall_s: f64,
    pub message: Option<String>,
    pub sweep: Option<SweepProgress>,
}
