//! Shared application service layer for poreflow.
//!
//! One interface for front ends: study loading and validation, compilation
//! into engine inputs, cached run execution, and queries over stored runs.

pub mod error;
pub mod progress;
pub mod project_service;
pub mod query;
pub mod run_service;
pub mod study_compile;

pub use error::{AppError, AppResult};
pub use progress::{RunProgressEvent, RunStage, SweepProgress};
pub use project_service::{StudySummary, load_study, save_study, summarize, validate_study};
pub use query::{RunSummary, curve_to_csv, get_run_summary, interior_points};
pub use run_service::{
    RunOptions, RunRequest, RunResponse, RunTimingSummary, ensure_run, ensure_run_with_progress,
    list_runs, load_run,
};
pub use study_compile::{CompiledStudy, compile_study};

pub use pn_results::{CurveRecord, RunManifest};
