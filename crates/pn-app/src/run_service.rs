//! Run execution and caching service.

use std::path::Path;
use std::time::Instant;

use pn_invasion::{InvasionOutcome, InvasionSweep};
use pn_project::schema::Study;
use pn_results::{CurveRecord, InvasionPressures, RunManifest, RunStore};
use tracing::info;

use crate::error::AppResult;
use crate::progress::{RunProgressEvent, RunStage, SweepProgress};
use crate::project_service;
use crate::study_compile::{self, CompiledStudy};

/// Options for running a study.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub use_cache: bool,
    pub engine_version: String,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            use_cache: true,
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Request to execute a run.
pub struct RunRequest<'a> {
    pub study_path: &'a Path,
    pub options: RunOptions,
}

/// Wall-clock timing of a run.
#[derive(Debug, Clone, Default)]
pub struct RunTimingSummary {
    pub compile_time_s: f64,
    pub sweep_time_s: f64,
    pub save_time_s: f64,
    pub load_cache_time_s: f64,
    pub total_time_s: f64,
    pub steps: usize,
}

/// Response from a run execution.
#[derive(Debug, Clone)]
pub struct RunResponse {
    pub run_id: String,
    pub manifest: RunManifest,
    pub loaded_from_cache: bool,
    pub timing: RunTimingSummary,
}

type ProgressSink<'a, 'b> = &'a mut Option<&'b mut dyn FnMut(RunProgressEvent)>;

fn emit_progress(
    progress_cb: ProgressSink<'_, '_>,
    stage: RunStage,
    started: Instant,
    message: Option<String>,
    sweep: Option<SweepProgress>,
) {
    if let Some(cb) = progress_cb.as_deref_mut() {
        cb(RunProgressEvent {
            stage,
            elapsed_wall_s: started.elapsed().as_secs_f64(),
            message,
            sweep,
        });
    }
}

/// Execute or load a run.
pub fn ensure_run(request: &RunRequest) -> AppResult<RunResponse> {
    ensure_run_with_progress(request, None)
}

/// Execute or load a run and stream progress events.
pub fn ensure_run_with_progress(
    request: &RunRequest,
    mut progress_cb: Option<&mut dyn FnMut(RunProgressEvent)>,
) -> AppResult<RunResponse> {
    let started = Instant::now();
    let mut timing = RunTimingSummary::default();

    emit_progress(
        &mut progress_cb,
        RunStage::LoadingStudy,
        started,
        Some("Loading study".to_string()),
        None,
    );
    let study = project_service::load_study(request.study_path)?;
    pn_project::validate_study(&study)?;

    emit_progress(
        &mut progress_cb,
        RunStage::CheckingCache,
        started,
        Some("Checking run cache".to_string()),
        None,
    );
    let run_id = pn_results::compute_run_id(&study, &request.options.engine_version);
    let store = RunStore::for_study(request.study_path)?;

    if request.options.use_cache && store.has_run(&run_id) {
        emit_progress(
            &mut progress_cb,
            RunStage::LoadingCachedResult,
            started,
            Some("Loading cached run".to_string()),
            None,
        );

        let load_started = Instant::now();
        let manifest = store.load_manifest(&run_id)?;
        timing.load_cache_time_s = load_started.elapsed().as_secs_f64();
        timing.steps = manifest.step_count;
        timing.total_time_s = started.elapsed().as_secs_f64();
        info!(run_id = %run_id, "loaded cached run");

        emit_progress(
            &mut progress_cb,
            RunStage::Completed,
            started,
            Some("Loaded cached run".to_string()),
            None,
        );
        return Ok(RunResponse {
            run_id,
            manifest,
            loaded_from_cache: true,
            timing,
        });
    }

    let manifest = execute_run(
        &study,
        &store,
        &run_id,
        &request.options.engine_version,
        &mut progress_cb,
        started,
        &mut timing,
    )?;
    timing.total_time_s = started.elapsed().as_secs_f64();

    emit_progress(
        &mut progress_cb,
        RunStage::Completed,
        started,
        Some("Run completed".to_string()),
        None,
    );

    Ok(RunResponse {
        run_id,
        manifest,
        loaded_from_cache: false,
        timing,
    })
}

fn execute_run(
    study: &Study,
    store: &RunStore,
    run_id: &str,
    engine_version: &str,
    progress_cb: ProgressSink<'_, '_>,
    started: Instant,
    timing: &mut RunTimingSummary,
) -> AppResult<RunManifest> {
    emit_progress(
        progress_cb,
        RunStage::CompilingStudy,
        started,
        Some("Compiling study".to_string()),
        None,
    );
    let compile_started = Instant::now();
    let CompiledStudy {
        network,
        entry,
        volumes,
        config,
    } = study_compile::compile_study(study)?;
    timing.compile_time_s = compile_started.elapsed().as_secs_f64();

    let sweep_started = Instant::now();
    let mut sweep = InvasionSweep::new(&network, &entry, volumes, config);
    sweep.start()?;
    let step_count = sweep.sequence().map_or(0, |s| s.len());

    let mut step = 0usize;
    while let Some(point) = sweep.step()? {
        emit_progress(
            progress_cb,
            RunStage::Sweeping,
            started,
            None,
            Some(SweepProgress {
                step,
                step_count,
                pressure_pa: point.pressure,
                saturation: point.saturation,
                percolating: point.percolating,
            }),
        );
        step += 1;
    }
    let outcome = sweep.finish()?;
    timing.sweep_time_s = sweep_started.elapsed().as_secs_f64();
    timing.steps = step_count;

    emit_progress(
        progress_cb,
        RunStage::SavingResults,
        started,
        Some("Saving results".to_string()),
        None,
    );
    let save_started = Instant::now();
    let manifest = build_manifest(study, &outcome, run_id, engine_version);
    store.save_run(&manifest, &curve_records(&outcome), &invasion_pressures(&outcome))?;
    timing.save_time_s = save_started.elapsed().as_secs_f64();

    info!(
        run_id = %run_id,
        steps = step_count,
        percolates = manifest.percolates(),
        final_saturation = manifest.final_saturation,
        "run saved"
    );
    Ok(manifest)
}

fn build_manifest(
    study: &Study,
    outcome: &InvasionOutcome,
    run_id: &str,
    engine_version: &str,
) -> RunManifest {
    RunManifest {
        run_id: run_id.to_string(),
        study_name: study.name.clone(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        engine_version: engine_version.to_string(),
        mode: outcome.mode().to_string(),
        pore_count: outcome.record().pore_count(),
        throat_count: outcome.record().throat_count(),
        step_count: outcome.sequence().len(),
        // A non-percolating run is still a valid run with a full curve
        percolation_threshold_pa: outcome.percolation_threshold().ok(),
        percolation_step: outcome.percolation_step(),
        final_saturation: outcome.curve().final_saturation(),
        diagnostics: outcome.diagnostics().iter().map(|d| d.to_string()).collect(),
    }
}

fn curve_records(outcome: &InvasionOutcome) -> Vec<CurveRecord> {
    outcome
        .curve()
        .points()
        .iter()
        .enumerate()
        .map(|(step, p)| CurveRecord {
            step,
            pressure_pa: p.pressure,
            saturation: p.saturation,
            invaded_volume_m3: p.invaded_volume,
            percolating: p.percolating,
        })
        .collect()
}

fn invasion_pressures(outcome: &InvasionOutcome) -> InvasionPressures {
    let record = outcome.record();
    let finite = |v: &f64| v.is_finite().then_some(*v);
    InvasionPressures {
        pores_pa: record.pore_pressures().iter().map(finite).collect(),
        throats_pa: record.throat_pressures().iter().map(finite).collect(),
    }
}

/// List stored runs for a study, most recent first.
pub fn list_runs(study_path: &Path) -> AppResult<Vec<RunManifest>> {
    let store = RunStore::for_study(study_path)?;

    let mut runs = store.list_runs()?;
    runs.reverse();
    Ok(runs)
}

/// Load a stored run's manifest and curve.
pub fn load_run(study_path: &Path, run_id: &str) -> AppResult<(RunManifest, Vec<CurveRecord>)> {
    let store = RunStore::for_study(study_path)?;

    let manifest = store.load_manifest(run_id)?;
    let curve = store.load_curve(run_id)?;

    Ok((manifest, curve))
}

/// Load the per-pore and per-throat invasion pressures of a stored run.
pub fn load_invasion_pressures(study_path: &Path, run_id: &str) -> AppResult<InvasionPressures> {
    let store = RunStore::for_study(study_path)?;
    Ok(store.load_pore_pressures(run_id)?)
}

pub fn delete_run(study_path: &Path, run_id: &str) -> AppResult<()> {
    let store = RunStore::for_study(study_path)?;
    store.delete_run(run_id)?;
    Ok(())
}
