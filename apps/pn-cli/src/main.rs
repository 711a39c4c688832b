use clap::{Parser, Subcommand};
use pn_app::{
    AppResult, RunOptions, RunProgressEvent, RunRequest, RunStage, project_service, query,
    run_service,
};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "poreflow")]
#[command(about = "poreflow - invasion percolation on pore networks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate study file syntax and structure
    Validate {
        /// Path to the study file (YAML or JSON)
        study_path: PathBuf,
    },
    /// Describe a study
    Info {
        /// Path to the study file
        study_path: PathBuf,
    },
    /// Run the invasion sweep of a study
    Run {
        /// Path to the study file
        study_path: PathBuf,
        /// Skip cache and force re-run
        #[arg(long)]
        no_cache: bool,
    },
    /// List cached runs for a study
    Runs {
        /// Path to the study file
        study_path: PathBuf,
    },
    /// Show details of a cached run
    ShowRun {
        /// Path to the study file
        study_path: PathBuf,
        /// Run ID to display
        run_id: String,
        /// Also report the saturation at this pressure (Pa)
        #[arg(long)]
        at: Option<f64>,
    },
    /// Export the intrusion curve of a run as CSV
    ExportCurve {
        /// Path to the study file
        study_path: PathBuf,
        /// Run ID
        run_id: String,
        /// Output CSV file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Only points with 0 < saturation < 1
        #[arg(long)]
        interior: bool,
    },
    /// Delete a cached run
    DeleteRun {
        /// Path to the study file
        study_path: PathBuf,
        /// Run ID to delete
        run_id: String,
    },
}

fn main() -> AppResult<()> {
    // Warnings by default; RUST_LOG overrides. Logs go to stderr so CSV on stdout stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { study_path } => cmd_validate(&study_path),
        Commands::Info { study_path } => cmd_info(&study_path),
        Commands::Run {
            study_path,
            no_cache,
        } => cmd_run(&study_path, !no_cache),
        Commands::Runs { study_path } => cmd_runs(&study_path),
        Commands::ShowRun {
            study_path,
            run_id,
            at,
        } => cmd_show_run(&study_path, &run_id, at),
        Commands::ExportCurve {
            study_path,
            run_id,
            output,
            interior,
        } => cmd_export_curve(&study_path, &run_id, output.as_deref(), interior),
        Commands::DeleteRun { study_path, run_id } => cmd_delete_run(&study_path, &run_id),
    }
}

fn cmd_validate(study_path: &Path) -> AppResult<()> {
    println!("Validating study: {}", study_path.display());
    let study = project_service::load_study(study_path)?;
    project_service::validate_study(&study)?;
    println!("✓ Study is valid");
    Ok(())
}

fn cmd_info(study_path: &Path) -> AppResult<()> {
    let study = project_service::load_study(study_path)?;
    let summary = project_service::summarize(&study);

    println!("Study: {}", summary.name);
    println!("  Network:  {}", summary.network);
    println!("  Pores:    {}", summary.pore_count);
    println!("  Throats:  {}", summary.throat_count);
    println!("  Mode:     {}", summary.mode);
    println!("  Inlets:   {}", summary.inlets);
    println!("  Outlets:  {}", summary.outlets);
    println!("  Steps:    {}", summary.steps);
    println!(
        "  Volumes:  {}",
        if summary.has_volumes { "explicit" } else { "default" }
    );
    Ok(())
}

fn cmd_run(study_path: &Path, use_cache: bool) -> AppResult<()> {
    println!("Running invasion sweep: {}", study_path.display());

    let request = RunRequest {
        study_path,
        options: RunOptions {
            use_cache,
            ..RunOptions::default()
        },
    };

    let mut last_emit = Instant::now();
    let mut last_stage = None;
    let response = run_service::ensure_run_with_progress(
        &request,
        Some(&mut |event| {
            let emit_now =
                last_stage != Some(event.stage) || last_emit.elapsed().as_millis() >= 100;
            if emit_now {
                render_cli_progress(&event);
                last_stage = Some(event.stage);
                last_emit = Instant::now();
            }
        }),
    )?;
    clear_progress_line();

    if response.loaded_from_cache {
        println!("✓ Loaded from cache: {}", response.run_id);
    } else {
        println!("✓ Sweep completed: {}", response.run_id);
    }

    print_timing_summary(&response.timing);
    print_manifest(&response.manifest);
    Ok(())
}

fn clear_progress_line() {
    print!("\r{}\r", " ".repeat(120));
    let _ = io::stdout().flush();
}

fn render_cli_progress(event: &RunProgressEvent) {
    match (&event.stage, &event.sweep) {
        (RunStage::Sweeping, Some(s)) => {
            let width = 28usize;
            let fraction = s.fraction_complete();
            let filled = ((fraction * width as f64).round() as usize).min(width);
            let bar = format!(
                "{}{}",
                "#".repeat(filled),
                "-".repeat(width.saturating_sub(filled))
            );
            print!(
                "\r[{}] {:>6.2}%  step={}/{}  p={:.4e} Pa  s={:.4}{}  elapsed={:.1}s",
                bar,
                fraction * 100.0,
                s.step + 1,
                s.step_count,
                s.pressure_pa,
                s.saturation,
                if s.percolating { "  percolating" } else { "" },
                event.elapsed_wall_s
            );
        }
        _ => {
            let spinner = ['|', '/', '-', '\\'];
            let spin_idx = ((event.elapsed_wall_s * 10.0) as usize) % spinner.len();
            let mut line = format!(
                "\r{} {}  elapsed={:.2}s",
                spinner[spin_idx],
                event.stage.label(),
                event.elapsed_wall_s
            );
            if let Some(msg) = &event.message {
                line.push_str(&format!("  {}", msg));
            }
            print!("{}", line);
        }
    }
    let _ = io::stdout().flush();
}

fn print_timing_summary(timing: &pn_app::RunTimingSummary) {
    let total = timing.total_time_s.max(1.0e-12);
    let compile_pct = 100.0 * timing.compile_time_s / total;
    let sweep_pct = 100.0 * timing.sweep_time_s / total;
    let save_pct = 100.0 * timing.save_time_s / total;

    println!("\nTiming summary:");
    println!(
        "  Compile: {:.3}s ({:.1}%)",
        timing.compile_time_s, compile_pct
    );
    println!("  Sweep:   {:.3}s ({:.1}%)", timing.sweep_time_s, sweep_pct);
    println!("  Save:    {:.3}s ({:.1}%)", timing.save_time_s, save_pct);
    if timing.load_cache_time_s > 0.0 {
        println!("  Cache load: {:.3}s", timing.load_cache_time_s);
    }
    println!("  Total:   {:.3}s", timing.total_time_s);
    println!("  Pressure steps: {}", timing.steps);
}

fn print_manifest(manifest: &pn_app::RunManifest) {
    println!("\nResult:");
    println!("  Mode: {}", manifest.mode);
    match manifest.percolation_threshold_pa {
        Some(p) => println!(
            "  Percolation threshold: {} Pa (step {})",
            p,
            manifest.percolation_step.unwrap_or_default()
        ),
        None => println!("  No percolation within the tested pressure range"),
    }
    println!("  Final saturation: {:.4}", manifest.final_saturation);
    for diagnostic in &manifest.diagnostics {
        println!("  warning: {}", diagnostic);
    }
}

fn cmd_runs(study_path: &Path) -> AppResult<()> {
    let runs = run_service::list_runs(study_path)?;

    if runs.is_empty() {
        println!("No cached runs found for: {}", study_path.display());
    } else {
        println!("Cached runs for '{}':", study_path.display());
        for manifest in runs {
            let threshold = manifest
                .percolation_threshold_pa
                .map_or_else(|| "none".to_string(), |p| format!("{p} Pa"));
            println!(
                "  {} ({})  threshold={}",
                manifest.run_id, manifest.timestamp, threshold
            );
        }
    }
    Ok(())
}

fn cmd_show_run(study_path: &Path, run_id: &str, at: Option<f64>) -> AppResult<()> {
    println!("Loading run: {}", run_id);

    let (manifest, curve) = run_service::load_run(study_path, run_id)?;
    let summary = query::get_run_summary(&manifest, &curve)?;

    println!("\nRun Summary:");
    println!("  Study: {}", manifest.study_name);
    println!("  Created: {}", manifest.timestamp);
    println!("  Engine: {}", manifest.engine_version);
    println!(
        "  Network: {} pores, {} throats",
        manifest.pore_count, manifest.throat_count
    );
    println!("  Curve points: {}", summary.point_count);
    println!(
        "  Pressure range: {} - {} Pa",
        summary.pressure_range.0, summary.pressure_range.1
    );
    println!("  Interior points: {}", summary.interior_count);
    println!(
        "  Saturation: {:.4} -> {:.4}",
        summary.initial_saturation, summary.final_saturation
    );
    if let Some(p) = at {
        println!(
            "  Saturation at {} Pa: {:.4}",
            p,
            query::saturation_at(&curve, p)
        );
    }
    print_manifest(&manifest);
    Ok(())
}

fn cmd_export_curve(
    study_path: &Path,
    run_id: &str,
    output: Option<&Path>,
    interior: bool,
) -> AppResult<()> {
    let (_manifest, curve) = run_service::load_run(study_path, run_id)?;
    let csv = query::curve_to_csv(&curve, interior);

    if let Some(path) = output {
        std::fs::write(path, &csv)?;
        println!(
            "✓ Exported {} curve points to {}",
            csv.lines().count().saturating_sub(1),
            path.display()
        );
    } else {
        print!("{}", csv);
    }
    Ok(())
}

fn cmd_delete_run(study_path: &Path, run_id: &str) -> AppResult<()> {
    run_service::delete_run(study_path, run_id)?;
    println!("✓ Deleted run {}", run_id);
    Ok(())
}
