//! Run storage API.
//!
//! Layout: `<root>/<run_id>/{manifest.json, curve.jsonl, pores.json}`.

use crate::types::{CurveRecord, InvasionPressures, RunManifest};
use crate::{ResultsError, ResultsResult};
use std::fs;
use std::path::{Path, PathBuf};

const MANIFEST_FILE: &str = "manifest.json";
const CURVE_FILE: &str = "curve.jsonl";
const PORES_FILE: &str = "pores.json";

#[derive(Debug, Clone)]
pub struct RunStore {
    root_dir: PathBuf,
}

impl RunStore {
    pub fn new(root_dir: PathBuf) -> ResultsResult<Self> {
        if !root_dir.exists() {
            fs::create_dir_all(&root_dir)?;
        }
        Ok(Self { root_dir })
    }

    /// Store next to a study file, under `.poreflow/runs`.
    pub fn for_study(study_path: &Path) -> ResultsResult<Self> {
        let study_dir = study_path
            .parent()
            .ok_or_else(|| ResultsError::InvalidPath {
                message: "study path has no parent directory".to_string(),
            })?;
        let runs_dir = study_dir.join(".poreflow").join("runs");
        Self::new(runs_dir)
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    fn run_dir(&self, run_id: &str) -> PathBuf {
        self.root_dir.join(run_id)
    }

    pub fn has_run(&self, run_id: &str) -> bool {
        self.run_dir(run_id).join(MANIFEST_FILE).exists()
    }

    pub fn save_run(
        &self,
        manifest: &RunManifest,
        curve: &[CurveRecord],
        pressures: &InvasionPressures,
    ) -> ResultsResult<()> {
        let run_dir = self.run_dir(&manifest.run_id);
        fs::create_dir_all(&run_dir)?;

        let mut curve_content = String::new();
        for record in curve {
            let line = serde_json::to_string(record)?;
            curve_content.push_str(&line);
            curve_content.push('\n');
        }
        fs::write(run_dir.join(CURVE_FILE), curve_content)?;

        fs::write(run_dir.join(PORES_FILE), serde_json::to_string(pressures)?)?;

        // Manifest last: its presence marks a complete run
        let manifest_json = serde_json::to_string_pretty(manifest)?;
        fs::write(run_dir.join(MANIFEST_FILE), manifest_json)?;

        Ok(())
    }

    fn existing_file(&self, run_id: &str, file: &str) -> ResultsResult<PathBuf> {
        let path = self.run_dir(run_id).join(file);
        if !path.exists() {
            return Err(ResultsError::RunNotFound {
                run_id: run_id.to_string(),
            });
        }
        Ok(path)
    }

    pub fn load_manifest(&self, run_id: &str) -> ResultsResult<RunManifest> {
        let path = self.existing_file(run_id, MANIFEST_FILE)?;
        let content = fs::read_to_string(path)?;
        let manifest = serde_json::from_str(&content)?;
        Ok(manifest)
    }

    pub fn load_curve(&self, run_id: &str) -> ResultsResult<Vec<CurveRecord>> {
        let path = self.existing_file(run_id, CURVE_FILE)?;
        let content = fs::read_to_string(path)?;
        let mut records = Vec::new();
        for line in content.lines() {
            if !line.trim().is_empty() {
                let record: CurveRecord = serde_json::from_str(line)?;
                records.push(record);
            }
        }
        Ok(records)
    }

    pub fn load_pore_pressures(&self, run_id: &str) -> ResultsResult<InvasionPressures> {
        let path = self.existing_file(run_id, PORES_FILE)?;
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// All complete runs, oldest first.
    pub fn list_runs(&self) -> ResultsResult<Vec<RunManifest>> {
        let mut runs = Vec::new();

        if !self.root_dir.exists() {
            return Ok(runs);
        }

        for entry in fs::read_dir(&self.root_dir)? {
            let entry = entry?;
            if entry.path().is_dir() {
                let run_id = entry.file_name().to_string_lossy().to_string();
                if let Ok(manifest) = self.load_manifest(&run_id) {
                    runs.push(manifest);
                }
            }
        }

        runs.sort_by(|a, b| {
            a.timestamp
                .cmp(&b.timestamp)
                .then_with(|| a.run_id.cmp(&b.run_id))
        });
        Ok(runs)
    }

    pub fn delete_run(&self, run_id: &str) -> ResultsResult<()> {
        let run_dir = self.run_dir(run_id);
        if run_dir.exists() {
            fs::remove_dir_all(run_dir)?;
        }
        Ok(())
    }
}
