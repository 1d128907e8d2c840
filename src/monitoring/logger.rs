use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::evaluator::orchestrator::EvaluationResult;
use crate::evaluator::scorer::Grade;

/// One line of the evaluation report file. The timestamp lives here, not
/// in `EvaluationResult`, so engine output stays deterministic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationLogEntry {
    pub timestamp: DateTime<Utc>,
    pub product: String,
    pub final_score: f64,
    pub grade: Grade,
    pub compliant: bool,
    pub size_valid: bool,
    pub issue_count: usize,
}

impl EvaluationLogEntry {
    pub fn from_result(result: &EvaluationResult) -> Self {
        Self {
            timestamp: Utc::now(),
            product: result.name.clone(),
            final_score: result.opportunity.final_score,
            grade: result.opportunity.grade,
            compliant: result.compliance.compliant,
            size_valid: result.fitment.valid,
            issue_count: result.issues.len(),
        }
    }
}

/// Appends one JSON line per evaluation to a report file.
pub struct EvaluationLogger {
    log_path: PathBuf,
}

impl EvaluationLogger {
    pub fn new(log_dir: Option<&str>) -> Result<Self> {
        let log_dir = log_dir.unwrap_or("./logs");
        std::fs::create_dir_all(log_dir)?;

        let log_path = PathBuf::from(log_dir).join("evaluations.jsonl");

        Ok(Self { log_path })
    }

    pub async fn log_evaluation(&self, entry: EvaluationLogEntry) -> Result<()> {
        info!(product = %entry.product, score = entry.final_score, "logging evaluation");

        let mut line = serde_json::to_string(&entry)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)?;
        file.write_all(line.as_bytes())?;

        Ok(())
    }

    pub async fn history(&self) -> Result<Vec<EvaluationLogEntry>> {
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        let content = std::fs::read_to_string(&self.log_path)?;
        let mut entries = Vec::new();
        for line in content.lines() {
            if line.trim().is_empty() {
                continue;
            }
            entries.push(serde_json::from_str(line)?);
        }

        Ok(entries)
    }
}
