use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::EngineConfig;
use crate::model::ProductRecord;

use super::compliance::{ComplianceScreener, ComplianceVerdict};
use super::dimensions;
use super::fitment::{FitmentValidator, FitmentVerdict};
use super::scorer::{OpportunityScorer, OpportunitySignals, OpportunityVerdict};

/// Unified verdict for one product record. Deterministic: the same record
/// under the same configuration always serializes to the same bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub id: Option<String>,
    pub name: String,
    pub category: Option<String>,
    pub fitment: FitmentVerdict,
    pub compliance: ComplianceVerdict,
    pub opportunity: OpportunityVerdict,
    pub issues: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Runs the three evaluators over a product record and reconciles their
/// signals: fitment feeds the logistics penalty, compliance sub-results
/// feed the compliance risk. Adds no scoring logic of its own.
pub struct ProductEvaluator {
    fitment: FitmentValidator,
    screener: ComplianceScreener,
    scorer: OpportunityScorer,
}

impl ProductEvaluator {
    pub fn new(config: EngineConfig) -> Self {
        let EngineConfig {
            envelope,
            fitment_scoring,
            weights,
            compliance,
        } = config;
        Self {
            fitment: FitmentValidator::new(envelope, fitment_scoring),
            screener: ComplianceScreener::new(compliance),
            scorer: OpportunityScorer::new(weights),
        }
    }

    /// Evaluates one record. Total: any record, however sparse or
    /// malformed, produces a well-formed result.
    pub fn evaluate(&self, record: &ProductRecord) -> EvaluationResult {
        debug!(name = %record.name, "evaluating product");

        let dims = dimensions::parse(record.dimensions.as_ref(), record.weight.as_ref());
        let fitment = self.fitment.validate(dims);
        let compliance = self.screener.screen(record);

        let signals = self.reconcile_signals(record, &fitment, &compliance, dims);
        let opportunity = self.scorer.score(&signals);

        let mut issues = Vec::new();
        issues.extend(fitment.violations.iter().cloned());
        if !fitment.valid && fitment.violations.is_empty() {
            issues.push(fitment.reason.clone());
        }
        issues.extend(compliance.issues.iter().cloned());

        let mut recommendations = Vec::new();
        if !fitment.valid {
            recommendations
                .push("Source a smaller or lighter variant that fits the envelope".to_string());
        }
        recommendations.extend(compliance.recommendations.iter().cloned());

        EvaluationResult {
            id: record.id.clone(),
            name: record.name.clone(),
            category: record.category.clone(),
            fitment,
            compliance,
            opportunity,
            issues,
            recommendations,
        }
    }

    /// Evaluates a batch in input order, one result per record. Records are
    /// independent; no verdict depends on any other record in the batch.
    pub fn evaluate_batch(&self, records: &[ProductRecord]) -> Vec<EvaluationResult> {
        records.iter().map(|record| self.evaluate(record)).collect()
    }

    fn reconcile_signals(
        &self,
        record: &ProductRecord,
        fitment: &FitmentVerdict,
        compliance: &ComplianceVerdict,
        dims: Option<dimensions::CanonicalDimensions>,
    ) -> OpportunitySignals {
        // Weight reaches the logistics penalty even when the dimension
        // triple failed to parse.
        let weight_kg = match dims {
            Some(d) => d.weight,
            None => dimensions::parse_weight(record.weight.as_ref()),
        };

        let mut logistics = record.logistics.clone().unwrap_or_default();
        logistics.size_valid = fitment.valid;
        logistics.weight_kg = weight_kg;

        // The screener's sub-results are the only source for the
        // compliance-risk inputs; whatever the record claimed is replaced.
        let mut compliance_signals = record.compliance.clone().unwrap_or_default();
        compliance_signals.eu_compliant = compliance.compliant;
        compliance_signals.trademark_risk = compliance.trademarks.flagged;
        compliance_signals.category_restricted = compliance.category.flagged;
        compliance_signals.certification_required =
            !compliance.certifications.required.is_empty();
        compliance_signals.branding_issues = compliance.keywords.flagged;

        OpportunitySignals {
            trends: record.trends.clone().unwrap_or_default(),
            economics: record.economics.clone().unwrap_or_default(),
            demand: record.demand.clone().unwrap_or_default(),
            competition: record.competition.clone().unwrap_or_default(),
            logistics,
            compliance: compliance_signals,
        }
    }
}

impl Default for ProductEvaluator {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
