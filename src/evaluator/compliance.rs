//! Regulatory and IP screening for the EU target market.
//!
//! The category, keyword and trademark checks are rows of one term-rule
//! table evaluated by a single matching loop; certification requirements
//! come from a separate trigger table. All matching is case-insensitive
//! substring containment. Penalties are independent and cumulative and the
//! aggregate score floors at 0.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::ProductRecord;

/// Penalty applied when the declared category is restricted.
const CATEGORY_PENALTY: f64 = 50.0;
/// Penalty applied when restricted keywords appear in the listing text.
const KEYWORD_PENALTY: f64 = 30.0;
/// Penalty applied when a known brand name appears in the listing text.
const TRADEMARK_PENALTY: f64 = 40.0;
/// Penalty applied when any certification is required.
const CERTIFICATION_PENALTY: f64 = 20.0;
/// Minimum aggregate score to count as compliant.
const COMPLIANT_THRESHOLD: f64 = 70.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskTier {
    fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            RiskTier::Low
        } else if score >= 70.0 {
            RiskTier::Medium
        } else if score >= 50.0 {
            RiskTier::High
        } else {
            RiskTier::Critical
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskTier::Low => write!(f, "low"),
            RiskTier::Medium => write!(f, "medium"),
            RiskTier::High => write!(f, "high"),
            RiskTier::Critical => write!(f, "critical"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CertComplexity {
    Low,
    High,
}

/// Which sub-check a term rule belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    Category,
    Keyword,
    Trademark,
}

/// Which text field a term rule matches against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchField {
    Category,
    NameDescription,
}

/// One row of the screening rule table: a term list matched against one
/// field, with a fixed penalty and an issue template. `{}` in the template
/// is replaced with the raw category (category rules) or the joined match
/// list (keyword/trademark rules).
#[derive(Debug, Clone)]
pub struct TermRule {
    pub kind: RuleKind,
    pub field: MatchField,
    pub terms: Vec<String>,
    pub penalty: f64,
    pub issue_template: String,
}

/// Maps trigger terms (matched against category + description) to the
/// certifications they require.
#[derive(Debug, Clone)]
pub struct CertTrigger {
    pub terms: Vec<String>,
    pub certifications: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ComplianceRules {
    pub term_rules: Vec<TermRule>,
    pub cert_triggers: Vec<CertTrigger>,
    pub certification_penalty: f64,
    pub compliant_threshold: f64,
}

fn terms(list: &[&str]) -> Vec<String> {
    list.iter().map(|t| t.to_string()).collect()
}

impl Default for ComplianceRules {
    fn default() -> Self {
        Self {
            term_rules: vec![
                TermRule {
                    kind: RuleKind::Category,
                    field: MatchField::Category,
                    terms: terms(&[
                        "electronics",
                        "cosmetics",
                        "toys",
                        "medical",
                        "pharmaceutical",
                        "food",
                        "supplements",
                        "weapons",
                        "automotive-parts",
                    ]),
                    penalty: CATEGORY_PENALTY,
                    issue_template: "Category \"{}\" is restricted in EU".to_string(),
                },
                TermRule {
                    kind: RuleKind::Keyword,
                    field: MatchField::NameDescription,
                    terms: terms(&[
                        // Electronics
                        "battery", "charger", "usb", "bluetooth", "wifi", "electronic",
                        "led", "lcd", "screen", "speaker", "headphone", "cable",
                        // Cosmetics
                        "cream", "serum", "lotion", "makeup", "skincare", "beauty",
                        "cosmetic", "foundation", "lipstick", "moisturizer",
                        // Toys and kids
                        "toy", "kids", "children", "baby", "infant", "toddler",
                        "plush", "doll", "game", "puzzle",
                        // Medical and health
                        "medical", "health", "medicine", "supplement", "vitamin",
                        "treatment", "therapy", "cure", "diagnosis",
                        // Bladed and pressurized kitchenware
                        "knife", "blade", "cutter", "slicer", "pressure cooker",
                        // Prohibited outright
                        "weapon", "gun", "explosive",
                    ]),
                    penalty: KEYWORD_PENALTY,
                    issue_template: "Contains restricted keywords: {}".to_string(),
                },
                TermRule {
                    kind: RuleKind::Trademark,
                    field: MatchField::NameDescription,
                    terms: terms(&[
                        "apple", "samsung", "nike", "adidas", "sony", "microsoft",
                        "google", "amazon", "facebook", "tesla", "bmw", "mercedes",
                        "louis vuitton", "gucci", "prada", "rolex", "omega",
                    ]),
                    penalty: TRADEMARK_PENALTY,
                    issue_template: "Potential trademark issues: {}".to_string(),
                },
            ],
            cert_triggers: vec![
                CertTrigger {
                    terms: terms(&["electronic", "electrical"]),
                    certifications: terms(&["CE", "RoHS"]),
                },
                CertTrigger {
                    terms: terms(&["toy", "children"]),
                    certifications: terms(&["CE", "EN71"]),
                },
                CertTrigger {
                    terms: terms(&["medical", "health"]),
                    certifications: terms(&["CE", "FDA"]),
                },
            ],
            certification_penalty: CERTIFICATION_PENALTY,
            compliant_threshold: COMPLIANT_THRESHOLD,
        }
    }
}

/// Result of one term-rule sub-check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    pub flagged: bool,
    pub matches: Vec<String>,
}

impl CheckResult {
    fn clear() -> Self {
        Self {
            flagged: false,
            matches: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CertificationResult {
    pub required: Vec<String>,
    pub complexity: CertComplexity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceVerdict {
    pub compliant: bool,
    pub score: f64,
    pub risk: RiskTier,
    pub issues: Vec<String>,
    pub recommendations: Vec<String>,
    pub category: CheckResult,
    pub keywords: CheckResult,
    pub trademarks: CheckResult,
    pub certifications: CertificationResult,
}

pub struct ComplianceScreener {
    rules: ComplianceRules,
}

impl ComplianceScreener {
    pub fn new(rules: ComplianceRules) -> Self {
        Self { rules }
    }

    /// Screens one product record. Total: empty or malformed records
    /// produce a clean verdict, never an error.
    pub fn screen(&self, record: &ProductRecord) -> ComplianceVerdict {
        let category_text = record
            .category
            .as_deref()
            .unwrap_or_default()
            .to_lowercase();
        let listing_text =
            format!("{} {}", record.name, record.description).to_lowercase();
        let cert_text = format!(
            "{} {}",
            category_text,
            record.description.to_lowercase()
        );

        let mut score = 100.0;
        let mut issues = Vec::new();
        let mut category = CheckResult::clear();
        let mut keywords = CheckResult::clear();
        let mut trademarks = CheckResult::clear();

        for rule in &self.rules.term_rules {
            let haystack = match rule.field {
                MatchField::Category => category_text.as_str(),
                MatchField::NameDescription => listing_text.as_str(),
            };
            let matches: Vec<String> = rule
                .terms
                .iter()
                .filter(|term| haystack.contains(term.as_str()))
                .cloned()
                .collect();
            if matches.is_empty() {
                continue;
            }

            score -= rule.penalty;
            let payload = match rule.kind {
                RuleKind::Category => record.category.clone().unwrap_or_default(),
                _ => matches.join(", "),
            };
            issues.push(rule.issue_template.replace("{}", &payload));

            let result = CheckResult {
                flagged: true,
                matches,
            };
            match rule.kind {
                RuleKind::Category => category = result,
                RuleKind::Keyword => keywords = result,
                RuleKind::Trademark => trademarks = result,
            }
        }

        let certifications = self.required_certifications(&cert_text);
        if !certifications.required.is_empty() {
            score -= self.rules.certification_penalty;
            issues.push(format!(
                "Requires certifications: {}",
                certifications.required.join(", ")
            ));
        }

        let score = score.max(0.0);
        let recommendations =
            derive_recommendations(&category, &keywords, &trademarks, &certifications);

        debug!(score, issue_count = issues.len(), "compliance screened");

        ComplianceVerdict {
            compliant: score >= self.rules.compliant_threshold,
            score,
            risk: RiskTier::from_score(score),
            issues,
            recommendations,
            category,
            keywords,
            trademarks,
            certifications,
        }
    }

    fn required_certifications(&self, cert_text: &str) -> CertificationResult {
        let mut required: Vec<String> = Vec::new();
        for trigger in &self.rules.cert_triggers {
            if trigger
                .terms
                .iter()
                .any(|term| cert_text.contains(term.as_str()))
            {
                for cert in &trigger.certifications {
                    if !required.contains(cert) {
                        required.push(cert.clone());
                    }
                }
            }
        }

        let complexity = if required.is_empty() {
            CertComplexity::Low
        } else {
            CertComplexity::High
        };
        CertificationResult {
            required,
            complexity,
        }
    }
}

impl Default for ComplianceScreener {
    fn default() -> Self {
        Self::new(ComplianceRules::default())
    }
}

/// One fixed recommendation per failing sub-check, keyed off the sub-check
/// itself rather than parsed back out of the issue strings.
fn derive_recommendations(
    category: &CheckResult,
    keywords: &CheckResult,
    trademarks: &CheckResult,
    certifications: &CertificationResult,
) -> Vec<String> {
    let mut recommendations = Vec::new();
    if category.flagged {
        recommendations.push("Consider switching to a non-restricted category".to_string());
    }
    if trademarks.flagged {
        recommendations.push("Remove brand references or get proper licensing".to_string());
    }
    if !certifications.required.is_empty() {
        recommendations.push("Verify supplier has required certifications".to_string());
    }
    if keywords.flagged {
        recommendations
            .push("Modify product description to avoid restricted terms".to_string());
    }
    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, description: &str, category: &str) -> ProductRecord {
        let mut record = ProductRecord::named(name);
        record.description = description.to_string();
        record.category = Some(category.to_string());
        record
    }

    #[test]
    fn branded_electronics_fail_every_check() {
        let verdict = ComplianceScreener::default().screen(&record(
            "Apple iPhone Charger",
            "USB charging cable with battery indicator",
            "Electronics",
        ));

        assert!(!verdict.compliant);
        assert_eq!(verdict.score, 0.0);
        assert_eq!(verdict.risk, RiskTier::Critical);
        assert!(verdict.category.flagged);
        for expected in ["usb", "battery", "charger", "cable"] {
            assert!(
                verdict.keywords.matches.iter().any(|m| m == expected),
                "missing keyword flag {expected}"
            );
        }
        assert_eq!(verdict.trademarks.matches, vec!["apple"]);
        assert_eq!(verdict.certifications.required, vec!["CE", "RoHS"]);
        assert_eq!(verdict.certifications.complexity, CertComplexity::High);
    }

    #[test]
    fn unremarkable_product_is_fully_compliant() {
        let verdict = ComplianceScreener::default().screen(&record(
            "Yoga Mat",
            "Non-slip exercise mat for yoga practice",
            "Fitness",
        ));

        assert!(verdict.compliant);
        assert_eq!(verdict.score, 100.0);
        assert_eq!(verdict.risk, RiskTier::Low);
        assert!(verdict.issues.is_empty());
        assert!(verdict.recommendations.is_empty());
        assert_eq!(verdict.certifications.complexity, CertComplexity::Low);
    }

    #[test]
    fn restricted_category_alone_scores_fifty() {
        let verdict = ComplianceScreener::default().screen(&record(
            "Gift Box",
            "Empty decorative box",
            "Cosmetics",
        ));

        assert!(!verdict.compliant);
        assert_eq!(verdict.score, 50.0);
        assert_eq!(verdict.risk, RiskTier::High);
        assert!(verdict.category.flagged);
        assert!(!verdict.keywords.flagged);
        assert_eq!(
            verdict.recommendations,
            vec!["Consider switching to a non-restricted category"]
        );
    }

    #[test]
    fn certification_triggers_are_deduplicated() {
        let verdict = ComplianceScreener::default().screen(&record(
            "Learning Tablet",
            "Electronic learning toy for children",
            "",
        ));

        // electronic -> CE+RoHS, toy/children -> CE+EN71; CE listed once.
        assert_eq!(
            verdict.certifications.required,
            vec!["CE", "RoHS", "EN71"]
        );
        assert_eq!(verdict.certifications.complexity, CertComplexity::High);
    }

    #[test]
    fn keyword_check_returns_the_full_matched_set() {
        let verdict = ComplianceScreener::default().screen(&record(
            "Plush Doll",
            "Soft plush toy doll for kids",
            "Gifts",
        ));

        assert!(verdict.keywords.flagged);
        for expected in ["toy", "kids", "plush", "doll"] {
            assert!(verdict.keywords.matches.iter().any(|m| m == expected));
        }
        // keywords -30, certification (toy) -20
        assert_eq!(verdict.score, 50.0);
    }

    #[test]
    fn empty_record_screens_clean() {
        let verdict = ComplianceScreener::default().screen(&ProductRecord::named(""));
        assert!(verdict.compliant);
        assert_eq!(verdict.score, 100.0);
        assert!(verdict.issues.is_empty());
    }
}
