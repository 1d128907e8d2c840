use std::env;
use std::str::FromStr;

use tracing::{info, warn};

use crate::error::{Result, ScoutError};
use crate::evaluator::compliance::ComplianceRules;
use crate::evaluator::fitment::{Envelope, FitmentScoring};
use crate::evaluator::scorer::ScoreWeights;

/// Named bundle of envelope, fitment scoring mode and score weights.
///
/// `Standard` is the shoe-box envelope with proportional fitment scoring
/// and the six-signal weight vector. `CompactBox` is the legacy profile:
/// the looser cubic envelope, flat 25-point fitment penalties and the
/// four-signal weight emphasis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineProfile {
    Standard,
    CompactBox,
}

impl FromStr for EngineProfile {
    type Err = ScoutError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "standard" => Ok(EngineProfile::Standard),
            "compact-box" | "compact_box" => Ok(EngineProfile::CompactBox),
            other => Err(ScoutError::config_error(format!(
                "unknown engine profile: {}",
                other
            ))),
        }
    }
}

/// Full engine configuration. Validated at construction, immutable after;
/// every evaluator takes its slice of this by value.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub envelope: Envelope,
    pub fitment_scoring: FitmentScoring,
    pub weights: ScoreWeights,
    pub compliance: ComplianceRules,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::for_profile(EngineProfile::Standard)
    }
}

impl EngineConfig {
    pub fn for_profile(profile: EngineProfile) -> Self {
        match profile {
            EngineProfile::Standard => Self {
                envelope: Envelope::shoe_box(),
                fitment_scoring: FitmentScoring::Proportional,
                weights: ScoreWeights::default(),
                compliance: ComplianceRules::default(),
            },
            EngineProfile::CompactBox => Self {
                envelope: Envelope::compact_box(),
                fitment_scoring: FitmentScoring::Flat,
                weights: ScoreWeights::legacy_four_signal(),
                compliance: ComplianceRules::default(),
            },
        }
    }

    /// Rejects configurations the engine cannot evaluate against: a
    /// degenerate envelope or an empty rule table. A weight vector that
    /// does not sum near zero is deliberately not rejected here; the
    /// scorer warns about it and proceeds.
    pub fn validate(&self) -> Result<()> {
        let e = &self.envelope;
        let limits = [
            e.max_length_cm,
            e.max_width_cm,
            e.max_height_cm,
            e.max_weight_kg,
        ];
        if limits.iter().any(|l| !l.is_finite() || *l <= 0.0) {
            return Err(ScoutError::config_error(
                "envelope limits must be positive finite numbers",
            ));
        }

        if self.compliance.term_rules.is_empty() {
            return Err(ScoutError::config_error(
                "compliance rule table must not be empty",
            ));
        }
        for rule in &self.compliance.term_rules {
            if rule.terms.is_empty() {
                return Err(ScoutError::config_error(
                    "compliance rule has an empty term list",
                ));
            }
            if rule.penalty < 0.0 {
                return Err(ScoutError::config_error(
                    "compliance rule penalty must not be negative",
                ));
            }
        }

        Ok(())
    }
}

/// Builds the engine configuration from defaults plus environment
/// overrides, then validates it.
///
/// Recognized variables: `PARCELSCOUT_PROFILE` (standard | compact-box),
/// `PARCELSCOUT_MAX_LENGTH_CM`, `PARCELSCOUT_MAX_WIDTH_CM`,
/// `PARCELSCOUT_MAX_HEIGHT_CM`, `PARCELSCOUT_MAX_WEIGHT_KG`.
pub fn load_config() -> Result<EngineConfig> {
    let mut config = match env::var("PARCELSCOUT_PROFILE") {
        Ok(value) => {
            let profile = EngineProfile::from_str(&value)?;
            info!(?profile, "using engine profile from environment");
            EngineConfig::for_profile(profile)
        }
        Err(_) => EngineConfig::default(),
    };

    if let Some(length) = env_limit("PARCELSCOUT_MAX_LENGTH_CM") {
        config.envelope.max_length_cm = length;
    }
    if let Some(width) = env_limit("PARCELSCOUT_MAX_WIDTH_CM") {
        config.envelope.max_width_cm = width;
    }
    if let Some(height) = env_limit("PARCELSCOUT_MAX_HEIGHT_CM") {
        config.envelope.max_height_cm = height;
    }
    if let Some(weight) = env_limit("PARCELSCOUT_MAX_WEIGHT_KG") {
        config.envelope.max_weight_kg = weight;
    }

    config.validate()?;
    Ok(config)
}

fn env_limit(name: &str) -> Option<f64> {
    let raw = env::var(name).ok()?;
    match raw.parse::<f64>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(name, raw, "ignoring unparseable envelope override");
            None
        }
    }
}
