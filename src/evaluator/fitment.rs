use serde::{Deserialize, Serialize};
use tracing::debug;

use super::dimensions::CanonicalDimensions;

/// Maximum physical envelope a product may occupy to qualify for
/// cost-effective small-parcel shipping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub max_length_cm: f64,
    pub max_width_cm: f64,
    pub max_height_cm: f64,
    pub max_weight_kg: f64,
}

impl Envelope {
    /// Standard shoe-box envelope for EU small-parcel shipping.
    pub fn shoe_box() -> Self {
        Self {
            max_length_cm: 30.0,
            max_width_cm: 20.0,
            max_height_cm: 12.0,
            max_weight_kg: 2.0,
        }
    }

    /// Looser cubic envelope used by the legacy validation profile.
    pub fn compact_box() -> Self {
        Self {
            max_length_cm: 30.0,
            max_width_cm: 30.0,
            max_height_cm: 30.0,
            max_weight_kg: 5.0,
        }
    }

    pub fn max_volume(&self) -> f64 {
        self.max_length_cm * self.max_width_cm * self.max_height_cm
    }
}

impl Default for Envelope {
    fn default() -> Self {
        Self::shoe_box()
    }
}

/// How the 0-100 fitment score is derived.
///
/// `Proportional` rewards packing efficiency when valid and charges
/// volume/weight overage penalties when invalid. `Flat` is the legacy
/// profile: 100 minus 25 points per violated constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitmentScoring {
    Proportional,
    Flat,
}

/// Verdict from validating a product against the shipping envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitmentVerdict {
    pub valid: bool,
    pub dimensions: Option<CanonicalDimensions>,
    pub volume: f64,
    pub violations: Vec<String>,
    pub score: f64,
    pub reason: String,
}

pub struct FitmentValidator {
    envelope: Envelope,
    scoring: FitmentScoring,
}

impl FitmentValidator {
    pub fn new(envelope: Envelope, scoring: FitmentScoring) -> Self {
        Self { envelope, scoring }
    }

    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    /// Validates canonical dimensions against the envelope. Unparseable
    /// input (`None`) produces an invalid verdict with score 0 rather than
    /// an error.
    pub fn validate(&self, dims: Option<CanonicalDimensions>) -> FitmentVerdict {
        let Some(dims) = dims else {
            return FitmentVerdict {
                valid: false,
                dimensions: None,
                volume: 0.0,
                violations: Vec::new(),
                score: 0.0,
                reason: "missing or unparseable dimensions".to_string(),
            };
        };

        let env = &self.envelope;
        let volume = dims.volume();

        // Each constraint is tested independently; a single exceeded
        // dimension or the weight invalidates the product. Volume never
        // gates validity on its own, it only drives the overage penalty.
        let checks = [
            ("Length", dims.length, env.max_length_cm),
            ("Width", dims.width, env.max_width_cm),
            ("Height", dims.height, env.max_height_cm),
            ("Weight", dims.weight, env.max_weight_kg),
        ];

        let mut violations = Vec::new();
        for (label, actual, limit) in checks {
            if actual > limit {
                let excess = (actual - limit) / limit * 100.0;
                violations.push(format!("{} exceeds by {:.1}%", label, excess));
            }
        }

        let valid = violations.is_empty();
        let score = match self.scoring {
            FitmentScoring::Proportional => {
                self.proportional_score(valid, volume, dims.weight)
            }
            FitmentScoring::Flat => (100.0 - 25.0 * violations.len() as f64).max(0.0),
        };

        let reason = if valid {
            "Fits within shipping envelope".to_string()
        } else {
            format!("Exceeds limits: {}", violations.join(", "))
        };

        debug!(
            volume,
            weight = dims.weight,
            valid,
            score,
            "fitment validated"
        );

        FitmentVerdict {
            valid,
            dimensions: Some(dims),
            volume,
            violations,
            score,
            reason,
        }
    }

    fn proportional_score(&self, valid: bool, volume: f64, weight: f64) -> f64 {
        let max_volume = self.envelope.max_volume();
        let max_weight = self.envelope.max_weight_kg;

        if valid {
            // Efficiency: smaller and lighter products leave more margin.
            let volume_margin = (max_volume - volume) / max_volume;
            let weight_margin = if weight > 0.0 {
                (max_weight - weight) / max_weight
            } else {
                1.0
            };
            ((volume_margin + weight_margin) / 2.0 * 100.0).round()
        } else {
            // Overage penalties stay bounded: at most 50 points for volume
            // and 30 for weight, no matter how far past the cap.
            let volume_penalty = if volume > max_volume {
                ((volume / max_volume - 1.0) * 50.0).min(50.0)
            } else {
                0.0
            };
            let weight_penalty = if weight > max_weight {
                ((weight / max_weight - 1.0) * 30.0).min(30.0)
            } else {
                0.0
            };
            (100.0 - volume_penalty - weight_penalty).clamp(0.0, 100.0)
        }
    }
}

impl Default for FitmentValidator {
    fn default() -> Self {
        Self::new(Envelope::shoe_box(), FitmentScoring::Proportional)
    }
}
