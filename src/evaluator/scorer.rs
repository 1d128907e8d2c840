//! Weighted multi-signal opportunity scoring.
//!
//! Six independent sub-scores, each a pure function of one signal group and
//! clamped to [0,100], combine through a signed weight vector: positive
//! weights reward trend, margin and demand; negative weights penalize
//! saturation, logistics friction and compliance risk.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::model::{
    CompetitionSignals, ComplianceSignals, DemandSignals, EconomicSignals, LogisticsSignals,
    TrendSignals,
};

/// Signed weight vector over the six sub-scores. Immutable once handed to a
/// scorer; echoed back in every verdict for auditability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub trend_velocity: f64,
    pub margin_potential: f64,
    pub search_demand: f64,
    pub saturation: f64,
    pub logistics_penalty: f64,
    pub compliance_risk: f64,
}

impl ScoreWeights {
    pub fn sum(&self) -> f64 {
        self.trend_velocity
            + self.margin_potential
            + self.search_demand
            + self.saturation
            + self.logistics_penalty
            + self.compliance_risk
    }

    /// Legacy four-signal emphasis carried over from the first-generation
    /// scorer: trend, margin and demand only, with the old size-validation
    /// weight folded into the logistics penalty. Saturation and compliance
    /// carried no weight in that profile. The sum of 0.40 trips the balance
    /// warning; the legacy vector was all-positive and never summed to
    /// zero.
    pub fn legacy_four_signal() -> Self {
        Self {
            trend_velocity: 0.25,
            margin_potential: 0.25,
            search_demand: 0.20,
            saturation: 0.0,
            logistics_penalty: -0.30,
            compliance_risk: 0.0,
        }
    }
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            trend_velocity: 0.30,
            margin_potential: 0.25,
            search_demand: 0.20,
            saturation: -0.15,
            logistics_penalty: -0.05,
            compliance_risk: -0.05,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            Grade::A
        } else if score >= 70.0 {
            Grade::B
        } else if score >= 60.0 {
            Grade::C
        } else if score >= 50.0 {
            Grade::D
        } else {
            Grade::F
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        };
        write!(f, "{}", letter)
    }
}

/// All six signal groups resolved to concrete values (defaults substituted
/// for missing groups) as consumed by one scoring pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OpportunitySignals {
    pub trends: TrendSignals,
    pub economics: EconomicSignals,
    pub demand: DemandSignals,
    pub competition: CompetitionSignals,
    pub logistics: LogisticsSignals,
    pub compliance: ComplianceSignals,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComponentScores {
    pub trend_velocity: f64,
    pub margin_potential: f64,
    pub search_demand: f64,
    pub saturation: f64,
    pub logistics_penalty: f64,
    pub compliance_risk: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpportunityVerdict {
    pub final_score: f64,
    pub grade: Grade,
    pub scores: ComponentScores,
    pub weights: ScoreWeights,
}

pub struct OpportunityScorer {
    weights: ScoreWeights,
    weights_unbalanced: bool,
}

impl OpportunityScorer {
    pub fn new(weights: ScoreWeights) -> Self {
        let sum = weights.sum();
        let weights_unbalanced = sum.abs() > 0.01;
        if weights_unbalanced {
            warn!(sum, "score weights do not sum to zero; proceeding as configured");
        }
        Self {
            weights,
            weights_unbalanced,
        }
    }

    pub fn weights(&self) -> &ScoreWeights {
        &self.weights
    }

    /// True when the configured weight vector tripped the balance warning
    /// at construction. Evaluation proceeds either way.
    pub fn weights_unbalanced(&self) -> bool {
        self.weights_unbalanced
    }

    pub fn score(&self, signals: &OpportunitySignals) -> OpportunityVerdict {
        let scores = ComponentScores {
            trend_velocity: trend_velocity_score(&signals.trends),
            margin_potential: margin_potential_score(&signals.economics),
            search_demand: search_demand_score(&signals.demand),
            saturation: saturation_score(&signals.competition),
            logistics_penalty: logistics_penalty_score(&signals.logistics),
            compliance_risk: compliance_risk_score(&signals.compliance),
        };

        let w = &self.weights;
        let weighted = scores.trend_velocity * w.trend_velocity
            + scores.margin_potential * w.margin_potential
            + scores.search_demand * w.search_demand
            + scores.saturation * w.saturation
            + scores.logistics_penalty * w.logistics_penalty
            + scores.compliance_risk * w.compliance_risk;

        let final_score = (clamp_score(weighted) * 100.0).round() / 100.0;
        let grade = Grade::from_score(final_score);
        debug!(final_score, ?grade, "opportunity scored");

        OpportunityVerdict {
            final_score,
            grade,
            scores,
            weights: self.weights,
        }
    }
}

impl Default for OpportunityScorer {
    fn default() -> Self {
        Self::new(ScoreWeights::default())
    }
}

fn clamp_score(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

/// Blend of 7-day (0.7) and 30-day (0.3) velocity, a logarithmic mention
/// bonus capped at 30, and a linear sentiment bonus.
pub fn trend_velocity_score(trends: &TrendSignals) -> f64 {
    let velocity = (trends.velocity_7d * 0.7 + trends.velocity_30d * 0.3).max(0.0);
    let mentions_bonus = ((trends.mentions_count as f64 + 1.0).log10() * 10.0).min(30.0);
    let sentiment_bonus = trends.social_sentiment * 10.0;
    clamp_score(velocity + mentions_bonus + sentiment_bonus)
}

/// Piecewise margin curve. Requires both supplier and retail price to be
/// positive; anything else scores 0.
pub fn margin_potential_score(economics: &EconomicSignals) -> f64 {
    if economics.supplier_price <= 0.0 || economics.estimated_retail_price <= 0.0 {
        return 0.0;
    }

    let total_cost =
        economics.supplier_price + economics.shipping_cost + economics.platform_fees;
    let margin_pct = (economics.estimated_retail_price - total_cost)
        / economics.estimated_retail_price
        * 100.0;

    let score = if margin_pct >= 70.0 {
        100.0
    } else if margin_pct >= 50.0 {
        60.0 + (margin_pct - 50.0) * 2.0
    } else if margin_pct >= 35.0 {
        40.0 + (margin_pct - 35.0) * 1.33
    } else if margin_pct >= 20.0 {
        10.0 + (margin_pct - 20.0) * 2.0
    } else {
        (margin_pct * 0.5).max(0.0)
    };
    clamp_score(score)
}

/// Logarithmic volume score (cap 60), linear CPC score (cap 20), a
/// difficulty penalty around the 50 midpoint, and a seasonal bonus.
pub fn search_demand_score(demand: &DemandSignals) -> f64 {
    let volume_score = ((demand.search_volume + 1.0).log10() * 15.0).min(60.0);
    let cpc_score = (demand.cpc * 10.0).min(20.0);
    let difficulty_penalty = (demand.keyword_difficulty - 50.0) * 0.2;
    let seasonal_bonus = (demand.seasonal_multiplier - 1.0) * 20.0;
    clamp_score(volume_score + cpc_score - difficulty_penalty + seasonal_bonus)
}

/// Competition pressure: higher is worse. Competitor and ad-density terms
/// are individually capped so one crowded channel cannot saturate alone.
pub fn saturation_score(competition: &CompetitionSignals) -> f64 {
    let competitor_score = (competition.competitor_count * 2.0).min(40.0);
    let ads_score = (competition.ads_density * 3.0).min(30.0);
    let maturity_score = (competition.market_maturity - 50.0) * 0.4;
    let dominance_score = competition.top_player_dominance * 0.3;
    clamp_score(competitor_score + ads_score + maturity_score + dominance_score)
}

/// Shipping friction: envelope failures, weight above 1 kg, shipping
/// complexity, long lead times and the expected return rate.
pub fn logistics_penalty_score(logistics: &LogisticsSignals) -> f64 {
    let mut penalty = 0.0;
    if !logistics.size_valid {
        penalty += 40.0;
    }
    if logistics.weight_kg > 1.0 {
        penalty += (logistics.weight_kg - 1.0) * 15.0;
    }
    penalty += (logistics.shipping_complexity - 1.0) * 20.0;
    if logistics.lead_time_days > 14.0 {
        penalty += (logistics.lead_time_days - 14.0) * 2.0;
    }
    penalty += logistics.return_rate * 100.0;
    clamp_score(penalty)
}

/// Regulatory exposure from the compliance flags.
pub fn compliance_risk_score(compliance: &ComplianceSignals) -> f64 {
    let mut risk = 0.0;
    if !compliance.eu_compliant {
        risk += 50.0;
    }
    if compliance.trademark_risk {
        risk += 30.0;
    }
    if compliance.category_restricted {
        risk += 40.0;
    }
    if compliance.certification_required {
        risk += 25.0;
    }
    if compliance.branding_issues {
        risk += 20.0;
    }
    clamp_score(risk)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_default_signals_score_zero_with_grade_f() {
        let verdict = OpportunityScorer::default().score(&OpportunitySignals::default());
        assert_eq!(verdict.final_score, 0.0);
        assert_eq!(verdict.grade, Grade::F);
        assert_eq!(verdict.scores.trend_velocity, 0.0);
        assert_eq!(verdict.scores.margin_potential, 0.0);
        assert_eq!(verdict.scores.saturation, 0.0);
    }

    #[test]
    fn trend_score_blends_velocities_mentions_and_sentiment() {
        let trends = TrendSignals {
            velocity_7d: 25.0,
            velocity_30d: 15.0,
            mentions_count: 450,
            social_sentiment: 0.7,
        };
        let expected = (25.0 * 0.7 + 15.0 * 0.3) + 451.0_f64.log10() * 10.0 + 7.0;
        assert!((trend_velocity_score(&trends) - expected).abs() < 1e-9);
    }

    #[test]
    fn mention_bonus_is_capped_at_thirty() {
        let trends = TrendSignals {
            mentions_count: 10_000_000,
            ..Default::default()
        };
        assert_eq!(trend_velocity_score(&trends), 30.0);
    }

    #[test]
    fn negative_sentiment_cannot_push_trend_below_zero() {
        let trends = TrendSignals {
            social_sentiment: -1.0,
            ..Default::default()
        };
        assert_eq!(trend_velocity_score(&trends), 0.0);
    }

    #[test]
    fn margin_curve_hits_documented_breakpoints() {
        let economics = |supplier: f64| EconomicSignals {
            supplier_price: supplier,
            estimated_retail_price: 100.0,
            shipping_cost: 0.0,
            platform_fees: 0.0,
        };
        assert_eq!(margin_potential_score(&economics(30.0)), 100.0); // 70%
        assert_eq!(margin_potential_score(&economics(50.0)), 60.0); // 50%
        assert_eq!(margin_potential_score(&economics(65.0)), 40.0); // 35%
        assert_eq!(margin_potential_score(&economics(80.0)), 10.0); // 20%
        assert_eq!(margin_potential_score(&economics(90.0)), 5.0); // 10%
    }

    #[test]
    fn margin_requires_positive_prices() {
        let no_supplier = EconomicSignals {
            supplier_price: 0.0,
            estimated_retail_price: 100.0,
            ..Default::default()
        };
        assert_eq!(margin_potential_score(&no_supplier), 0.0);

        let no_retail = EconomicSignals {
            supplier_price: 10.0,
            estimated_retail_price: 0.0,
            ..Default::default()
        };
        assert_eq!(margin_potential_score(&no_retail), 0.0);
    }

    #[test]
    fn fees_and_shipping_reduce_the_margin() {
        let economics = EconomicSignals {
            supplier_price: 8.5,
            estimated_retail_price: 29.99,
            shipping_cost: 4.2,
            platform_fees: 0.0,
        };
        let margin_pct = (29.99 - 12.7) / 29.99 * 100.0;
        let expected = 60.0 + (margin_pct - 50.0) * 2.0;
        assert!((margin_potential_score(&economics) - expected).abs() < 1e-9);
    }

    #[test]
    fn demand_score_combines_all_four_terms() {
        let demand = DemandSignals {
            search_volume: 8500.0,
            cpc: 1.2,
            keyword_difficulty: 45.0,
            seasonal_multiplier: 1.0,
        };
        let expected = (8501.0_f64.log10() * 15.0).min(60.0) + 12.0 + 1.0;
        assert!((search_demand_score(&demand) - expected).abs() < 1e-9);
    }

    #[test]
    fn saturation_terms_are_individually_capped() {
        let competition = CompetitionSignals {
            competitor_count: 100.0,
            ads_density: 20.0,
            market_maturity: 100.0,
            top_player_dominance: 100.0,
        };
        // 40 + 30 + 20 + 30 clamps to 100.
        assert_eq!(saturation_score(&competition), 100.0);
    }

    #[test]
    fn logistics_penalty_accumulates_size_and_weight() {
        let logistics = LogisticsSignals {
            size_valid: false,
            weight_kg: 3.0,
            shipping_complexity: 1.0,
            lead_time_days: 7.0,
            return_rate: 0.05,
        };
        // 40 (size) + 30 (2 kg over) + 5 (returns)
        assert_eq!(logistics_penalty_score(&logistics), 75.0);
    }

    #[test]
    fn compliance_risk_saturates_with_all_flags() {
        let compliance = ComplianceSignals {
            eu_compliant: false,
            trademark_risk: true,
            category_restricted: true,
            certification_required: true,
            branding_issues: true,
        };
        assert_eq!(compliance_risk_score(&compliance), 100.0);
    }

    #[test]
    fn best_possible_positive_signals_grade_b_under_default_weights() {
        let signals = OpportunitySignals {
            trends: TrendSignals {
                velocity_7d: 150.0,
                velocity_30d: 100.0,
                mentions_count: 1_000_000,
                social_sentiment: 1.0,
            },
            economics: EconomicSignals {
                supplier_price: 10.0,
                estimated_retail_price: 100.0,
                shipping_cost: 0.0,
                platform_fees: 0.0,
            },
            demand: DemandSignals {
                search_volume: 10_000_000.0,
                cpc: 5.0,
                keyword_difficulty: 0.0,
                seasonal_multiplier: 2.0,
            },
            competition: CompetitionSignals {
                competitor_count: 0.0,
                ads_density: 0.0,
                market_maturity: 0.0,
                top_player_dominance: 0.0,
            },
            logistics: LogisticsSignals {
                return_rate: 0.0,
                ..Default::default()
            },
            compliance: ComplianceSignals::default(),
        };
        let verdict = OpportunityScorer::default().score(&signals);
        // 100*0.30 + 100*0.25 + 100*0.20 with zero penalties = 75.
        assert_eq!(verdict.final_score, 75.0);
        assert_eq!(verdict.grade, Grade::B);
    }

    #[test]
    fn verdict_echoes_the_configured_weights() {
        let verdict = OpportunityScorer::default().score(&OpportunitySignals::default());
        assert_eq!(verdict.weights, ScoreWeights::default());
    }

    #[test]
    fn legacy_weight_profile_trips_the_balance_warning() {
        let legacy = OpportunityScorer::new(ScoreWeights::legacy_four_signal());
        assert!(legacy.weights_unbalanced());
        assert!(!OpportunityScorer::default().weights_unbalanced());
    }
}
