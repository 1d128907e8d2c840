use parcelscout::config::{EngineConfig, EngineProfile};
use parcelscout::evaluator::scorer::Grade;
use parcelscout::evaluator::ProductEvaluator;
use parcelscout::model::{
    CompetitionSignals, DemandSignals, DimensionInput, EconomicSignals, ProductRecord,
    TrendSignals, WeightInput,
};

// ---------------------------------------------------------------------------
// Test data fixtures
// ---------------------------------------------------------------------------

fn record(name: &str, description: &str, category: &str, dims: &str, weight: &str) -> ProductRecord {
    let mut record = ProductRecord::named(name);
    record.description = description.to_string();
    record.category = Some(category.to_string());
    record.dimensions = Some(DimensionInput::Text(dims.to_string()));
    record.weight = Some(WeightInput::Text(weight.to_string()));
    record
}

/// A small catalog mixing a clean winner, an oversized item, a compliance
/// nightmare and a sparse record.
fn sample_catalog() -> Vec<ProductRecord> {
    let mut phone_stand = record(
        "Portable Phone Stand",
        "Adjustable aluminum stand for smartphones",
        "Accessories",
        "20x15x10",
        "0.3",
    );
    phone_stand.trends = Some(TrendSignals {
        velocity_7d: 25.0,
        velocity_30d: 15.0,
        mentions_count: 450,
        social_sentiment: 0.7,
    });
    phone_stand.economics = Some(EconomicSignals {
        supplier_price: 8.5,
        estimated_retail_price: 29.99,
        shipping_cost: 4.2,
        platform_fees: 0.0,
    });
    phone_stand.demand = Some(DemandSignals {
        search_volume: 8500.0,
        cpc: 1.2,
        keyword_difficulty: 45.0,
        seasonal_multiplier: 1.0,
    });
    phone_stand.competition = Some(CompetitionSignals {
        competitor_count: 12.0,
        ads_density: 8.0,
        market_maturity: 60.0,
        top_player_dominance: 0.0,
    });

    let pillow = record(
        "Large Pillow",
        "Oversized decorative pillow",
        "Home",
        "50x40x15",
        "1.2",
    );

    let charger = record(
        "Apple iPhone Charger",
        "USB charging cable with battery indicator",
        "Electronics",
        "10x5x3",
        "0.2",
    );

    let yoga_mat = record(
        "Yoga Mat",
        "Non-slip exercise mat for yoga practice",
        "Fitness",
        "20x15x10",
        "1.0",
    );

    let mut mystery = ProductRecord::named("Mystery Item");
    mystery.dimensions = Some(DimensionInput::Text("unknown".to_string()));

    vec![phone_stand, pillow, charger, yoga_mat, mystery]
}

// ---------------------------------------------------------------------------
// End-to-end behavior
// ---------------------------------------------------------------------------

#[test]
fn batch_yields_one_result_per_record_in_input_order() {
    let results = ProductEvaluator::default().evaluate_batch(&sample_catalog());

    assert_eq!(results.len(), 5);
    let names: Vec<&str> = results.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "Portable Phone Stand",
            "Large Pillow",
            "Apple iPhone Charger",
            "Yoga Mat",
            "Mystery Item"
        ]
    );
}

#[test]
fn clean_product_passes_both_gates() {
    let results = ProductEvaluator::default().evaluate_batch(&sample_catalog());
    let stand = &results[0];

    assert!(stand.fitment.valid);
    assert!(stand.fitment.violations.is_empty());
    assert!(stand.fitment.score > 0.0);
    assert!(stand.compliance.compliant);
    assert!(stand.opportunity.final_score > 0.0);
}

#[test]
fn oversized_product_reports_dimension_violations_but_not_weight() {
    let results = ProductEvaluator::default().evaluate_batch(&sample_catalog());
    let pillow = &results[1];

    assert!(!pillow.fitment.valid);
    assert_eq!(pillow.fitment.violations.len(), 3);
    assert!(pillow
        .fitment
        .violations
        .iter()
        .all(|v| !v.starts_with("Weight")));
    assert!(pillow
        .recommendations
        .iter()
        .any(|r| r.contains("smaller or lighter")));
}

#[test]
fn branded_electronics_fail_compliance_and_carry_full_risk() {
    let results = ProductEvaluator::default().evaluate_batch(&sample_catalog());
    let charger = &results[2];

    assert!(!charger.compliance.compliant);
    assert!(charger.compliance.trademarks.flagged);
    assert!(charger.compliance.category.flagged);
    assert_eq!(charger.opportunity.scores.compliance_risk, 100.0);
    assert!(!charger.issues.is_empty());
}

#[test]
fn unremarkable_product_screens_fully_clean() {
    let results = ProductEvaluator::default().evaluate_batch(&sample_catalog());
    let yoga_mat = &results[3];

    assert!(yoga_mat.compliance.compliant);
    assert_eq!(yoga_mat.compliance.score, 100.0);
    assert!(yoga_mat.compliance.issues.is_empty());
}

#[test]
fn sparse_record_still_produces_a_complete_verdict() {
    let results = ProductEvaluator::default().evaluate_batch(&sample_catalog());
    let mystery = &results[4];

    assert!(!mystery.fitment.valid);
    assert_eq!(mystery.fitment.score, 0.0);
    assert_eq!(mystery.opportunity.grade, Grade::F);
    assert!(mystery
        .issues
        .contains(&"missing or unparseable dimensions".to_string()));
}

#[test]
fn every_score_stays_within_bounds() {
    let results = ProductEvaluator::default().evaluate_batch(&sample_catalog());

    for result in &results {
        let o = &result.opportunity;
        let all = [
            o.final_score,
            o.scores.trend_velocity,
            o.scores.margin_potential,
            o.scores.search_demand,
            o.scores.saturation,
            o.scores.logistics_penalty,
            o.scores.compliance_risk,
            result.fitment.score,
            result.compliance.score,
        ];
        for value in all {
            assert!(
                (0.0..=100.0).contains(&value),
                "{}: score {} out of bounds",
                result.name,
                value
            );
        }
    }
}

#[test]
fn removing_unrelated_records_does_not_change_other_verdicts() {
    let evaluator = ProductEvaluator::default();
    let catalog = sample_catalog();

    let full = evaluator.evaluate_batch(&catalog);
    let trimmed = evaluator.evaluate_batch(&[catalog[0].clone(), catalog[2].clone()]);

    assert_eq!(full[0], trimmed[0]);
    assert_eq!(full[2], trimmed[1]);
}

#[test]
fn repeated_evaluation_is_byte_identical() {
    let evaluator = ProductEvaluator::default();
    let catalog = sample_catalog();

    let first = serde_json::to_string(&evaluator.evaluate_batch(&catalog)).unwrap();
    let second = serde_json::to_string(&evaluator.evaluate_batch(&catalog)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn compact_box_profile_changes_fitment_but_keeps_determinism() {
    let legacy = ProductEvaluator::new(EngineConfig::for_profile(EngineProfile::CompactBox));
    let catalog = sample_catalog();
    let results = legacy.evaluate_batch(&catalog);

    // 50x40x15 against 30x30x30: length and width exceed, flat penalties.
    let pillow = &results[1];
    assert!(!pillow.fitment.valid);
    assert_eq!(pillow.fitment.violations.len(), 2);
    assert_eq!(pillow.fitment.score, 50.0);

    let again = legacy.evaluate_batch(&catalog);
    assert_eq!(results, again);
}
