use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use parcelscout::config;
use parcelscout::evaluator::{EvaluationResult, ProductEvaluator};
use parcelscout::model::{
    CompetitionSignals, DemandSignals, DimensionInput, EconomicSignals, LogisticsSignals,
    ProductRecord, TrendSignals, WeightInput,
};
use parcelscout::monitoring::{EvaluationLogEntry, EvaluationLogger};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate product records from a JSON file
    Evaluate {
        /// Path to a JSON array of product records
        input: PathBuf,
        /// Print full verdicts as JSON instead of summary lines
        #[arg(long)]
        json: bool,
    },
    /// Evaluate the built-in sample products
    Demo,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")?;

    info!("Starting ParcelScout - product opportunity evaluation");

    let cli = Cli::parse();

    match &cli.command {
        Some(Commands::Evaluate { input, json }) => {
            let content = fs::read_to_string(input)
                .with_context(|| format!("reading {}", input.display()))?;
            let records: Vec<ProductRecord> = serde_json::from_str(&content)
                .with_context(|| format!("decoding product records from {}", input.display()))?;
            info!("Loaded {} product records", records.len());
            run_evaluation(records, *json).await?;
        }
        Some(Commands::Demo) => {
            info!("Evaluating built-in sample products");
            run_evaluation(sample_products(), false).await?;
        }
        None => {
            info!("No command specified. Use --help for available commands.");
        }
    }

    Ok(())
}

async fn run_evaluation(records: Vec<ProductRecord>, as_json: bool) -> Result<()> {
    let config = config::load_config()?;
    let evaluator = ProductEvaluator::new(config);

    let log_dir = std::env::var("PARCELSCOUT_LOG_DIR").ok();
    let logger = EvaluationLogger::new(log_dir.as_deref())?;

    let results = evaluator.evaluate_batch(&records);

    for result in &results {
        if as_json {
            println!("{}", serde_json::to_string_pretty(result)?);
        } else {
            print_summary(result);
        }

        if let Err(e) = logger
            .log_evaluation(EvaluationLogEntry::from_result(result))
            .await
        {
            error!("Failed to log evaluation: {}", e);
        }
    }

    Ok(())
}

fn print_summary(result: &EvaluationResult) {
    println!(
        "{}: grade {} ({:.2}/100) | fitment {} | compliance {} ({})",
        result.name,
        result.opportunity.grade,
        result.opportunity.final_score,
        if result.fitment.valid { "OK" } else { "FAIL" },
        if result.compliance.compliant {
            "OK"
        } else {
            "FAIL"
        },
        result.compliance.risk,
    );
    for issue in &result.issues {
        println!("  - {}", issue);
    }
}

/// The sample products the original evaluation harness shipped with.
fn sample_products() -> Vec<ProductRecord> {
    let mut phone_stand = ProductRecord::named("Portable Phone Stand");
    phone_stand.description = "Adjustable aluminum stand for smartphones".to_string();
    phone_stand.category = Some("Accessories".to_string());
    phone_stand.dimensions = Some(DimensionInput::Text("20x15x10".to_string()));
    phone_stand.weight = Some(WeightInput::Text("0.3".to_string()));
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
    phone_stand.logistics = Some(LogisticsSignals {
        lead_time_days: 12.0,
        ..Default::default()
    });

    let mut pillow = ProductRecord::named("Large Pillow");
    pillow.description = "Oversized decorative pillow".to_string();
    pillow.category = Some("Home".to_string());
    pillow.dimensions = Some(DimensionInput::Text("50x40x15".to_string()));
    pillow.weight = Some(WeightInput::Text("1.2".to_string()));

    let mut gadget = ProductRecord::named("Tiny Gadget");
    gadget.description = "Pocket-sized novelty item".to_string();
    gadget.dimensions = Some(DimensionInput::Text("5x3x2".to_string()));
    gadget.weight = Some(WeightInput::Text("0.1".to_string()));

    let mut charger = ProductRecord::named("Apple iPhone Charger");
    charger.description = "USB charging cable with battery indicator".to_string();
    charger.category = Some("Electronics".to_string());
    charger.dimensions = Some(DimensionInput::Text("10x5x3".to_string()));
    charger.weight = Some(WeightInput::Text("0.2".to_string()));

    let mut yoga_mat = ProductRecord::named("Yoga Mat");
    yoga_mat.description = "Non-slip exercise mat for yoga practice".to_string();
    yoga_mat.category = Some("Fitness".to_string());
    yoga_mat.dimensions = Some(DimensionInput::Text("60x15x15".to_string()));
    yoga_mat.weight = Some(WeightInput::Text("1.0".to_string()));

    vec![phone_stand, pillow, gadget, charger, yoga_mat]
}
