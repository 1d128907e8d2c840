use serde::{Deserialize, Serialize};

/// Raw dimension input as it arrives from upstream discovery: either a
/// free-text string like "30x20x12" / "30cm x 20cm x 12cm", or an already
/// structured numeric triple with an optional weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DimensionInput {
    Text(String),
    Explicit {
        length: f64,
        width: f64,
        height: f64,
        #[serde(default)]
        weight: Option<f64>,
    },
}

/// Weight input, supplied separately from dimensions. Free-text values like
/// "0.3" or "1.2 kg" are accepted; non-numeric text parses to 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WeightInput {
    Number(f64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendSignals {
    pub velocity_7d: f64,
    pub velocity_30d: f64,
    pub mentions_count: u64,
    pub social_sentiment: f64, // -1.0 to 1.0
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomicSignals {
    pub supplier_price: f64,
    pub estimated_retail_price: f64,
    pub shipping_cost: f64,
    pub platform_fees: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemandSignals {
    pub search_volume: f64,
    pub cpc: f64,
    pub keyword_difficulty: f64, // 0-100
    pub seasonal_multiplier: f64,
}

impl Default for DemandSignals {
    fn default() -> Self {
        Self {
            search_volume: 0.0,
            cpc: 0.0,
            keyword_difficulty: 50.0,
            seasonal_multiplier: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompetitionSignals {
    pub competitor_count: f64,
    pub ads_density: f64,
    pub market_maturity: f64, // 0-100
    pub top_player_dominance: f64,
}

impl Default for CompetitionSignals {
    fn default() -> Self {
        Self {
            competitor_count: 0.0,
            ads_density: 0.0,
            market_maturity: 50.0,
            top_player_dominance: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogisticsSignals {
    pub size_valid: bool,
    pub weight_kg: f64,
    pub shipping_complexity: f64,
    pub lead_time_days: f64,
    pub return_rate: f64, // fraction, 0.05 = 5%
}

impl Default for LogisticsSignals {
    fn default() -> Self {
        Self {
            size_valid: true,
            weight_kg: 0.0,
            shipping_complexity: 1.0,
            lead_time_days: 7.0,
            return_rate: 0.05,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComplianceSignals {
    pub eu_compliant: bool,
    pub trademark_risk: bool,
    pub category_restricted: bool,
    pub certification_required: bool,
    pub branding_issues: bool,
}

impl Default for ComplianceSignals {
    fn default() -> Self {
        Self {
            eu_compliant: true,
            trademark_risk: false,
            category_restricted: false,
            certification_required: false,
            branding_issues: false,
        }
    }
}

/// One product candidate as received from upstream discovery. All signal
/// groups are optional; a missing group falls back to its default values
/// during scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub dimensions: Option<DimensionInput>,
    #[serde(default)]
    pub weight: Option<WeightInput>,
    #[serde(default)]
    pub trends: Option<TrendSignals>,
    #[serde(default)]
    pub economics: Option<EconomicSignals>,
    #[serde(default)]
    pub demand: Option<DemandSignals>,
    #[serde(default)]
    pub competition: Option<CompetitionSignals>,
    #[serde(default)]
    pub logistics: Option<LogisticsSignals>,
    #[serde(default)]
    pub compliance: Option<ComplianceSignals>,
}

impl ProductRecord {
    /// Minimal record with only identity fields set.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: String::new(),
            category: None,
            dimensions: None,
            weight: None,
            trends: None,
            economics: None,
            demand: None,
            competition: None,
            logistics: None,
            compliance: None,
        }
    }
}
