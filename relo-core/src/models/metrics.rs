use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsMetadata {
    pub source: String,
    pub last_updated: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Benchmarks {
    /// Typical employer 401k match as a fraction of salary.
    pub average_401k_match_rate: Decimal,
    /// Typical annual employer HSA contribution.
    pub average_employer_hsa: Decimal,
    pub typical_commute_minutes: Decimal,
}

/// Curated market figures layered on top of the core tables. Everything
/// here is optional enrichment; the engine runs without it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketMetrics {
    pub metadata: MetricsMetadata,
    /// Municipal income tax rates keyed by city name or alias.
    pub local_income_taxes: HashMap<String, Decimal>,
    /// Monthly car insurance by uppercase state code, with a "default"
    /// entry for states not listed.
    pub state_car_insurance_monthly: HashMap<String, Decimal>,
    pub benchmarks: Benchmarks,
}
