use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::outcome::LocationBreakdown;

/// Relocation verdict, ordered from most to least favorable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Verdict {
    Go,
    Conditional,
    Warning,
    NoGo,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Go => "GO",
            Self::Conditional => "CONDITIONAL",
            Self::Warning => "WARNING",
            Self::NoGo => "NO_GO",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub origin: LocationBreakdown,
    pub destination: LocationBreakdown,
    /// Residual change, destination relative to origin, in percent.
    pub delta_percent: Decimal,
    pub verdict: Verdict,
    /// Destination gross salary that would match the origin residual,
    /// rounded to the nearest 100.
    pub break_even_salary: Decimal,
    /// Each residual invested monthly for ten years at 7%.
    pub wealth_ten_year_origin: Decimal,
    pub wealth_ten_year_destination: Decimal,
    pub wealth_gap: Decimal,
    pub verdict_message: String,
    pub negotiation_lever: String,
    pub monthly_gain: String,
}
