use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Monthly living-cost components a city may publish directly. When a
/// record carries these, they take precedence over the proportional
/// fallback split of the baseline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemizedCosts {
    pub groceries: Decimal,
    pub transport: Decimal,
    pub utilities: Decimal,
    pub misc: Decimal,
}

/// One row of the city cost-of-living table. The slug is the record's
/// identity; lookups go through it and nothing else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityCostRecord {
    pub city: String,
    pub state: String,
    pub slug: String,
    pub avg_rent: Decimal,
    pub avg_house_price: Decimal,
    /// Cost-of-living index relative to a 100-point national baseline.
    pub col_index: Decimal,
    pub median_income: Decimal,
    pub itemized: Option<ItemizedCosts>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HouseholdType {
    Single,
    Family,
}

impl HouseholdType {
    /// Multiplier applied to living-cost components, never to rent.
    pub fn multiplier(&self) -> Decimal {
        match self {
            Self::Single => Decimal::ONE,
            Self::Family => Decimal::new(14, 1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HousingType {
    Rent,
    Own,
    Parents,
}
