//! Monthly cost-of-living allocation for a single city and household.
//!
//! A city either publishes itemized component costs or gets a proportional
//! split of an index-scaled baseline. Housing is charged by exactly one of
//! three branches depending on the housing type.
//!
//! # Allocation Rules
//!
//! | Rule | Description |
//! |------|-------------|
//! | Baseline | `baseline_living_cost × (col_index / 100) × household multiplier` |
//! | Itemized | Record components × household multiplier; total is their sum |
//! | Fallback | 30% groceries / 15% transport / 10% utilities of the baseline; misc takes the remainder so the components sum to the baseline exactly |
//! | Transport discount | `× 0.3` when fully remote or not owning a car, both paths |
//! | Housing | Rent ⇒ market rent (configured fallback when the record has none); Own ⇒ `house price × ownership rate / 12`; Parents ⇒ fixed token cost |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use relo_core::calculations::{CostAllocator, CostConfig};
//! use relo_core::models::{CityCostRecord, HouseholdType, HousingType};
//!
//! let city = CityCostRecord {
//!     city: "Boise".to_string(),
//!     state: "ID".to_string(),
//!     slug: "boise-id".to_string(),
//!     avg_rent: dec!(1800),
//!     avg_house_price: dec!(450000),
//!     col_index: dec!(100),
//!     median_income: dec!(68000),
//!     itemized: None,
//! };
//!
//! let allocator = CostAllocator::new(CostConfig::default());
//! let costs = allocator
//!     .allocate(&city, HouseholdType::Single, HousingType::Rent, false, true)
//!     .unwrap();
//!
//! assert_eq!(costs.housing, dec!(1800.00));
//! assert_eq!(costs.groceries, dec!(600.00));
//! assert_eq!(costs.transport, dec!(300.00));
//! assert_eq!(costs.utilities, dec!(200.00));
//! assert_eq!(costs.misc, dec!(900.00));
//! assert_eq!(costs.living_total, dec!(2000.00));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::calculations::common::round_half_up;
use crate::models::{CityCostRecord, CostBreakdown, HouseholdType, HousingType};

/// Errors that can occur during cost allocation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CostAllocatorError {
    /// The baseline living cost must be positive.
    #[error("invalid baseline living cost: {0}")]
    InvalidBaseline(Decimal),

    /// The transport discount multiplier must be in [0, 1].
    #[error("invalid transport discount: {0}")]
    InvalidTransportDiscount(Decimal),

    /// A component share must be in [0, 1].
    #[error("invalid component share: {0}")]
    InvalidComponentShare(Decimal),

    /// The fixed component shares must leave room for the misc remainder.
    #[error("component shares sum to {0}, leaving no misc remainder")]
    SharesExceedWhole(Decimal),

    /// The ownership amortization rate must be in [0, 1].
    #[error("invalid ownership rate: {0}")]
    InvalidOwnershipRate(Decimal),

    /// The fallback rent must not be negative.
    #[error("invalid fallback rent: {0}")]
    InvalidFallbackRent(Decimal),

    /// The token housing cost must not be negative.
    #[error("invalid token housing cost: {0}")]
    InvalidTokenHousingCost(Decimal),
}

/// Configuration for the cost allocator.
///
/// The defaults reproduce the published allocation model: a $2,000
/// monthly baseline at index 100, the 30/15/10 component split, a 0.3×
/// transport discount, and 1.5% annual ownership amortization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostConfig {
    /// Monthly living cost of a single household at cost index 100.
    pub baseline_living_cost: Decimal,

    /// Annual fraction of the house price charged as ownership cost.
    pub ownership_rate: Decimal,

    /// Monthly cost charged when living with family.
    pub token_housing_cost: Decimal,

    /// Rent assumed when a city record has no positive average rent.
    pub fallback_rent: Decimal,

    /// Multiplier applied to transport when remote or without a car.
    pub transport_discount: Decimal,

    pub grocery_share: Decimal,
    pub transport_share: Decimal,
    pub utility_share: Decimal,
}

impl Default for CostConfig {
    fn default() -> Self {
        Self {
            baseline_living_cost: Decimal::from(2000),
            ownership_rate: Decimal::new(15, 3),
            token_housing_cost: Decimal::from(300),
            fallback_rent: Decimal::from(2000),
            transport_discount: Decimal::new(3, 1),
            grocery_share: Decimal::new(30, 2),
            transport_share: Decimal::new(15, 2),
            utility_share: Decimal::new(10, 2),
        }
    }
}

impl CostConfig {
    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns [`CostAllocatorError`] if:
    /// - `baseline_living_cost` is not positive
    /// - `transport_discount` is not in [0, 1]
    /// - any component share is not in [0, 1]
    /// - the shares sum to more than 1
    /// - `ownership_rate` is not in [0, 1]
    /// - `fallback_rent` or `token_housing_cost` is negative
    pub fn validate(&self) -> Result<(), CostAllocatorError> {
        if self.baseline_living_cost <= Decimal::ZERO {
            return Err(CostAllocatorError::InvalidBaseline(
                self.baseline_living_cost,
            ));
        }
        if self.transport_discount < Decimal::ZERO || self.transport_discount > Decimal::ONE {
            return Err(CostAllocatorError::InvalidTransportDiscount(
                self.transport_discount,
            ));
        }
        for share in [self.grocery_share, self.transport_share, self.utility_share] {
            if share < Decimal::ZERO || share > Decimal::ONE {
                return Err(CostAllocatorError::InvalidComponentShare(share));
            }
        }
        let share_sum = self.grocery_share + self.transport_share + self.utility_share;
        if share_sum > Decimal::ONE {
            return Err(CostAllocatorError::SharesExceedWhole(share_sum));
        }
        if self.ownership_rate < Decimal::ZERO || self.ownership_rate > Decimal::ONE {
            return Err(CostAllocatorError::InvalidOwnershipRate(self.ownership_rate));
        }
        if self.fallback_rent < Decimal::ZERO {
            return Err(CostAllocatorError::InvalidFallbackRent(self.fallback_rent));
        }
        if self.token_housing_cost < Decimal::ZERO {
            return Err(CostAllocatorError::InvalidTokenHousingCost(
                self.token_housing_cost,
            ));
        }
        Ok(())
    }
}

/// Allocator for monthly housing and living costs.
#[derive(Debug, Clone)]
pub struct CostAllocator {
    config: CostConfig,
}

impl CostAllocator {
    pub fn new(config: CostConfig) -> Self {
        Self { config }
    }

    /// Allocates one month of costs for a city and household.
    ///
    /// Missing itemized data is the normal fallback branch, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`CostAllocatorError`] if the configuration is invalid.
    pub fn allocate(
        &self,
        city: &CityCostRecord,
        household: HouseholdType,
        housing: HousingType,
        is_remote: bool,
        owns_car: bool,
    ) -> Result<CostBreakdown, CostAllocatorError> {
        self.config.validate()?;

        let multiplier = household.multiplier();
        let discounted = is_remote || !owns_car;

        let breakdown = match &city.itemized {
            Some(items) => {
                let groceries = round_half_up(items.groceries * multiplier);
                let mut transport = items.transport * multiplier;
                if discounted {
                    transport *= self.config.transport_discount;
                }
                let transport = round_half_up(transport);
                let utilities = round_half_up(items.utilities * multiplier);
                let misc = round_half_up(items.misc * multiplier);

                CostBreakdown {
                    housing: self.housing_cost(city, housing),
                    groceries,
                    transport,
                    utilities,
                    misc,
                    living_total: groceries + transport + utilities + misc,
                    itemized: true,
                }
            }
            None => {
                let baseline = self.config.baseline_living_cost * city.col_index
                    / Decimal::ONE_HUNDRED
                    * multiplier;

                let groceries = round_half_up(baseline * self.config.grocery_share);
                let mut transport = baseline * self.config.transport_share;
                if discounted {
                    transport *= self.config.transport_discount;
                }
                let transport = round_half_up(transport);
                let utilities = round_half_up(baseline * self.config.utility_share);
                let living_total = round_half_up(baseline);
                // Misc takes whatever is left so the components always sum
                // to the baseline, discount and rounding included.
                let misc = living_total - groceries - transport - utilities;

                CostBreakdown {
                    housing: self.housing_cost(city, housing),
                    groceries,
                    transport,
                    utilities,
                    misc,
                    living_total,
                    itemized: false,
                }
            }
        };

        Ok(breakdown)
    }

    /// Charges exactly one housing branch.
    fn housing_cost(
        &self,
        city: &CityCostRecord,
        housing: HousingType,
    ) -> Decimal {
        let cost = match housing {
            HousingType::Rent => {
                if city.avg_rent > Decimal::ZERO {
                    city.avg_rent
                } else {
                    warn!(
                        slug = %city.slug,
                        fallback_rent = %self.config.fallback_rent,
                        "city record has no average rent; using fallback"
                    );
                    self.config.fallback_rent
                }
            }
            HousingType::Own => {
                city.avg_house_price * self.config.ownership_rate / Decimal::from(12)
            }
            HousingType::Parents => self.config.token_housing_cost,
        };
        round_half_up(cost)
    }
}
