//! Single-location analysis: one (salary, city) pair to one monthly
//! residual.
//!
//! Composes the tax waterfall and the cost allocator, then layers the
//! location-specific adjustments: municipal income tax, car insurance,
//! amortized signing bonus and risk-adjusted equity. The residual is the
//! load-bearing output; everything downstream classifies on it.
//!
//! Commute time never reduces the residual. Its dollar cost is assumed to
//! sit inside the transport component already; the minutes only stretch
//! the denominator of the informational true hourly rate.
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//!
//! use rust_decimal_macros::dec;
//! use relo_core::calculations::{AnalysisInput, CostConfig, LocationAnalyzer};
//! use relo_core::models::{
//!     CityCostRecord, FederalTaxTable, HouseholdType, HousingType, PayrollTaxRule,
//!     StateTaxRule, TaxBracket, TaxDefaults, TaxTable,
//! };
//!
//! let table = TaxTable {
//!     federal: FederalTaxTable {
//!         brackets_single: vec![
//!             TaxBracket { up_to: Some(dec!(10000)), rate: dec!(0.10) },
//!             TaxBracket { up_to: None, rate: dec!(0.20) },
//!         ],
//!         brackets_married: vec![
//!             TaxBracket { up_to: Some(dec!(20000)), rate: dec!(0.10) },
//!             TaxBracket { up_to: None, rate: dec!(0.20) },
//!         ],
//!         standard_deduction_single: dec!(15000),
//!         standard_deduction_married: dec!(30000),
//!     },
//!     states: HashMap::from([("TX".to_string(), StateTaxRule::NoTax)]),
//!     local_taxes: HashMap::new(),
//!     payroll: PayrollTaxRule {
//!         social_security_rate: dec!(0.062),
//!         social_security_cap: dec!(176100),
//!         medicare_rate: dec!(0.0145),
//!         additional_medicare_rate: dec!(0.009),
//!         additional_medicare_threshold: dec!(200000),
//!     },
//!     defaults: TaxDefaults {
//!         retirement_rate: dec!(0.05),
//!         retirement_cap: dec!(23500),
//!         monthly_insurance: dec!(150),
//!         rsu_supplemental_rate: dec!(0.22),
//!         car_insurance_monthly: dec!(175),
//!         state_fallback_rate: dec!(0.05),
//!     },
//! };
//! let city = CityCostRecord {
//!     city: "Austin".to_string(),
//!     state: "TX".to_string(),
//!     slug: "austin-tx".to_string(),
//!     avg_rent: dec!(1800),
//!     avg_house_price: dec!(450000),
//!     col_index: dec!(100),
//!     median_income: dec!(78000),
//!     itemized: None,
//! };
//!
//! let analyzer = LocationAnalyzer::new(&table, None, CostConfig::default());
//! let input = AnalysisInput::new(dec!(100000), HouseholdType::Single, HousingType::Rent);
//! let breakdown = analyzer.analyze(&city, &input).unwrap();
//!
//! assert_eq!(breakdown.net_monthly, dec!(5745.64));
//! assert_eq!(breakdown.residual, dec!(1945.64));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::calculations::common::{max, round_half_up};
use crate::calculations::cost::{CostAllocator, CostAllocatorError, CostConfig};
use crate::calculations::tax::{TaxCalculator, TaxCalculatorError, TaxInput};
use crate::models::{
    CityCostRecord, FilingStatus, HouseholdType, HousingType, LifestyleMetrics,
    LocationBreakdown, MarketMetrics, TaxTable,
};

/// Price of the reference purchase behind months_to_afford_reference.
const REFERENCE_PURCHASE: Decimal = Decimal::from_parts(50000, 0, 0, false, 0);

/// Residual sentinel published when affordability is undefined.
const AFFORDABILITY_SENTINEL: Decimal = Decimal::from_parts(99, 0, 0, false, 0);

/// Errors raised at the analysis boundary before any computation runs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("negative salary: {0}")]
    NegativeSalary(Decimal),

    #[error("negative commute minutes: {0}")]
    NegativeCommute(Decimal),

    /// Retirement rate must be a fraction in [0, 1].
    #[error("invalid retirement rate: {0}")]
    InvalidRetirementRate(Decimal),

    #[error("negative {field}: {value}")]
    NegativeAmount {
        field: &'static str,
        value: Decimal,
    },

    #[error(transparent)]
    Tax(#[from] TaxCalculatorError),

    #[error(transparent)]
    Cost(#[from] CostAllocatorError),
}

/// Input values for one location analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisInput {
    /// Annual gross salary at this location.
    pub salary: Decimal,

    pub household: HouseholdType,
    pub housing: HousingType,

    /// `None` derives the status from the household type: a family files
    /// jointly, a single household files single.
    pub filing_status: Option<FilingStatus>,

    /// See [`TaxInput`] for the semantics of these pass-through fields.
    pub retirement_rate: Option<Decimal>,
    pub monthly_insurance: Option<Decimal>,
    pub annual_pretax_deductions: Decimal,
    pub rsu_annual: Decimal,

    /// Monthly debt service (loans, childcare) leaking out of the residual.
    pub monthly_debt: Decimal,
    pub monthly_side_income: Decimal,
    pub extra_monthly_leaks: Decimal,

    pub is_remote: bool,
    pub owns_car: bool,

    /// One-time signing bonus, spread over the first year.
    pub signing_bonus: Decimal,
    /// Annual equity grant value before the risk multiplier.
    pub equity_annual: Decimal,
    /// Haircut applied to equity (vesting/liquidity risk).
    pub equity_multiplier: Decimal,

    /// One-way commute minutes per working day.
    pub commute_minutes: Decimal,

    /// Whether the employer's premium-benefit package should be valued
    /// against the market benchmarks.
    pub premium_benefits: bool,
}

impl AnalysisInput {
    /// A neutral input: car owner, on-site, no extras. The fields every
    /// analysis needs are explicit; everything else starts at zero.
    pub fn new(
        salary: Decimal,
        household: HouseholdType,
        housing: HousingType,
    ) -> Self {
        Self {
            salary,
            household,
            housing,
            filing_status: None,
            retirement_rate: None,
            monthly_insurance: None,
            annual_pretax_deductions: Decimal::ZERO,
            rsu_annual: Decimal::ZERO,
            monthly_debt: Decimal::ZERO,
            monthly_side_income: Decimal::ZERO,
            extra_monthly_leaks: Decimal::ZERO,
            is_remote: false,
            owns_car: true,
            signing_bonus: Decimal::ZERO,
            equity_annual: Decimal::ZERO,
            equity_multiplier: Decimal::ONE,
            commute_minutes: Decimal::ZERO,
            premium_benefits: false,
        }
    }

    fn validate(&self) -> Result<(), AnalysisError> {
        if self.salary < Decimal::ZERO {
            return Err(AnalysisError::NegativeSalary(self.salary));
        }
        if self.commute_minutes < Decimal::ZERO {
            return Err(AnalysisError::NegativeCommute(self.commute_minutes));
        }
        if let Some(rate) = self.retirement_rate {
            if rate < Decimal::ZERO || rate > Decimal::ONE {
                return Err(AnalysisError::InvalidRetirementRate(rate));
            }
        }
        let amounts = [
            ("monthly insurance", self.monthly_insurance.unwrap_or_default()),
            ("pre-tax deductions", self.annual_pretax_deductions),
            ("RSU amount", self.rsu_annual),
            ("monthly debt", self.monthly_debt),
            ("side income", self.monthly_side_income),
            ("extra leaks", self.extra_monthly_leaks),
            ("signing bonus", self.signing_bonus),
            ("equity amount", self.equity_annual),
            ("equity multiplier", self.equity_multiplier),
        ];
        for (field, value) in amounts {
            if value < Decimal::ZERO {
                return Err(AnalysisError::NegativeAmount { field, value });
            }
        }
        Ok(())
    }
}

/// Analyzer for a single (salary, city) pair.
#[derive(Debug, Clone)]
pub struct LocationAnalyzer<'a> {
    tax_table: &'a TaxTable,
    metrics: Option<&'a MarketMetrics>,
    cost_config: CostConfig,
}

impl<'a> LocationAnalyzer<'a> {
    pub fn new(
        tax_table: &'a TaxTable,
        metrics: Option<&'a MarketMetrics>,
        cost_config: CostConfig,
    ) -> Self {
        Self {
            tax_table,
            metrics,
            cost_config,
        }
    }

    /// Builds the full monthly cash position for one input.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError`] for out-of-range inputs or an invalid
    /// reference table; missing metrics are a normal branch.
    pub fn analyze(
        &self,
        city: &CityCostRecord,
        input: &AnalysisInput,
    ) -> Result<LocationBreakdown, AnalysisError> {
        input.validate()?;

        let filing_status = input.filing_status.unwrap_or(match input.household {
            HouseholdType::Family => FilingStatus::Married,
            HouseholdType::Single => FilingStatus::Single,
        });

        let tax = TaxCalculator::new(self.tax_table).calculate(&TaxInput {
            gross_income: input.salary,
            state_code: city.state.clone(),
            filing_status,
            retirement_rate: input.retirement_rate,
            monthly_insurance: input.monthly_insurance,
            annual_pretax_deductions: input.annual_pretax_deductions,
            rsu_annual: input.rsu_annual,
        })?;

        let local_tax_annual = self.local_income_tax(input.salary, &city.slug);
        let car_insurance_monthly = if input.owns_car {
            self.car_insurance_monthly(&city.state)
        } else {
            Decimal::ZERO
        };

        let equity_annual = input.equity_annual * input.equity_multiplier;
        let amortized_signing = input.signing_bonus;

        let net_monthly = round_half_up(
            (tax.net_income - local_tax_annual - car_insurance_monthly * Decimal::from(12)
                + equity_annual
                + amortized_signing)
                / Decimal::from(12),
        );

        let costs = CostAllocator::new(self.cost_config.clone()).allocate(
            city,
            input.household,
            input.housing,
            input.is_remote,
            input.owns_car,
        )?;

        let residual = round_half_up(
            net_monthly + input.monthly_side_income
                - (costs.housing + costs.living_total + input.monthly_debt
                    + input.extra_monthly_leaks),
        );

        // 2080 working hours plus round trips over 22 days, 12 months.
        let annual_commute_hours =
            input.commute_minutes * Decimal::from(2 * 22 * 12) / Decimal::from(60);
        let true_hourly_rate = if input.salary > Decimal::ZERO {
            round_half_up(input.salary / (Decimal::from(2080) + annual_commute_hours))
        } else {
            Decimal::ZERO
        };

        let (months_to_afford_reference, years_to_save_down_payment) = if residual
            > Decimal::ZERO
        {
            let down_payment = city.avg_house_price * Decimal::new(20, 2);
            (
                round_half_up(REFERENCE_PURCHASE / residual),
                round_half_up(down_payment / (residual * Decimal::from(12))),
            )
        } else {
            warn!(
                slug = %city.slug,
                residual = %residual,
                "residual is zero or negative; affordability metrics pinned to sentinel"
            );
            (AFFORDABILITY_SENTINEL, AFFORDABILITY_SENTINEL)
        };

        let hourly_rate = if input.salary > Decimal::ZERO {
            input.salary / Decimal::from(2080)
        } else {
            Decimal::ZERO
        };

        Ok(LocationBreakdown {
            city: city.city.clone(),
            gross_salary: input.salary,
            tax,
            net_monthly,
            costs,
            local_tax_monthly: round_half_up(local_tax_annual / Decimal::from(12)),
            car_insurance_monthly: round_half_up(car_insurance_monthly),
            equity_annual: round_half_up(equity_annual),
            signing_bonus: round_half_up(input.signing_bonus),
            commute_minutes: input.commute_minutes,
            true_hourly_rate,
            residual,
            months_to_afford_reference,
            years_to_save_down_payment,
            lifestyle: self.lifestyle_metrics(residual, hourly_rate),
            benefit_estimate: self.benefit_estimate(input),
        })
    }

    /// Municipal income tax, annual. The central table's "nyc" alias wins,
    /// then the metrics table: an explicit "NYC" key first, then the
    /// longest city key contained in the slug.
    fn local_income_tax(
        &self,
        gross_salary: Decimal,
        slug: &str,
    ) -> Decimal {
        let slug = slug.to_lowercase();

        if slug.contains("new-york") {
            if let Some(rate) = self.tax_table.local_taxes.get("nyc") {
                return gross_salary * *rate;
            }
        }

        let Some(metrics) = self.metrics else {
            return Decimal::ZERO;
        };

        if slug.contains("new-york") {
            if let Some(rate) = metrics.local_income_taxes.get("NYC") {
                return gross_salary * *rate;
            }
        }

        let best_match = metrics
            .local_income_taxes
            .iter()
            .filter(|(key, _)| slug.contains(&key.to_lowercase()))
            .max_by_key(|(key, _)| key.len());

        match best_match {
            Some((_, rate)) => gross_salary * *rate,
            None => Decimal::ZERO,
        }
    }

    /// Monthly car insurance: state lookup, the metrics "default" entry,
    /// then the table default.
    fn car_insurance_monthly(
        &self,
        state: &str,
    ) -> Decimal {
        let table_default = self.tax_table.defaults.car_insurance_monthly;
        let Some(metrics) = self.metrics else {
            return table_default;
        };

        metrics
            .state_car_insurance_monthly
            .get(&state.to_uppercase())
            .or_else(|| metrics.state_car_insurance_monthly.get("default"))
            .copied()
            .unwrap_or(table_default)
    }

    fn lifestyle_metrics(
        &self,
        residual: Decimal,
        hourly_rate: Decimal,
    ) -> LifestyleMetrics {
        let freedom_hours = if hourly_rate > Decimal::ZERO {
            residual / hourly_rate
        } else {
            Decimal::ZERO
        };
        LifestyleMetrics {
            coffees: round_half_up(residual / Decimal::new(650, 2)),
            streaming_months: round_half_up(residual / Decimal::new(1599, 2)),
            delivery_orders: round_half_up(residual / Decimal::from(25)),
            weekend_getaways: round_half_up(residual / Decimal::from(300)),
            freedom_hours: round_half_up(freedom_hours),
            hourly_rate: round_half_up(hourly_rate),
        }
    }

    /// Annual value of a premium-benefit package against the market
    /// benchmarks, when both are present.
    fn benefit_estimate(
        &self,
        input: &AnalysisInput,
    ) -> Option<Decimal> {
        if !input.premium_benefits {
            return None;
        }
        let benchmarks = &self.metrics?.benchmarks;
        let match_value = input.salary * benchmarks.average_401k_match_rate;
        Some(round_half_up(max(
            match_value + benchmarks.average_employer_hsa,
            Decimal::ZERO,
        )))
    }
}
