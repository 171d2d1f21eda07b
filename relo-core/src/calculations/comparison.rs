//! Two-location comparison: origin position versus destination offer.
//!
//! Runs the single-location analysis twice and classifies the residual
//! change. The origin is analyzed with neutral extras (car owner, on
//! site, no bonus or equity or side income) so the verdict measures the
//! offer itself, not lifestyle changes the move would also bring. The
//! shared household, filing, and deduction inputs go to both runs.
//!
//! | Output            | Derivation                                          |
//! |-------------------|-----------------------------------------------------|
//! | delta percent     | residual change relative to the origin residual     |
//! | verdict           | threshold ladder over the delta, top down           |
//! | break-even salary | destination gross that would match the origin       |
//! | wealth projection | each residual invested for ten years at 7%          |
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//!
//! use rust_decimal_macros::dec;
//! use relo_core::calculations::{ComparisonEngine, ComparisonRequest, CostConfig};
//! use relo_core::models::{
//!     CityCostRecord, FederalTaxTable, HouseholdType, HousingType, PayrollTaxRule,
//!     StateTaxRule, TaxBracket, TaxDefaults, TaxTable, Verdict,
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
//! let austin = CityCostRecord {
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
//! let engine = ComparisonEngine::new(&table, None, CostConfig::default());
//! let request = ComparisonRequest::new(
//!     dec!(100000),
//!     dec!(110000),
//!     HouseholdType::Single,
//!     HousingType::Rent,
//! );
//! let result = engine.compare(&austin, &austin, &request).unwrap();
//!
//! assert_eq!(result.verdict, Verdict::Go);
//! assert_eq!(result.break_even_salary, dec!(101200));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::calculations::advice;
use crate::calculations::analysis::{AnalysisError, AnalysisInput, LocationAnalyzer};
use crate::calculations::common::{compound_growth_factor, round_half_up, round_to_hundred};
use crate::calculations::cost::CostConfig;
use crate::models::{
    CityCostRecord, ComparisonResult, FilingStatus, HouseholdType, HousingType, MarketMetrics,
    TaxTable, Verdict,
};

const GO_THRESHOLD: Decimal = Decimal::from_parts(10, 0, 0, false, 0);
const NO_GO_THRESHOLD: Decimal = Decimal::from_parts(10, 0, 0, true, 0);

/// Horizon of the wealth projection.
const PROJECTION_MONTHS: u32 = 120;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ComparisonError {
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

/// Inputs for a two-location comparison.
///
/// Household, filing, and deduction fields apply to both runs. The
/// offer fields (side income, remote work, bonus, equity, commute) only
/// describe the destination; the origin is always analyzed neutrally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonRequest {
    pub origin_salary: Decimal,
    pub destination_salary: Decimal,
    pub household: HouseholdType,
    pub housing: HousingType,
    pub filing_status: Option<FilingStatus>,
    pub retirement_rate: Option<Decimal>,
    pub monthly_insurance: Option<Decimal>,
    pub annual_pretax_deductions: Decimal,
    pub monthly_debt: Decimal,

    pub monthly_side_income: Decimal,
    pub extra_monthly_leaks: Decimal,
    pub is_remote: bool,
    pub owns_car: bool,
    pub signing_bonus: Decimal,
    pub equity_annual: Decimal,
    pub equity_multiplier: Decimal,
    pub commute_minutes: Decimal,
    pub rsu_annual: Decimal,
    pub premium_benefits: bool,
}

impl ComparisonRequest {
    /// A plain salary-for-salary comparison with no offer extras.
    pub fn new(
        origin_salary: Decimal,
        destination_salary: Decimal,
        household: HouseholdType,
        housing: HousingType,
    ) -> Self {
        Self {
            origin_salary,
            destination_salary,
            household,
            housing,
            filing_status: None,
            retirement_rate: None,
            monthly_insurance: None,
            annual_pretax_deductions: Decimal::ZERO,
            monthly_debt: Decimal::ZERO,
            monthly_side_income: Decimal::ZERO,
            extra_monthly_leaks: Decimal::ZERO,
            is_remote: false,
            owns_car: true,
            signing_bonus: Decimal::ZERO,
            equity_annual: Decimal::ZERO,
            equity_multiplier: Decimal::ONE,
            commute_minutes: Decimal::ZERO,
            rsu_annual: Decimal::ZERO,
            premium_benefits: false,
        }
    }

    fn origin_input(&self) -> AnalysisInput {
        AnalysisInput {
            filing_status: self.filing_status,
            retirement_rate: self.retirement_rate,
            monthly_insurance: self.monthly_insurance,
            annual_pretax_deductions: self.annual_pretax_deductions,
            monthly_debt: self.monthly_debt,
            ..AnalysisInput::new(self.origin_salary, self.household, self.housing)
        }
    }

    fn destination_input(&self) -> AnalysisInput {
        AnalysisInput {
            filing_status: self.filing_status,
            retirement_rate: self.retirement_rate,
            monthly_insurance: self.monthly_insurance,
            annual_pretax_deductions: self.annual_pretax_deductions,
            monthly_debt: self.monthly_debt,
            monthly_side_income: self.monthly_side_income,
            extra_monthly_leaks: self.extra_monthly_leaks,
            is_remote: self.is_remote,
            owns_car: self.owns_car,
            signing_bonus: self.signing_bonus,
            equity_annual: self.equity_annual,
            equity_multiplier: self.equity_multiplier,
            commute_minutes: self.commute_minutes,
            rsu_annual: self.rsu_annual,
            premium_benefits: self.premium_benefits,
            ..AnalysisInput::new(self.destination_salary, self.household, self.housing)
        }
    }
}

/// Engine for origin-versus-destination comparisons.
#[derive(Debug, Clone)]
pub struct ComparisonEngine<'a> {
    tax_table: &'a TaxTable,
    metrics: Option<&'a MarketMetrics>,
    cost_config: CostConfig,
}

impl<'a> ComparisonEngine<'a> {
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

    /// Compares the origin position against the destination offer.
    ///
    /// # Errors
    ///
    /// Returns [`ComparisonError`] when either analysis rejects its
    /// inputs.
    pub fn compare(
        &self,
        origin_city: &CityCostRecord,
        destination_city: &CityCostRecord,
        request: &ComparisonRequest,
    ) -> Result<ComparisonResult, ComparisonError> {
        let analyzer =
            LocationAnalyzer::new(self.tax_table, self.metrics, self.cost_config.clone());
        let origin = analyzer.analyze(origin_city, &request.origin_input())?;
        let destination = analyzer.analyze(destination_city, &request.destination_input())?;

        let delta = delta_percent(origin.residual, destination.residual);
        let verdict = classify_verdict(delta);

        // Residual dollars divide by the retention rate to become gross
        // salary dollars.
        let residual_gap_annual = (origin.residual - destination.residual) * Decimal::from(12);
        let retention = Decimal::ONE - destination.tax.effective_rate;
        let (parity_gap_gross, break_even_salary) = if retention > Decimal::ZERO {
            let gap = residual_gap_annual / retention;
            (gap, round_to_hundred(request.destination_salary + gap))
        } else {
            warn!(
                effective_rate = %destination.tax.effective_rate,
                "destination keeps nothing of a raise; break-even pinned to the offer salary"
            );
            (residual_gap_annual, request.destination_salary)
        };

        // 7% nominal annual return, compounded monthly.
        let growth = compound_growth_factor(Decimal::new(7, 2) / Decimal::from(12), PROJECTION_MONTHS);
        let monthly_gain = destination.residual - origin.residual;

        let verdict_message = advice::verdict_message(verdict, delta, &destination.city);
        let negotiation_lever = advice::negotiation_lever(parity_gap_gross);
        let monthly_gain_message = advice::monthly_gain_message(monthly_gain);

        Ok(ComparisonResult {
            delta_percent: delta,
            verdict,
            break_even_salary,
            wealth_ten_year_origin: round_half_up(origin.residual * growth),
            wealth_ten_year_destination: round_half_up(destination.residual * growth),
            wealth_gap: round_half_up(monthly_gain * growth),
            verdict_message,
            negotiation_lever,
            monthly_gain: monthly_gain_message,
            origin,
            destination,
        })
    }
}

/// Classifies a residual delta percent on the fixed threshold ladder.
///
/// Boundaries are inclusive top-down: exactly +10 is a Go, exactly 0 is
/// Conditional, exactly -10 is a NoGo.
pub fn classify_verdict(delta_percent: Decimal) -> Verdict {
    if delta_percent >= GO_THRESHOLD {
        Verdict::Go
    } else if delta_percent >= Decimal::ZERO {
        Verdict::Conditional
    } else if delta_percent > NO_GO_THRESHOLD {
        Verdict::Warning
    } else {
        Verdict::NoGo
    }
}

/// Residual change as a percent of the origin residual.
///
/// A zero origin residual pins the result to 0 or +-100 so a move out
/// of a break-even position still classifies.
fn delta_percent(
    origin_residual: Decimal,
    destination_residual: Decimal,
) -> Decimal {
    if origin_residual.is_zero() {
        return if destination_residual.is_zero() {
            Decimal::ZERO
        } else if destination_residual > Decimal::ZERO {
            Decimal::ONE_HUNDRED
        } else {
            -Decimal::ONE_HUNDRED
        };
    }
    (destination_residual - origin_residual) / origin_residual.abs() * Decimal::ONE_HUNDRED
}
