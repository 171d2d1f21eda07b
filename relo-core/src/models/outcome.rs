use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Annual tax breakdown for one (salary, jurisdiction) pair. Built once
/// per evaluation and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxOutcome {
    /// Base salary plus RSU income.
    pub gross_income: Decimal,
    /// Income after pre-tax deductions, before the standard deduction.
    pub taxable_income: Decimal,
    pub pretax_retirement: Decimal,
    pub pretax_insurance: Decimal,
    /// Federal tax including the flat-rate RSU portion.
    pub federal_tax: Decimal,
    pub rsu_federal_tax: Decimal,
    pub state_tax: Decimal,
    pub payroll_tax: Decimal,
    pub total_tax: Decimal,
    pub net_income: Decimal,
    /// total_tax / gross_income as a fraction, 0 when gross is 0.
    pub effective_rate: Decimal,
}

/// Monthly housing and living costs for one (city, household) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostBreakdown {
    /// Rent, amortized ownership, or the token cost, per housing type.
    pub housing: Decimal,
    pub groceries: Decimal,
    pub transport: Decimal,
    pub utilities: Decimal,
    pub misc: Decimal,
    /// Sum of the living components; housing is tracked separately.
    pub living_total: Decimal,
    /// Whether the city record supplied its own component figures.
    pub itemized: bool,
}

/// What the monthly residual buys, in everyday units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifestyleMetrics {
    pub coffees: Decimal,
    pub streaming_months: Decimal,
    pub delivery_orders: Decimal,
    pub weekend_getaways: Decimal,
    pub freedom_hours: Decimal,
    pub hourly_rate: Decimal,
}

/// Full monthly cash position for one (salary, city) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationBreakdown {
    pub city: String,
    pub gross_salary: Decimal,
    pub tax: TaxOutcome,
    pub net_monthly: Decimal,
    pub costs: CostBreakdown,
    pub local_tax_monthly: Decimal,
    pub car_insurance_monthly: Decimal,
    pub equity_annual: Decimal,
    pub signing_bonus: Decimal,
    pub commute_minutes: Decimal,
    /// Gross salary spread over working hours plus commute hours.
    pub true_hourly_rate: Decimal,
    /// Net monthly plus side income minus housing, living, and leaks.
    /// Everything downstream classifies on this number.
    pub residual: Decimal,
    pub months_to_afford_reference: Decimal,
    pub years_to_save_down_payment: Decimal,
    pub lifestyle: LifestyleMetrics,
    /// Estimated annual employer-benefit value, when benchmarks exist.
    pub benefit_estimate: Option<Decimal>,
}
