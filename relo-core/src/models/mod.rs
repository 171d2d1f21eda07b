mod city;
mod filing_status;
mod metrics;
mod outcome;
mod tax_rules;
mod verdict;

pub use city::{CityCostRecord, HouseholdType, HousingType, ItemizedCosts};
pub use filing_status::FilingStatus;
pub use metrics::{Benchmarks, MarketMetrics, MetricsMetadata};
pub use outcome::{CostBreakdown, LifestyleMetrics, LocationBreakdown, TaxOutcome};
pub use tax_rules::{
    FederalTaxTable, PayrollTaxRule, StateTaxRule, TaxBracket, TaxDefaults, TaxTable,
};
pub use verdict::{ComparisonResult, Verdict};
