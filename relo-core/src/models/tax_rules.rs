use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One marginal slice of a progressive schedule. `up_to` is the bracket
/// ceiling; `None` marks the open-ended final bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub up_to: Option<Decimal>,
    pub rate: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FederalTaxTable {
    pub brackets_single: Vec<TaxBracket>,
    pub brackets_married: Vec<TaxBracket>,
    pub standard_deduction_single: Decimal,
    pub standard_deduction_married: Decimal,
}

/// Per-state tax strategy. Dispatch is a plain `match`; adding a state is
/// a data edit, not a code edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StateTaxRule {
    NoTax,
    Flat {
        rate: Decimal,
    },
    /// A named bracket ladder with an unconditional local add-on rate,
    /// e.g. the NYC resident surtax stacked on the New York schedule.
    Progressive {
        brackets: Vec<TaxBracket>,
        #[serde(default)]
        surtax: Option<Decimal>,
    },
    /// Generic schedule. Married filers fall back to the single table
    /// when no married table is defined.
    BracketTable {
        brackets: Vec<TaxBracket>,
        #[serde(default)]
        brackets_married: Option<Vec<TaxBracket>>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollTaxRule {
    pub social_security_rate: Decimal,
    pub social_security_cap: Decimal,
    pub medicare_rate: Decimal,
    pub additional_medicare_rate: Decimal,
    pub additional_medicare_threshold: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxDefaults {
    pub retirement_rate: Decimal,
    pub retirement_cap: Decimal,
    pub monthly_insurance: Decimal,
    pub rsu_supplemental_rate: Decimal,
    pub car_insurance_monthly: Decimal,
    pub state_fallback_rate: Decimal,
}

/// The jurisdiction reference table: one federal schedule, per-state
/// strategies keyed by uppercase state code, payroll constants, municipal
/// rates, and the default figures used when an input or a jurisdiction is
/// missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxTable {
    pub federal: FederalTaxTable,
    pub states: HashMap<String, StateTaxRule>,
    pub payroll: PayrollTaxRule,
    /// Municipal income tax rates keyed by lowercase alias (e.g. "nyc").
    #[serde(default)]
    pub local_taxes: HashMap<String, Decimal>,
    pub defaults: TaxDefaults,
}
