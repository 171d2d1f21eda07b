//! Progressive tax calculation for a single (salary, jurisdiction) pair.
//!
//! This module implements the full gross-to-net waterfall: pre-tax
//! deductions, payroll (FICA) tax, federal tax with a flat supplemental
//! rate on RSU income, and per-state tax dispatched on the jurisdiction's
//! strategy.
//!
//! # Waterfall Structure
//!
//! | Step | Description |
//! |------|-------------|
//! | A    | Resolve defaults; retirement contribution on base salary, capped |
//! | B    | Payroll tax on gross − insurance + RSU (RSU is never deferred) |
//! | C    | Federal tax on income after deductions minus the standard deduction, plus RSU × supplemental rate |
//! | D    | State tax on income after deductions plus RSU, per jurisdiction strategy |
//! | E    | Net income (floored at 0) and effective rate (fraction of gross) |
//!
//! The figures here are a documented approximation: internally consistent,
//! not a filing-grade tax computation.
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//!
//! use rust_decimal_macros::dec;
//! use relo_core::calculations::{TaxCalculator, TaxInput};
//! use relo_core::models::{
//!     FederalTaxTable, FilingStatus, PayrollTaxRule, StateTaxRule, TaxBracket, TaxDefaults,
//!     TaxTable,
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
//!
//! let input = TaxInput {
//!     gross_income: dec!(100000),
//!     state_code: "TX".to_string(),
//!     filing_status: FilingStatus::Single,
//!     retirement_rate: None,
//!     monthly_insurance: None,
//!     annual_pretax_deductions: dec!(0),
//!     rsu_annual: dec!(0),
//! };
//!
//! let calculator = TaxCalculator::new(&table);
//! let outcome = calculator.calculate(&input).unwrap();
//!
//! assert_eq!(outcome.federal_tax, dec!(14640.00));
//! assert_eq!(outcome.payroll_tax, dec!(7512.30));
//! assert_eq!(outcome.state_tax, dec!(0.00));
//! assert_eq!(outcome.net_income, dec!(71047.70));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::calculations::common::{max, round_half_up};
use crate::models::{FilingStatus, StateTaxRule, TaxBracket, TaxOutcome, TaxTable};

/// Errors that can occur during tax calculation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaxCalculatorError {
    /// The federal schedule has no brackets for the requested filing status.
    #[error("no federal tax brackets defined for filing status {0}")]
    MissingFederalBrackets(&'static str),
}

/// Input values for one tax evaluation.
///
/// Optional fields fall back to the figures in [`crate::models::TaxDefaults`].
/// Inputs are assumed pre-validated by the caller: salary and deduction
/// amounts non-negative, rates within [0, 1].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxInput {
    /// Annual base salary, excluding RSU income.
    pub gross_income: Decimal,

    /// Jurisdiction code (e.g. "CA", "TX"). Matched case-insensitively;
    /// unknown codes fall back to the default flat rate.
    pub state_code: String,

    pub filing_status: FilingStatus,

    /// Fraction of base salary deferred into a retirement account.
    /// `None` uses the table default. The contribution is capped at the
    /// table's annual limit and computed on base salary only.
    pub retirement_rate: Option<Decimal>,

    /// Monthly pre-tax insurance premium. `None` uses the table default.
    pub monthly_insurance: Option<Decimal>,

    /// Other annual pre-tax deductions (e.g. dependent-care accounts).
    pub annual_pretax_deductions: Decimal,

    /// Annual RSU income. Payroll-taxed and federal-taxed at the flat
    /// supplemental rate, never deferred into retirement.
    pub rsu_annual: Decimal,
}

/// Calculator for the gross-to-net waterfall.
///
/// Borrows the jurisdiction reference table; one instance serves any
/// number of evaluations.
#[derive(Debug, Clone)]
pub struct TaxCalculator<'a> {
    table: &'a TaxTable,
}

impl<'a> TaxCalculator<'a> {
    pub fn new(table: &'a TaxTable) -> Self {
        Self { table }
    }

    /// Runs the full waterfall for one input.
    ///
    /// # Errors
    ///
    /// Returns [`TaxCalculatorError`] if the federal schedule has no
    /// brackets for the input's filing status.
    pub fn calculate(
        &self,
        input: &TaxInput,
    ) -> Result<TaxOutcome, TaxCalculatorError> {
        let defaults = &self.table.defaults;

        // Step A: resolve defaults and pre-tax deductions
        let retirement_rate = input.retirement_rate.unwrap_or(defaults.retirement_rate);
        let annual_insurance = input
            .monthly_insurance
            .unwrap_or(defaults.monthly_insurance)
            * Decimal::from(12);
        let pretax_retirement =
            (input.gross_income * retirement_rate).min(defaults.retirement_cap);

        let income_after_deductions = max(
            input.gross_income - annual_insurance - pretax_retirement
                - input.annual_pretax_deductions,
            Decimal::ZERO,
        );

        // Step B: payroll tax on gross minus insurance, plus RSU
        let fica_base = input.gross_income - annual_insurance + input.rsu_annual;
        let payroll_tax = self.payroll_tax(fica_base);

        // Step C: federal tax
        let brackets = self.federal_brackets(input.filing_status)?;
        let federal_taxable =
            max(income_after_deductions - self.standard_deduction(input.filing_status), Decimal::ZERO);
        let federal_on_salary = round_half_up(self.bracket_tax(federal_taxable, brackets));
        let rsu_federal_tax = round_half_up(input.rsu_annual * defaults.rsu_supplemental_rate);
        let federal_tax = round_half_up(federal_on_salary + rsu_federal_tax);

        // Step D: state tax on the post-deduction income plus RSU
        let state_taxable = income_after_deductions + input.rsu_annual;
        let state_tax = self.state_tax(state_taxable, &input.state_code, input.filing_status);

        // Step E: net income and effective rate
        let total_tax = round_half_up(federal_tax + state_tax + payroll_tax);
        let gross_income = input.gross_income + input.rsu_annual;
        let net_income = max(
            round_half_up(
                gross_income
                    - annual_insurance
                    - pretax_retirement
                    - input.annual_pretax_deductions
                    - total_tax,
            ),
            Decimal::ZERO,
        );
        let effective_rate = if gross_income > Decimal::ZERO {
            total_tax / gross_income
        } else {
            Decimal::ZERO
        };

        Ok(TaxOutcome {
            gross_income,
            taxable_income: round_half_up(income_after_deductions),
            pretax_retirement: round_half_up(pretax_retirement),
            pretax_insurance: round_half_up(annual_insurance),
            federal_tax,
            rsu_federal_tax,
            state_tax,
            payroll_tax,
            total_tax,
            net_income,
            effective_rate,
        })
    }

    fn federal_brackets(
        &self,
        filing_status: FilingStatus,
    ) -> Result<&[TaxBracket], TaxCalculatorError> {
        let brackets = match filing_status {
            FilingStatus::Single => &self.table.federal.brackets_single,
            FilingStatus::Married => &self.table.federal.brackets_married,
        };
        if brackets.is_empty() {
            return Err(TaxCalculatorError::MissingFederalBrackets(
                filing_status.as_str(),
            ));
        }
        Ok(brackets)
    }

    fn standard_deduction(
        &self,
        filing_status: FilingStatus,
    ) -> Decimal {
        match filing_status {
            FilingStatus::Single => self.table.federal.standard_deduction_single,
            FilingStatus::Married => self.table.federal.standard_deduction_married,
        }
    }

    /// Walks a marginal bracket schedule bottom-up.
    ///
    /// Each bracket taxes only the income slice between the previous
    /// ceiling and its own; the open-ended final bracket taxes everything
    /// above the last ceiling. Intermediate slices are left unrounded.
    fn bracket_tax(
        &self,
        taxable_income: Decimal,
        brackets: &[TaxBracket],
    ) -> Decimal {
        if taxable_income <= Decimal::ZERO {
            return Decimal::ZERO;
        }

        let mut tax = Decimal::ZERO;
        let mut previous_ceiling = Decimal::ZERO;

        for bracket in brackets {
            match bracket.up_to {
                Some(ceiling) => {
                    if taxable_income <= ceiling {
                        tax += (taxable_income - previous_ceiling) * bracket.rate;
                        return tax;
                    }
                    tax += (ceiling - previous_ceiling) * bracket.rate;
                    previous_ceiling = ceiling;
                }
                None => {
                    tax += (taxable_income - previous_ceiling) * bracket.rate;
                    return tax;
                }
            }
        }

        tax
    }

    /// Dispatches on the jurisdiction's strategy. Unknown codes apply the
    /// configured fallback rate rather than failing.
    fn state_tax(
        &self,
        taxable_income: Decimal,
        state_code: &str,
        filing_status: FilingStatus,
    ) -> Decimal {
        let code = state_code.to_uppercase();
        let Some(rule) = self.table.states.get(&code) else {
            warn!(
                state = %code,
                fallback_rate = %self.table.defaults.state_fallback_rate,
                "jurisdiction not in tax table; applying flat fallback rate"
            );
            return round_half_up(
                max(taxable_income, Decimal::ZERO) * self.table.defaults.state_fallback_rate,
            );
        };

        let tax = match rule {
            StateTaxRule::NoTax => Decimal::ZERO,
            StateTaxRule::Flat { rate } => max(taxable_income, Decimal::ZERO) * *rate,
            StateTaxRule::Progressive { brackets, surtax } => {
                let mut tax = self.bracket_tax(taxable_income, brackets);
                if let Some(surtax) = surtax {
                    tax += max(taxable_income, Decimal::ZERO) * *surtax;
                }
                tax
            }
            StateTaxRule::BracketTable {
                brackets,
                brackets_married,
            } => {
                let schedule = match (filing_status, brackets_married) {
                    (FilingStatus::Married, Some(married)) if !married.is_empty() => married,
                    _ => brackets,
                };
                self.bracket_tax(taxable_income, schedule)
            }
        };

        round_half_up(tax)
    }

    /// Payroll tax: capped social security, uncapped Medicare, and the
    /// additional Medicare rate on the excess over the threshold.
    fn payroll_tax(
        &self,
        fica_base: Decimal,
    ) -> Decimal {
        let payroll = &self.table.payroll;

        if fica_base <= Decimal::ZERO {
            warn!(
                fica_base = %fica_base,
                "payroll taxable base is zero or negative; no payroll tax applies"
            );
            return Decimal::ZERO;
        }

        let social_security =
            fica_base.min(payroll.social_security_cap) * payroll.social_security_rate;
        let medicare = fica_base * payroll.medicare_rate;
        let additional_medicare = max(
            fica_base - payroll.additional_medicare_threshold,
            Decimal::ZERO,
        ) * payroll.additional_medicare_rate;

        round_half_up(social_security + medicare + additional_medicare)
    }
}
