//! Calculation modules for relocation decisions.
//!
//! This module provides the financial pipeline behind a comparison:
//! tax waterfall, cost-of-living allocation, single-location analysis,
//! two-location comparison, and the copy generated from a verdict.

pub mod advice;
pub mod analysis;
pub mod common;
pub mod comparison;
pub mod cost;
pub mod tax;

pub use analysis::{AnalysisError, AnalysisInput, LocationAnalyzer};
pub use comparison::{
    classify_verdict, ComparisonEngine, ComparisonError, ComparisonRequest,
};
pub use cost::{CostAllocator, CostAllocatorError, CostConfig};
pub use tax::{TaxCalculator, TaxCalculatorError, TaxInput};
