//! Complete projection output

use serde::{Deserialize, Serialize};

use crate::amortization::AnnualLoanSummary;
use super::disposal::DisposalResult;
use super::investor::InvestorGrowthRow;
use super::ratios::RatioRow;
use super::statements::AnnualStatementRow;

/// Cash-flow vectors the IRRs were solved on, index 0 = acquisition
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReturnVectors {
    pub before_tax: Vec<f64>,
    pub after_tax: Vec<f64>,
    pub income_before_tax: Vec<f64>,
    pub income_after_tax: Vec<f64>,
    pub capital_appreciation_before_tax: Vec<f64>,
    pub capital_appreciation_after_tax: Vec<f64>,
}

/// Everything produced by one projection run
#[derive(Debug, Clone, Serialize)]
pub struct ProjectionResult {
    /// Holding period actually projected
    pub years: u32,

    /// Statement rows for years 0..=years
    pub statements: Vec<AnnualStatementRow>,

    /// Loan activity for years 1..=years
    pub loan_years: Vec<AnnualLoanSummary>,

    pub disposal: DisposalResult,

    /// Ratios for years 0..=years
    pub ratios: Vec<RatioRow>,

    pub investor_growth: Vec<InvestorGrowthRow>,

    pub return_vectors: ReturnVectors,
}

impl ProjectionResult {
    /// Statement row for a given year
    pub fn year(&self, year: u32) -> Option<&AnnualStatementRow> {
        self.statements.get(year as usize)
    }

    /// Get summary statistics
    pub fn summary(&self) -> ProjectionSummary {
        let d = &self.disposal;
        ProjectionSummary {
            years: self.years,
            initial_equity: self.statements.first().map(|r| r.balance.equity).unwrap_or(0.0),
            final_equity: self.statements.last().map(|r| r.balance.equity).unwrap_or(0.0),
            net_sale_after_tax: d.sale.net_sale_after_tax,
            total_gain_before_tax: d.total_gain_before_tax,
            total_gain_after_tax: d.total_gain_after_tax,
            irr_before_tax: d.irr_before_tax,
            irr_after_tax: d.irr_after_tax,
        }
    }
}

/// Headline figures for a projection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSummary {
    pub years: u32,
    pub initial_equity: f64,
    pub final_equity: f64,
    pub net_sale_after_tax: f64,
    pub total_gain_before_tax: f64,
    pub total_gain_after_tax: f64,
    pub irr_before_tax: f64,
    pub irr_after_tax: f64,
}
