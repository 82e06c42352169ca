//! Annual statements, disposal and return metrics for a held property

mod engine;
mod statements;
mod disposal;
mod ratios;
mod investor;
mod result;
pub mod irr;

pub use engine::{ProjectionEngine, ProjectionConfig, DEFAULT_PROJECTION_YEARS};
pub use statements::{AnnualStatementRow, BalanceSheet, CashFlowStatement, IncomeStatement};
pub use disposal::{sale_outcome, DisposalResult, SaleOutcome, SaleTerms};
pub use ratios::{ratio, ratio_table, RatioRow};
pub use investor::{investor_growth, InvestorGrowthRow, NOTIONAL_STAKE};
pub use result::{ProjectionResult, ProjectionSummary, ReturnVectors};
