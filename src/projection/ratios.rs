//! Per-year investment ratios derived from the statement rows
//!
//! A ratio whose denominator is exactly zero, or which needs a prior year that
//! does not exist (year 0), is reported as NaN. NaN serializes to JSON `null`,
//! so ratio output is write-only.

use serde::Serialize;

use super::statements::AnnualStatementRow;

/// Divide, yielding NaN for a zero denominator
pub fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        f64::NAN
    } else {
        numerator / denominator
    }
}

/// Derived metrics for one year
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RatioRow {
    pub year: u32,
    /// NOI over prior year-end asset value
    pub capitalization_rate: f64,
    /// Net income plus equity growth over prior year equity
    pub return_on_investment: f64,
    /// Pre-tax cash flow over initial equity
    pub cash_on_cash: f64,
    /// Asset value over annual rent
    pub gross_rent_multiplier: f64,
    pub loan_to_value: f64,
    /// Assets over equity
    pub leverage: f64,
    /// NOI over debt service
    pub debt_coverage: f64,
    /// Operating expenses over revenues
    pub operating_ratio: f64,
    /// Total expenses over revenues
    pub total_expense_ratio: f64,
}

impl RatioRow {
    pub fn from_rows(row: &AnnualStatementRow, prior: Option<&AnnualStatementRow>, initial_equity: f64) -> Self {
        let income = &row.income;
        let balance = &row.balance;

        let capitalization_rate = prior
            .map(|p| ratio(income.net_operating_income, p.balance.total_assets))
            .unwrap_or(f64::NAN);
        let return_on_investment = prior
            .map(|p| ratio(income.net_income + balance.equity, p.balance.equity) - 1.0)
            .unwrap_or(f64::NAN);

        Self {
            year: row.year,
            capitalization_rate,
            return_on_investment,
            cash_on_cash: ratio(row.cash_flow.pre_tax_cash_flow, initial_equity),
            gross_rent_multiplier: ratio(balance.total_assets, income.rents),
            loan_to_value: ratio(balance.total_debt, balance.total_assets),
            leverage: ratio(balance.total_assets, balance.equity),
            debt_coverage: ratio(income.net_operating_income, income.debt_service),
            operating_ratio: ratio(income.operating_expenses, income.total_revenues),
            total_expense_ratio: ratio(income.total_expenses, income.total_revenues),
        }
    }
}

/// Ratios for every statement row, in year order
pub fn ratio_table(rows: &[AnnualStatementRow], initial_equity: f64) -> Vec<RatioRow> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let prior = i.checked_sub(1).map(|p| &rows[p]);
            RatioRow::from_rows(row, prior, initial_equity)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::statements::{BalanceSheet, IncomeStatement};
    use approx::assert_relative_eq;

    fn row(year: u32, assets: f64, debt: f64, noi: f64, rents: f64) -> AnnualStatementRow {
        AnnualStatementRow {
            year,
            income: IncomeStatement {
                rents,
                total_revenues: rents,
                net_operating_income: noi,
                debt_service: if year == 0 { 0.0 } else { 48_000.0 },
                ..Default::default()
            },
            balance: BalanceSheet::new(assets, debt, 0.0, assets),
            ..Default::default()
        }
    }

    #[test]
    fn test_nan_sentinel_serializes_as_null() {
        let rows = [row(0, 1_020_000.0, 750_000.0, 0.0, 0.0)];
        let value = serde_json::to_value(ratio_table(&rows, 270_000.0)).unwrap();

        assert!(value[0]["capitalization_rate"].is_null());
        assert!(value[0]["gross_rent_multiplier"].is_null());
        assert!(value[0]["loan_to_value"].is_f64());
    }

    #[test]
    fn test_zero_denominator_is_nan() {
        assert!(ratio(1.0, 0.0).is_nan());
        assert_relative_eq!(ratio(1.0, 4.0), 0.25);
    }

    #[test]
    fn test_year_zero_sentinels() {
        let rows = [row(0, 1_020_000.0, 750_000.0, 0.0, 0.0), row(1, 1_030_000.0, 738_000.0, 27_000.0, 57_000.0)];
        let table = ratio_table(&rows, 270_000.0);

        assert!(table[0].capitalization_rate.is_nan());
        assert!(table[0].return_on_investment.is_nan());
        assert!(table[0].gross_rent_multiplier.is_nan());
        assert!(table[0].debt_coverage.is_nan());
        assert_relative_eq!(table[0].loan_to_value, 750_000.0 / 1_020_000.0);

        assert_relative_eq!(table[1].capitalization_rate, 27_000.0 / 1_020_000.0);
        assert_relative_eq!(table[1].gross_rent_multiplier, 1_030_000.0 / 57_000.0);
        assert_relative_eq!(table[1].leverage, 1_030_000.0 / 292_000.0);
        assert_relative_eq!(table[1].debt_coverage, 27_000.0 / 48_000.0);
    }
}
