//! Growth of a $10,000 equity stake over the holding period

use serde::Serialize;

use super::ratios::ratio;
use super::statements::AnnualStatementRow;

/// Notional stake tracked through the projection
pub const NOTIONAL_STAKE: f64 = 10_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InvestorGrowthRow {
    pub year: u32,
    /// Stake scaled by equity growth
    pub principal: f64,
    /// Stake's share of the year's pre-tax cash flow
    pub income: f64,
    pub total: f64,
}

/// Scale each year's equity and cash flow to a $10,000 initial stake
pub fn investor_growth(rows: &[AnnualStatementRow]) -> Vec<InvestorGrowthRow> {
    let Some(opening) = rows.first() else {
        return Vec::new();
    };
    let initial_equity = opening.balance.equity;

    rows.iter()
        .map(|row| {
            let (principal, income) = if row.year == 0 {
                (NOTIONAL_STAKE, 0.0)
            } else {
                (
                    NOTIONAL_STAKE * ratio(row.balance.equity, initial_equity),
                    NOTIONAL_STAKE * ratio(row.cash_flow.pre_tax_cash_flow, initial_equity),
                )
            };
            InvestorGrowthRow {
                year: row.year,
                principal,
                income,
                total: principal + income,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::statements::{BalanceSheet, CashFlowStatement};
    use approx::assert_relative_eq;

    #[test]
    fn test_growth_scales_to_stake() {
        let rows = [
            AnnualStatementRow {
                year: 0,
                balance: BalanceSheet::new(1_000_000.0, 800_000.0, 0.0, 1_000_000.0),
                ..Default::default()
            },
            AnnualStatementRow {
                year: 1,
                balance: BalanceSheet::new(1_030_000.0, 790_000.0, 0.0, 1_000_000.0),
                cash_flow: CashFlowStatement {
                    pre_tax_cash_flow: 4_000.0,
                    ..Default::default()
                },
                ..Default::default()
            },
        ];

        let growth = investor_growth(&rows);
        assert_eq!(growth[0].total, NOTIONAL_STAKE);
        assert_relative_eq!(growth[1].principal, 12_000.0);
        assert_relative_eq!(growth[1].income, 200.0);
        assert_relative_eq!(growth[1].total, 12_200.0);
    }
}
