//! Core projection engine for annual pro-forma statements, disposal and returns

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::amortization::{amortize, AmortizationSchedule, AnnualLoanSummary};
use crate::assumptions::ProjectionAssumptions;
use crate::error::Result;
use crate::rounding::round_whole;
use super::disposal::{sale_outcome, DisposalResult, SaleOutcome, SaleTerms};
use super::investor::investor_growth;
use super::irr::solve_irr;
use super::ratios::{ratio, ratio_table};
use super::result::{ProjectionResult, ReturnVectors};
use super::statements::{AnnualStatementRow, BalanceSheet, CashFlowStatement, IncomeStatement};

/// Holding period used when the requested one is not positive
pub const DEFAULT_PROJECTION_YEARS: u32 = 5;

/// Configuration for a projection run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionConfig {
    /// Holding period in years; the property is sold at the end of the last year
    pub years: i32,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            years: DEFAULT_PROJECTION_YEARS as i32,
        }
    }
}

impl ProjectionConfig {
    pub fn with_years(years: i32) -> Self {
        Self { years }
    }

    /// Holding period to project, falling back to the default for
    /// non-positive requests
    pub fn horizon(&self) -> u32 {
        if self.years > 0 {
            self.years as u32
        } else {
            warn!(
                "Invalid number of years of projection {}, {} years assumed",
                self.years, DEFAULT_PROJECTION_YEARS
            );
            DEFAULT_PROJECTION_YEARS
        }
    }
}

/// Main projection engine
#[derive(Debug, Clone)]
pub struct ProjectionEngine {
    assumptions: ProjectionAssumptions,
    config: ProjectionConfig,
}

impl ProjectionEngine {
    /// Create a new projection engine with given assumptions and config
    pub fn new(assumptions: ProjectionAssumptions, config: ProjectionConfig) -> Self {
        Self { assumptions, config }
    }

    pub fn assumptions(&self) -> &ProjectionAssumptions {
        &self.assumptions
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Run the projection: amortize, build statements, sell, solve returns
    pub fn project(&self) -> Result<ProjectionResult> {
        let years = self.config.horizon();
        let a = &self.assumptions;

        let schedule = amortize(&a.loan.terms()?)?;
        let loan_years = Self::loan_years(&schedule, years);

        // Each year depends on the prior year's cumulative depreciation
        let statements = loan_years.iter().fold(vec![self.opening_row()], |mut rows, loan| {
            let prior = rows[rows.len() - 1];
            rows.push(self.operating_row(loan, &prior));
            rows
        });

        let opening = &statements[0];
        let terminal = &statements[statements.len() - 1];

        let sale = sale_outcome(
            &SaleTerms {
                gross_sale: terminal.balance.total_assets,
                commission_rate: a.disposal.selling_commission,
                tax_basis: terminal.balance.tax_basis,
                cumulative_depreciation: terminal.balance.cumulative_depreciation,
                initial_asset_value: opening.balance.total_assets,
            },
            &a.tax,
        );

        let initial_equity = a.initial_equity();
        let loan_payoff = terminal.balance.total_debt;
        let vectors = Self::return_vectors(&statements, &sale, initial_equity, loan_payoff);

        let operating = &statements[1..];
        let net_income: f64 = operating.iter().map(|r| r.income.net_income).sum();
        let income_tax: f64 = operating.iter().map(|r| r.income.income_tax).sum();
        let total_gain_before_tax = net_income + sale.realized_gain;
        let total_gain_after_tax =
            net_income - income_tax + sale.realized_gain - sale.total_disposition_tax;

        let disposal = DisposalResult {
            years,
            sale,
            loan_payoff,
            total_gain_before_tax,
            total_gain_after_tax,
            total_return_before_tax: ratio(total_gain_before_tax, initial_equity),
            total_return_after_tax: ratio(total_gain_after_tax, initial_equity),
            irr_before_tax: solve_irr(&vectors.before_tax, "before-tax")?,
            irr_after_tax: solve_irr(&vectors.after_tax, "after-tax")?,
            income_irr_before_tax: optional_irr(&vectors.income_before_tax, "before-tax income"),
            income_irr_after_tax: optional_irr(&vectors.income_after_tax, "after-tax income"),
            capital_appreciation_irr_before_tax: optional_irr(
                &vectors.capital_appreciation_before_tax,
                "before-tax capital appreciation",
            ),
            capital_appreciation_irr_after_tax: optional_irr(
                &vectors.capital_appreciation_after_tax,
                "after-tax capital appreciation",
            ),
            capital_gains_tax_rate: a.tax.capital_gains_tax,
            income_tax_rate: a.tax.income_tax,
            recapture_tax_rate: a.tax.recapture_tax,
        };

        debug!(
            "Projected {} years: IRR before tax {:.4}, after tax {:.4}",
            years, disposal.irr_before_tax, disposal.irr_after_tax
        );

        Ok(ProjectionResult {
            years,
            ratios: ratio_table(&statements, initial_equity),
            investor_growth: investor_growth(&statements),
            statements,
            loan_years,
            disposal,
            return_vectors: vectors,
        })
    }

    /// Annual loan activity for years 1..=years; years past the amortization
    /// term carry no debt service and no balance
    fn loan_years(schedule: &AmortizationSchedule, years: u32) -> Vec<AnnualLoanSummary> {
        let annual = schedule.annual_summary();
        (1..=years)
            .map(|year| {
                annual.get(year as usize - 1).copied().unwrap_or(AnnualLoanSummary {
                    year,
                    ..Default::default()
                })
            })
            .collect()
    }

    /// Year 0: the property is bought, nothing is operated yet
    fn opening_row(&self) -> AnnualStatementRow {
        let a = &self.assumptions;
        let cost = a.acquisition_cost();

        AnnualStatementRow {
            year: 0,
            income: IncomeStatement::default(),
            balance: BalanceSheet::new(cost, a.loan.amount, 0.0, cost),
            cash_flow: CashFlowStatement::acquisition(cost, a.loan.amount),
        }
    }

    /// Straight-line depreciation, stopping once the building is fully depreciated
    fn depreciation(&self, cumulative_so_far: f64) -> f64 {
        let a = &self.assumptions;
        let depreciable = (a.acquisition_cost() - a.tax.land_value).max(0.0);
        let annual = round_whole(depreciable / a.tax.asset_class.recovery_years());
        annual.min(depreciable - cumulative_so_far).max(0.0)
    }

    fn operating_row(&self, loan: &AnnualLoanSummary, prior: &AnnualStatementRow) -> AnnualStatementRow {
        let a = &self.assumptions;
        let year = loan.year;
        // Operating lines grow from year 1; the asset appreciates from year 0
        let grown = |amount: f64, inflation: f64| round_whole(amount * (1.0 + inflation).powi(year as i32 - 1));

        let rents = grown(a.income.base_annual_rent(), a.income.rent_inflation);
        let op = &a.operating;

        let income = IncomeStatement {
            rents,
            other_income: grown(a.income.other_income, a.income.rent_inflation),
            management_fees: round_whole(op.management_fee * rents),
            fixed_fees: round_whole(op.fixed_fees),
            turnover_costs: round_whole(op.turnover_cost),
            insurance: grown(op.insurance, op.insurance_inflation),
            utilities: grown(op.utilities, op.utility_inflation),
            maintenance: grown(op.maintenance, op.maintenance_inflation),
            advertising: round_whole(op.advertising),
            administrative: round_whole(op.administrative),
            property_taxes: grown(a.tax.property_tax, a.tax.property_tax_inflation),
            interest: round_whole(loan.interest),
            principal_repayments: round_whole(loan.principal),
            depreciation: self.depreciation(prior.balance.cumulative_depreciation),
            ..Default::default()
        }
        .with_totals(a.tax.income_tax);

        let cumulative_depreciation = prior.balance.cumulative_depreciation + income.depreciation;
        let asset_value = round_whole(a.purchase.price * (1.0 + a.disposal.appreciation).powi(year as i32));

        AnnualStatementRow {
            year,
            income,
            balance: BalanceSheet::new(
                asset_value,
                round_whole(loan.ending_balance),
                cumulative_depreciation,
                a.acquisition_cost() - cumulative_depreciation,
            ),
            cash_flow: CashFlowStatement::operating_year(&income),
        }
    }

    fn return_vectors(
        statements: &[AnnualStatementRow],
        sale: &SaleOutcome,
        initial_equity: f64,
        loan_payoff: f64,
    ) -> ReturnVectors {
        let operating = &statements[1..];
        let sale_equity = sale.net_sale_before_tax - loan_payoff;
        let sale_equity_after_tax = sale_equity - sale.total_disposition_tax;

        ReturnVectors {
            before_tax: cash_vector(initial_equity, operating, |r| r.cash_flow.pre_tax_cash_flow, sale_equity),
            after_tax: cash_vector(
                initial_equity,
                operating,
                |r| r.cash_flow.after_tax_cash_flow,
                sale_equity_after_tax,
            ),
            income_before_tax: cash_vector(
                initial_equity,
                operating,
                |r| r.cash_flow.pre_tax_cash_flow + r.income.principal_repayments,
                initial_equity,
            ),
            income_after_tax: cash_vector(
                initial_equity,
                operating,
                |r| r.cash_flow.after_tax_cash_flow + r.income.principal_repayments,
                initial_equity,
            ),
            capital_appreciation_before_tax: cash_vector(
                initial_equity,
                operating,
                |r| -r.income.principal_repayments,
                sale_equity,
            ),
            capital_appreciation_after_tax: cash_vector(
                initial_equity,
                operating,
                |r| -r.income.principal_repayments,
                sale_equity_after_tax,
            ),
        }
    }
}

/// `[-equity, flow(year 1), ..., flow(year N) + terminal]`
fn cash_vector<F>(initial_equity: f64, operating: &[AnnualStatementRow], flow: F, terminal: f64) -> Vec<f64>
where
    F: Fn(&AnnualStatementRow) -> f64,
{
    let mut vector = Vec::with_capacity(operating.len() + 1);
    vector.push(-initial_equity);
    vector.extend(operating.iter().map(flow));
    if let Some(last) = vector.last_mut() {
        *last += terminal;
    }
    vector
}

/// Decomposition IRRs are informative only: report `None` instead of failing
fn optional_irr(cashflows: &[f64], context: &str) -> Option<f64> {
    match solve_irr(cashflows, context) {
        Ok(rate) => Some(rate),
        Err(e) => {
            warn!("{}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amortization::LoanTerms;
    use crate::error::ProjectionError;
    use crate::projection::irr::npv;
    use approx::assert_abs_diff_eq;

    fn reference_projection(years: i32) -> ProjectionResult {
        ProjectionEngine::new(ProjectionAssumptions::reference_case(), ProjectionConfig::with_years(years))
            .project()
            .unwrap()
    }

    #[test]
    fn test_projection_runs() {
        let result = reference_projection(5);

        assert_eq!(result.years, 5);
        assert_eq!(result.statements.len(), 6);
        assert_eq!(result.loan_years.len(), 5);
        assert_eq!(result.ratios.len(), 6);
        assert_eq!(result.investor_growth.len(), 6);
        assert_eq!(result.return_vectors.after_tax.len(), 6);
        assert!(result.statements.iter().enumerate().all(|(i, r)| r.year == i as u32));
    }

    #[test]
    fn test_year_zero_is_acquisition() {
        let result = reference_projection(5);
        let opening = result.year(0).unwrap();

        assert_eq!(opening.income.rents, 0.0);
        assert_eq!(opening.income.interest, 0.0);
        assert_abs_diff_eq!(opening.balance.total_assets, 1_020_000.0);
        assert_abs_diff_eq!(opening.balance.total_debt, 750_000.0);
        assert_abs_diff_eq!(opening.balance.equity, 270_000.0);
        assert_abs_diff_eq!(opening.balance.tax_basis, 1_020_000.0);
        assert_abs_diff_eq!(opening.cash_flow.net_cash_flow, -270_000.0);
    }

    #[test]
    fn test_statement_identities() {
        let result = reference_projection(10);

        for row in &result.statements {
            let i = &row.income;
            let b = &row.balance;
            let c = &row.cash_flow;
            assert_abs_diff_eq!(b.equity, b.total_assets - b.total_debt, epsilon = 1e-9);
            assert_abs_diff_eq!(i.total_revenues, i.rents + i.other_income, epsilon = 1e-9);
            assert_abs_diff_eq!(i.operating_expenses, i.operating_expense_lines(), epsilon = 1e-9);
            assert_abs_diff_eq!(
                i.total_expenses,
                i.operating_expenses + i.property_taxes + i.interest,
                epsilon = 1e-9
            );
            assert_abs_diff_eq!(
                i.net_income,
                i.net_operating_income - i.interest - i.depreciation,
                epsilon = 1e-9
            );
            assert_abs_diff_eq!(c.net_cash_flow, c.operating + c.financing + c.investing, epsilon = 1e-9);
            assert_abs_diff_eq!(c.after_tax_cash_flow, c.pre_tax_cash_flow - i.income_tax, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_rent_and_value_compounding() {
        let result = reference_projection(5);

        assert_abs_diff_eq!(result.statements[1].income.rents, 57_000.0);
        assert_abs_diff_eq!(result.statements[2].income.rents, 58_140.0);
        assert_abs_diff_eq!(result.statements[5].income.rents, 61_699.0);
        assert_abs_diff_eq!(result.statements[1].income.management_fees, 4_560.0);

        assert_abs_diff_eq!(result.statements[1].balance.total_assets, 1_030_000.0);
        assert_abs_diff_eq!(result.statements[5].balance.total_assets, 1_159_274.0);

        // Flat lines stay flat, inflating lines grow from year 1
        assert_abs_diff_eq!(result.statements[5].income.advertising, 300.0);
        assert_abs_diff_eq!(result.statements[1].income.insurance, 2_400.0);
        assert_abs_diff_eq!(result.statements[2].income.insurance, 2_472.0);
        assert_abs_diff_eq!(result.statements[2].income.property_taxes, 12_240.0);
    }

    #[test]
    fn test_depreciation_and_basis() {
        let result = reference_projection(5);

        for row in &result.statements[1..] {
            assert_abs_diff_eq!(row.income.depreciation, 29_818.0);
        }
        let terminal = result.year(5).unwrap();
        assert_abs_diff_eq!(terminal.balance.cumulative_depreciation, 149_090.0);
        assert_abs_diff_eq!(terminal.balance.tax_basis, 870_910.0);
    }

    #[test]
    fn test_commercial_property_depreciates_slower() {
        let mut assumptions = ProjectionAssumptions::reference_case();
        assumptions.tax.asset_class = crate::assumptions::AssetClass::NonResidential;
        let result = ProjectionEngine::new(assumptions, ProjectionConfig::default()).project().unwrap();

        assert_abs_diff_eq!(result.statements[1].income.depreciation, 21_026.0);
    }

    #[test]
    fn test_loan_flows_match_schedule() {
        let result = reference_projection(5);
        let schedule = amortize(&LoanTerms::over_years(750_000.0, 0.05, 30, 12).unwrap()).unwrap();

        let first_year_interest: f64 = schedule.baseline[..12].iter().map(|e| e.interest).sum();
        let first_year_principal: f64 = schedule.baseline[..12].iter().map(|e| e.principal).sum();
        let row = result.year(1).unwrap();

        assert_abs_diff_eq!(row.income.interest, first_year_interest.round());
        assert_abs_diff_eq!(row.income.principal_repayments, first_year_principal.round());
        assert_abs_diff_eq!(row.balance.total_debt, schedule.baseline[11].ending_balance.round());
        assert_abs_diff_eq!(row.income.debt_service, row.income.interest + row.income.principal_repayments);
    }

    #[test]
    fn test_reference_case_irr_round_trip() {
        let result = reference_projection(5);
        let d = &result.disposal;
        let v = &result.return_vectors;

        assert_abs_diff_eq!(v.after_tax[0], -270_000.0);
        assert_abs_diff_eq!(npv(d.irr_after_tax, &v.after_tax), 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(npv(d.irr_before_tax, &v.before_tax), 0.0, epsilon = 1e-6);
        assert!(d.irr_after_tax.is_finite());

        for (irr, vector) in [
            (d.income_irr_before_tax, &v.income_before_tax),
            (d.income_irr_after_tax, &v.income_after_tax),
            (d.capital_appreciation_irr_before_tax, &v.capital_appreciation_before_tax),
            (d.capital_appreciation_irr_after_tax, &v.capital_appreciation_after_tax),
        ] {
            let irr = irr.expect("decomposition IRR should solve for the reference case");
            assert_abs_diff_eq!(npv(irr, vector), 0.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_terminal_vector_includes_sale() {
        let result = reference_projection(5);
        let d = &result.disposal;
        let terminal = result.year(5).unwrap();

        assert_abs_diff_eq!(
            result.return_vectors.after_tax[5],
            terminal.cash_flow.after_tax_cash_flow + d.sale.net_sale_before_tax
                - d.loan_payoff
                - d.sale.total_disposition_tax,
            epsilon = 1e-6
        );
        assert_abs_diff_eq!(
            result.return_vectors.income_before_tax[5],
            terminal.cash_flow.pre_tax_cash_flow + terminal.income.principal_repayments + 270_000.0,
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_profitable_sale_decomposition() {
        let result = reference_projection(5);
        let sale = &result.disposal.sale;

        assert!(sale.realized_gain > 0.0);
        assert_abs_diff_eq!(sale.long_term_gain, 69_718.0);
        assert_abs_diff_eq!(sale.depreciation_recapture, 149_090.0);
        assert_eq!(sale.short_term_gain, 0.0);

        let net_income: f64 = result.statements.iter().map(|r| r.income.net_income).sum();
        assert_abs_diff_eq!(
            result.disposal.total_gain_before_tax,
            net_income + sale.realized_gain,
            epsilon = 1e-6
        );
        assert_abs_diff_eq!(
            result.disposal.total_return_before_tax,
            result.disposal.total_gain_before_tax / 270_000.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_losing_sale_is_short_term() {
        let mut assumptions = ProjectionAssumptions::reference_case();
        assumptions.disposal.appreciation = -0.02;
        let result = ProjectionEngine::new(assumptions, ProjectionConfig::default()).project().unwrap();
        let sale = &result.disposal.sale;

        assert!(sale.realized_gain <= 0.0);
        assert_eq!(sale.long_term_gain, 0.0);
        assert_eq!(sale.depreciation_recapture, 0.0);
        assert_eq!(sale.short_term_gain, sale.realized_gain);
        assert!(result.disposal.irr_after_tax < 0.0);
    }

    #[test]
    fn test_unrecoverable_loss_has_no_irr() {
        let mut assumptions = ProjectionAssumptions::reference_case();
        assumptions.disposal.appreciation = -0.10;
        let result = ProjectionEngine::new(assumptions, ProjectionConfig::default()).project();

        assert!(matches!(result, Err(ProjectionError::IrrNotFound { .. })));
    }

    #[test]
    fn test_invalid_years_fall_back() {
        assert_eq!(reference_projection(0).years, DEFAULT_PROJECTION_YEARS);
        assert_eq!(reference_projection(-3).years, DEFAULT_PROJECTION_YEARS);
        assert_eq!(ProjectionConfig::with_years(7).horizon(), 7);
    }

    #[test]
    fn test_horizon_beyond_amortization() {
        let mut assumptions = ProjectionAssumptions::reference_case();
        assumptions.loan.amortization_years = 10;
        let result = ProjectionEngine::new(assumptions, ProjectionConfig::with_years(12))
            .project()
            .unwrap();

        assert_eq!(result.year(10).unwrap().balance.total_debt, 0.0);
        for row in &result.statements[11..] {
            assert_eq!(row.income.debt_service, 0.0);
            assert_eq!(row.balance.total_debt, 0.0);
            assert_abs_diff_eq!(row.balance.equity, row.balance.total_assets);
        }
        assert_eq!(result.disposal.loan_payoff, 0.0);
    }

    #[test]
    fn test_invalid_loan_propagates() {
        let mut assumptions = ProjectionAssumptions::reference_case();
        assumptions.loan.rate = -0.05;
        let result = ProjectionEngine::new(assumptions, ProjectionConfig::default()).project();

        assert!(matches!(result, Err(ProjectionError::InvalidSchedule(_))));
    }

    #[test]
    fn test_overflowing_payment_count_rejected() {
        let mut assumptions = ProjectionAssumptions::reference_case();
        assumptions.loan.amortization_years = 70_000;
        assumptions.loan.payments_per_year = 70_000;
        assert_eq!(assumptions.loan.payment_count(), None);

        let result = ProjectionEngine::new(assumptions, ProjectionConfig::default()).project();
        assert!(matches!(result, Err(ProjectionError::InvalidSchedule(_))));
    }
}
