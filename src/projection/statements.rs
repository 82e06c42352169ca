//! Annual income statement, balance sheet and cash-flow rows

use serde::{Deserialize, Serialize};

/// Income statement lines for one year
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct IncomeStatement {
    // Revenues
    pub rents: f64,
    pub other_income: f64,
    pub total_revenues: f64,

    // Operating expenses
    pub management_fees: f64,
    pub fixed_fees: f64,
    pub turnover_costs: f64,
    pub insurance: f64,
    pub utilities: f64,
    pub maintenance: f64,
    pub advertising: f64,
    pub administrative: f64,
    pub operating_expenses: f64,

    pub property_taxes: f64,
    pub net_operating_income: f64,

    // Financing
    pub interest: f64,
    pub principal_repayments: f64,
    pub debt_service: f64,

    pub depreciation: f64,
    /// Operating expenses, property taxes and interest
    pub total_expenses: f64,
    pub net_income: f64,
    pub income_before_depreciation: f64,
    /// Income tax on net income; negative when losses shelter other income
    pub income_tax: f64,
}

/// Balance sheet at year end
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BalanceSheet {
    pub total_assets: f64,
    pub total_debt: f64,
    pub equity: f64,
    pub cumulative_depreciation: f64,
    pub tax_basis: f64,
}

/// Cash flows for one year
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CashFlowStatement {
    /// Net operating income
    pub operating: f64,
    /// Loan proceeds less debt service
    pub financing: f64,
    /// Acquisition outlay
    pub investing: f64,
    pub net_cash_flow: f64,
    /// NOI less debt service
    pub pre_tax_cash_flow: f64,
    pub after_tax_cash_flow: f64,
}

/// Statements for one projection year; year 0 is the acquisition date
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AnnualStatementRow {
    pub year: u32,
    pub income: IncomeStatement,
    pub balance: BalanceSheet,
    pub cash_flow: CashFlowStatement,
}

impl IncomeStatement {
    /// Sum of the operating expense sub-lines
    pub fn operating_expense_lines(&self) -> f64 {
        self.management_fees
            + self.fixed_fees
            + self.turnover_costs
            + self.insurance
            + self.utilities
            + self.maintenance
            + self.advertising
            + self.administrative
    }

    /// Fill the subtotal lines from the detail lines
    pub(crate) fn with_totals(mut self, income_tax_rate: f64) -> Self {
        self.total_revenues = self.rents + self.other_income;
        self.operating_expenses = self.operating_expense_lines();
        self.net_operating_income = self.total_revenues - self.operating_expenses - self.property_taxes;
        self.debt_service = self.interest + self.principal_repayments;
        self.total_expenses = self.operating_expenses + self.property_taxes + self.interest;
        self.net_income = self.net_operating_income - self.interest - self.depreciation;
        self.income_before_depreciation = self.net_income + self.depreciation;
        self.income_tax = crate::rounding::round_cents(self.net_income * income_tax_rate);
        self
    }
}

impl BalanceSheet {
    pub(crate) fn new(total_assets: f64, total_debt: f64, cumulative_depreciation: f64, tax_basis: f64) -> Self {
        Self {
            total_assets,
            total_debt,
            equity: total_assets - total_debt,
            cumulative_depreciation,
            tax_basis,
        }
    }
}

impl CashFlowStatement {
    /// Operating year: NOI less debt service, then income tax
    pub(crate) fn operating_year(income: &IncomeStatement) -> Self {
        let pre_tax = income.net_operating_income - income.debt_service;
        Self {
            operating: income.net_operating_income,
            financing: -income.debt_service,
            investing: 0.0,
            net_cash_flow: pre_tax,
            pre_tax_cash_flow: pre_tax,
            after_tax_cash_flow: pre_tax - income.income_tax,
        }
    }

    /// Acquisition: purchase outlay funded by loan proceeds and equity
    pub(crate) fn acquisition(acquisition_cost: f64, loan_amount: f64) -> Self {
        Self {
            operating: 0.0,
            financing: loan_amount,
            investing: -acquisition_cost,
            net_cash_flow: loan_amount - acquisition_cost,
            pre_tax_cash_flow: 0.0,
            after_tax_cash_flow: 0.0,
        }
    }
}
