//! Realty Projection CLI
//!
//! Projects a single investment scenario and prints the annual statements,
//! the disposal summary and the return metrics.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use realty_projection::{
    assumptions::load_scenario,
    projection::ProjectionConfig,
    scenario::NamedScenario,
    ProjectionAssumptions, ProjectionResult,
};

/// Pro-forma projection of a leveraged rental property
#[derive(Parser, Debug)]
#[command(name = "realty_projection", version, about)]
struct Cli {
    /// Key/value assumptions CSV; the built-in reference case when omitted
    #[arg(short, long)]
    assumptions: Option<PathBuf>,

    /// Holding period in years, overriding the assumptions file
    #[arg(short, long)]
    years: Option<i32>,

    /// Write the annual statements to this CSV file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the full result as JSON instead of tables
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut scenario = match &cli.assumptions {
        Some(path) => load_scenario(path)
            .with_context(|| format!("Failed to load assumptions from {}", path.display()))?,
        None => NamedScenario::new(
            "reference_case",
            ProjectionAssumptions::reference_case(),
            ProjectionConfig::default(),
        ),
    };
    if let Some(years) = cli.years {
        scenario.config = ProjectionConfig::with_years(years);
    }

    let result = scenario
        .project()
        .with_context(|| format!("Projection of {} failed", scenario.name))?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_report(&scenario.name, &result);
    }

    if let Some(path) = &cli.output {
        write_statements(path, &result)
            .with_context(|| format!("Failed to write statements to {}", path.display()))?;
        println!("\nAnnual statements written to: {}", path.display());
    }

    Ok(())
}

fn print_report(name: &str, result: &ProjectionResult) {
    println!("Realty Projection v{}", env!("CARGO_PKG_VERSION"));
    println!("======================\n");
    println!("Scenario: {} ({} year hold)\n", name, result.years);

    println!(
        "{:>4} {:>12} {:>12} {:>12} {:>12} {:>12} {:>14} {:>12} {:>12}",
        "Year", "Revenues", "NOI", "Interest", "NetIncome", "PreTaxCF", "Assets", "Debt", "Equity"
    );
    println!("{}", "-".repeat(112));
    for row in &result.statements {
        println!(
            "{:>4} {:>12.0} {:>12.0} {:>12.0} {:>12.0} {:>12.0} {:>14.0} {:>12.0} {:>12.0}",
            row.year,
            row.income.total_revenues,
            row.income.net_operating_income,
            row.income.interest,
            row.income.net_income,
            row.cash_flow.pre_tax_cash_flow,
            row.balance.total_assets,
            row.balance.total_debt,
            row.balance.equity,
        );
    }

    println!("\nRatios:");
    println!(
        "{:>4} {:>8} {:>8} {:>8} {:>8} {:>8} {:>8}",
        "Year", "Cap", "ROI", "CoC", "LTV", "DCR", "GRM"
    );
    for r in &result.ratios {
        println!(
            "{:>4} {:>8.4} {:>8.4} {:>8.4} {:>8.4} {:>8.4} {:>8.2}",
            r.year,
            r.capitalization_rate,
            r.return_on_investment,
            r.cash_on_cash,
            r.loan_to_value,
            r.debt_coverage,
            r.gross_rent_multiplier,
        );
    }

    let d = &result.disposal;
    println!("\nDisposal (end of year {}):", d.years);
    println!("  Gross Sale:            ${:.0}", d.sale.gross_sale);
    println!("  Selling Commission:    ${:.0}", d.sale.selling_commission);
    println!("  Net Sale Before Tax:   ${:.0}", d.sale.net_sale_before_tax);
    println!("  Tax Basis:             ${:.0}", d.sale.tax_basis);
    println!("  Realized Gain:         ${:.0}", d.sale.realized_gain);
    println!("  Long Term Gain Tax:    ${:.0}", d.sale.long_term_gain_tax);
    println!("  Short Term Gain Tax:   ${:.0}", d.sale.short_term_gain_tax);
    println!("  Recapture Tax:         ${:.0}", d.sale.depreciation_recapture_tax);
    println!("  Net Sale After Tax:    ${:.0}", d.sale.net_sale_after_tax);
    println!("  Loan Payoff:           ${:.0}", d.loan_payoff);

    println!("\nReturns:");
    println!("  Total Gain Before Tax: ${:.0} ({:.2}%)", d.total_gain_before_tax, d.total_return_before_tax * 100.0);
    println!("  Total Gain After Tax:  ${:.0} ({:.2}%)", d.total_gain_after_tax, d.total_return_after_tax * 100.0);
    println!("  IRR Before Tax:        {:.2}%", d.irr_before_tax * 100.0);
    println!("  IRR After Tax:         {:.2}%", d.irr_after_tax * 100.0);
    for (label, irr) in [
        ("Income IRR Before Tax:", d.income_irr_before_tax),
        ("Income IRR After Tax:", d.income_irr_after_tax),
        ("Appreciation IRR (BT):", d.capital_appreciation_irr_before_tax),
        ("Appreciation IRR (AT):", d.capital_appreciation_irr_after_tax),
    ] {
        match irr {
            Some(rate) => println!("  {:<22} {:.2}%", label, rate * 100.0),
            None => println!("  {:<22} n/a", label),
        }
    }

    if let Some(last) = result.investor_growth.last() {
        println!("\n$10,000 invested grows to ${:.0} by year {}", last.total, last.year);
    }
}

fn write_statements(path: &Path, result: &ProjectionResult) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;

    writer.write_record([
        "Year", "Rents", "OtherIncome", "TotalRevenues", "OperatingExpenses", "PropertyTaxes", "NOI",
        "Interest", "Principal", "DebtService", "Depreciation", "TotalExpenses", "NetIncome", "IncomeTax",
        "TotalAssets", "TotalDebt", "Equity", "CumulativeDepreciation", "TaxBasis",
        "OperatingCF", "FinancingCF", "InvestingCF", "NetCF", "PreTaxCF", "AfterTaxCF",
    ])?;

    for row in &result.statements {
        let i = &row.income;
        let b = &row.balance;
        let c = &row.cash_flow;
        let values = [
            i.rents, i.other_income, i.total_revenues, i.operating_expenses, i.property_taxes,
            i.net_operating_income, i.interest, i.principal_repayments, i.debt_service, i.depreciation,
            i.total_expenses, i.net_income, i.income_tax,
            b.total_assets, b.total_debt, b.equity, b.cumulative_depreciation, b.tax_basis,
            c.operating, c.financing, c.investing, c.net_cash_flow, c.pre_tax_cash_flow, c.after_tax_cash_flow,
        ];

        let mut record = vec![row.year.to_string()];
        record.extend(values.iter().map(|v| format!("{:.2}", v)));
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}
