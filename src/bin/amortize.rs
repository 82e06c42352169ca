//! Print a mortgage amortization schedule, with and without prepayments

use anyhow::{bail, Result};
use clap::Parser;
use realty_projection::amortization::{amortize, LoanTerms, PaymentTiming, Prepayment};

#[derive(Parser, Debug)]
#[command(name = "amortize", about = "Mortgage amortization schedule")]
struct Args {
    /// Loan principal
    #[arg(long)]
    principal: f64,

    /// Annual nominal rate, e.g. 0.05
    #[arg(long)]
    rate: f64,

    /// Amortization period in years
    #[arg(long, default_value_t = 30)]
    years: u32,

    /// Payments per year
    #[arg(long, default_value_t = 12)]
    payments_per_year: u32,

    /// Extra principal per period; one value for all periods or one per period
    #[arg(long, value_delimiter = ',')]
    prepayment: Vec<f64>,

    /// Payments due at the beginning of each period
    #[arg(long)]
    begin: bool,

    /// Print annual totals instead of every period
    #[arg(long)]
    annual: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.principal <= 0.0 {
        bail!("Principal must be positive, got {}", args.principal);
    }

    let prepayment = match args.prepayment.as_slice() {
        [] => Prepayment::None,
        [flat] => Prepayment::Flat(*flat),
        many => Prepayment::Schedule(many.to_vec()),
    };
    let timing = if args.begin { PaymentTiming::Begin } else { PaymentTiming::End };

    let terms = LoanTerms::over_years(args.principal, args.rate, args.years, args.payments_per_year)?
        .with_prepayment(prepayment)
        .with_timing(timing);
    let schedule = amortize(&terms)?;

    println!("Periodic payment: ${:.2}", schedule.periodic_payment);
    println!();

    if args.annual {
        println!("{:>4} {:>14} {:>14} {:>14} {:>16}", "Year", "Payments", "Interest", "Principal", "Balance");
        println!("{}", "-".repeat(66));
        for year in schedule.annual_summary() {
            println!(
                "{:>4} {:>14.2} {:>14.2} {:>14.2} {:>16.2}",
                year.year, year.payments, year.interest, year.principal, year.ending_balance
            );
        }
    } else {
        println!("{:>6} {:>12} {:>12} {:>12} {:>16}", "Period", "Payment", "Interest", "Principal", "Balance");
        println!("{}", "-".repeat(62));
        for entry in schedule.effective() {
            println!(
                "{:>6} {:>12.2} {:>12.2} {:>12.2} {:>16.2}",
                entry.period, entry.payment, entry.interest, entry.principal, entry.ending_balance
            );
        }
    }

    println!();
    println!("Total interest:  ${:.2}", schedule.baseline_total_interest());
    if let Some(prepaid) = schedule.prepaid_total_interest() {
        println!("With prepayment: ${:.2}", prepaid);
        println!(
            "Paid off {} periods early, saving ${:.2}",
            schedule.periods_saved(),
            schedule.interest_saved()
        );
    }

    Ok(())
}
