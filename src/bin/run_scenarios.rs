//! Run every scenario file in a directory and tabulate the returns
//!
//! Projections run in parallel; a scenario that fails is reported and skipped.

use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use realty_projection::assumptions::{load_scenarios, DEFAULT_SCENARIO_PATH};
use realty_projection::ScenarioRunner;

#[derive(Parser, Debug)]
#[command(name = "run_scenarios", about = "Batch projection of scenario files")]
struct Args {
    /// Directory of key/value assumption CSV files
    #[arg(default_value = DEFAULT_SCENARIO_PATH)]
    dir: String,

    /// Write the summary table to this CSV file
    #[arg(short, long)]
    output: Option<String>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let start = Instant::now();
    let scenarios = load_scenarios(&args.dir)
        .with_context(|| format!("Failed to load scenarios from {}", args.dir))?;
    println!("Loaded {} scenarios in {:?}", scenarios.len(), start.elapsed());

    let runner = ScenarioRunner::new(scenarios);
    let proj_start = Instant::now();
    let results = runner.run_all();
    println!("Projections complete in {:?}\n", proj_start.elapsed());

    println!(
        "{:<24} {:>5} {:>12} {:>14} {:>10} {:>10}",
        "Scenario", "Years", "Equity", "NetSaleAT", "IRR BT", "IRR AT"
    );
    println!("{}", "-".repeat(80));

    let mut writer = match &args.output {
        Some(path) => {
            let mut w = csv::Writer::from_path(path)?;
            w.write_record(["Scenario", "Years", "InitialEquity", "FinalEquity", "NetSaleAfterTax", "TotalGainBeforeTax", "TotalGainAfterTax", "IrrBeforeTax", "IrrAfterTax"])?;
            Some(w)
        }
        None => None,
    };

    let mut failed = 0;
    for (name, result) in &results {
        match result {
            Ok(projection) => {
                let s = projection.summary();
                println!(
                    "{:<24} {:>5} {:>12.0} {:>14.0} {:>9.2}% {:>9.2}%",
                    name,
                    s.years,
                    s.initial_equity,
                    s.net_sale_after_tax,
                    s.irr_before_tax * 100.0,
                    s.irr_after_tax * 100.0
                );
                if let Some(w) = writer.as_mut() {
                    w.write_record(&[
                        name.clone(),
                        s.years.to_string(),
                        format!("{:.2}", s.initial_equity),
                        format!("{:.2}", s.final_equity),
                        format!("{:.2}", s.net_sale_after_tax),
                        format!("{:.2}", s.total_gain_before_tax),
                        format!("{:.2}", s.total_gain_after_tax),
                        format!("{:.6}", s.irr_before_tax),
                        format!("{:.6}", s.irr_after_tax),
                    ])?;
                }
            }
            Err(e) => {
                failed += 1;
                println!("{:<24} failed: {}", name, e);
            }
        }
    }

    if let (Some(mut w), Some(path)) = (writer, &args.output) {
        w.flush()?;
        println!("\nSummary written to {}", path);
    }

    println!("\n{} of {} scenarios projected in {:?}", results.len() - failed, results.len(), start.elapsed());
    Ok(())
}
