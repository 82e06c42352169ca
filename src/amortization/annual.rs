//! Annual roll-up of a per-period schedule

use serde::{Deserialize, Serialize};

use super::schedule::{AmortizationSchedule, ScheduleEntry};

/// Loan activity for one loan year
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AnnualLoanSummary {
    /// Loan year (1-indexed)
    pub year: u32,
    pub payments: f64,
    pub interest: f64,
    pub principal: f64,
    /// Balance after the last payment of the year
    pub ending_balance: f64,
}

/// Fold a schedule into year-sized chunks of `payments_per_year` periods
///
/// A trailing partial chunk (payment count not a whole number of years) is
/// reported as its own year.
pub fn annualize(entries: &[ScheduleEntry], payments_per_year: u32) -> Vec<AnnualLoanSummary> {
    let chunk = payments_per_year.max(1) as usize;

    entries
        .chunks(chunk)
        .enumerate()
        .map(|(i, periods)| AnnualLoanSummary {
            year: i as u32 + 1,
            payments: periods.iter().map(|e| e.payment).sum(),
            interest: periods.iter().map(|e| e.interest).sum(),
            principal: periods.iter().map(|e| e.principal).sum(),
            ending_balance: periods.last().map(|e| e.ending_balance).unwrap_or(0.0),
        })
        .collect()
}

impl AmortizationSchedule {
    /// Annual totals for the schedule actually followed
    pub fn annual_summary(&self) -> Vec<AnnualLoanSummary> {
        annualize(self.effective(), self.payments_per_year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amortization::{amortize, LoanTerms};
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_annual_summary_matches_periods() {
        let schedule = amortize(&LoanTerms::over_years(300_000.0, 0.05, 30, 12).unwrap()).unwrap();
        let years = schedule.annual_summary();

        assert_eq!(years.len(), 30);
        assert_eq!(years[0].year, 1);

        let first_year_interest: f64 = schedule.baseline[..12].iter().map(|e| e.interest).sum();
        assert_abs_diff_eq!(years[0].interest, first_year_interest, epsilon = 1e-9);
        assert_abs_diff_eq!(years[0].ending_balance, schedule.baseline[11].ending_balance, epsilon = 1e-9);
        assert_abs_diff_eq!(years[0].payments, 12.0 * 1610.46, epsilon = 1e-6);

        let total_principal: f64 = years.iter().map(|y| y.principal).sum();
        assert_abs_diff_eq!(total_principal, 300_000.0, epsilon = 1e-6);
        assert_eq!(years.last().unwrap().ending_balance, 0.0);
    }

    #[test]
    fn test_partial_final_year() {
        let schedule = amortize(&LoanTerms::new(10_000.0, 0.06, 18, 12)).unwrap();
        let years = schedule.annual_summary();

        assert_eq!(years.len(), 2);
        assert_eq!(years[1].ending_balance, 0.0);
    }
}
