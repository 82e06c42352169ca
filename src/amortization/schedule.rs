//! Level-payment amortization schedule with optional prepayments
//!
//! The baseline and prepaid tracks are driven by the same per-period step so
//! the two schedules can only differ by the additional principal paid.

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::{ProjectionError, Result};
use crate::rounding::round_cents;

/// Longest schedule accepted: a century of daily payments
pub const MAX_PAYMENT_COUNT: u32 = 100 * 366;

/// When each period's payment is made
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaymentTiming {
    /// Payment in arrears (ordinary annuity)
    #[default]
    End,
    /// Payment in advance (annuity-due)
    Begin,
}

/// Additional principal paid on top of the level payment
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum Prepayment {
    /// No prepayment
    #[default]
    None,
    /// Same amount every period
    Flat(f64),
    /// Explicit per-period amounts; a single entry is broadcast
    Schedule(Vec<f64>),
}

impl Prepayment {
    /// Expand to one amount per period, rounded to cents
    ///
    /// Empty → all zero, one value → broadcast, `payment_count` values →
    /// pass-through, anything else is rejected.
    pub fn normalize(&self, payment_count: usize) -> Result<Vec<f64>> {
        let amounts = match self {
            Prepayment::None => vec![0.0; payment_count],
            Prepayment::Flat(amount) => vec![*amount; payment_count],
            Prepayment::Schedule(series) => match series.len() {
                0 => vec![0.0; payment_count],
                1 => vec![series[0]; payment_count],
                n if n == payment_count => series.clone(),
                n => {
                    return Err(ProjectionError::PrepaymentLengthMismatch {
                        expected: payment_count,
                        actual: n,
                    })
                }
            },
        };

        Ok(amounts.into_iter().map(round_cents).collect())
    }
}

/// Terms of a fixed-rate loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    /// Amount owed at time 0
    pub principal: f64,

    /// Annual nominal rate (decimal)
    pub annual_rate: f64,

    /// Total number of scheduled payments
    pub payment_count: u32,

    /// Payment and compounding frequency
    pub payments_per_year: u32,

    pub prepayment: Prepayment,

    pub timing: PaymentTiming,
}

impl LoanTerms {
    pub fn new(principal: f64, annual_rate: f64, payment_count: u32, payments_per_year: u32) -> Self {
        Self {
            principal,
            annual_rate,
            payment_count,
            payments_per_year,
            prepayment: Prepayment::None,
            timing: PaymentTiming::End,
        }
    }

    /// Terms for a loan amortized over whole years
    pub fn over_years(principal: f64, annual_rate: f64, years: u32, payments_per_year: u32) -> Result<Self> {
        let payment_count = years.checked_mul(payments_per_year).ok_or_else(|| {
            ProjectionError::InvalidSchedule(format!(
                "payment count overflows: {} years at {} payments per year",
                years, payments_per_year
            ))
        })?;
        Ok(Self::new(principal, annual_rate, payment_count, payments_per_year))
    }

    pub fn with_prepayment(mut self, prepayment: Prepayment) -> Self {
        self.prepayment = prepayment;
        self
    }

    pub fn with_timing(mut self, timing: PaymentTiming) -> Self {
        self.timing = timing;
        self
    }

    /// Interest rate per payment period
    pub fn periodic_rate(&self) -> f64 {
        self.annual_rate / self.payments_per_year as f64
    }

    fn validate(&self) -> Result<()> {
        if self.payment_count == 0 {
            return Err(ProjectionError::InvalidSchedule(
                "number of payments must be positive".to_string(),
            ));
        }
        if self.payment_count > MAX_PAYMENT_COUNT {
            return Err(ProjectionError::InvalidSchedule(format!(
                "{} payments exceeds the limit of {}",
                self.payment_count, MAX_PAYMENT_COUNT
            )));
        }
        if self.payments_per_year == 0 {
            return Err(ProjectionError::InvalidSchedule(
                "payments per year must be positive".to_string(),
            ));
        }
        if !self.annual_rate.is_finite() || self.annual_rate < 0.0 {
            return Err(ProjectionError::InvalidSchedule(format!(
                "interest rate must be non-negative, got {}",
                self.annual_rate
            )));
        }
        Ok(())
    }
}

/// One period of an amortization schedule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// Payment period (1-indexed)
    pub period: u32,
    pub interest: f64,
    pub principal: f64,
    /// Interest plus principal actually paid this period
    pub payment: f64,
    /// Balance after this period's payment
    pub ending_balance: f64,
}

/// Baseline schedule plus, when prepaying, the accelerated schedule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    /// Level payment per period, rounded to cents
    pub periodic_payment: f64,

    pub payments_per_year: u32,

    /// Schedule without prepayments
    pub baseline: Vec<ScheduleEntry>,

    /// Schedule with prepayments, present only when any prepayment is non-zero
    pub prepaid: Option<Vec<ScheduleEntry>>,
}

impl AmortizationSchedule {
    pub fn is_prepaying(&self) -> bool {
        self.prepaid.is_some()
    }

    /// The schedule actually followed: prepaid if present, else baseline
    pub fn effective(&self) -> &[ScheduleEntry] {
        self.prepaid.as_deref().unwrap_or(&self.baseline)
    }

    pub fn baseline_total_interest(&self) -> f64 {
        total_interest(&self.baseline)
    }

    pub fn prepaid_total_interest(&self) -> Option<f64> {
        self.prepaid.as_deref().map(total_interest)
    }

    /// Last period with a non-zero payment on the baseline track
    pub fn baseline_payoff_period(&self) -> u32 {
        payoff_period(&self.baseline)
    }

    /// Last period with a non-zero payment on the prepaid track
    pub fn prepaid_payoff_period(&self) -> Option<u32> {
        self.prepaid.as_deref().map(payoff_period)
    }

    /// Payment periods eliminated by prepaying (0 when not prepaying)
    pub fn periods_saved(&self) -> u32 {
        self.prepaid_payoff_period()
            .map(|prepaid| self.baseline_payoff_period().saturating_sub(prepaid))
            .unwrap_or(0)
    }

    /// Interest avoided by prepaying (0 when not prepaying)
    pub fn interest_saved(&self) -> f64 {
        self.prepaid_total_interest()
            .map(|prepaid| self.baseline_total_interest() - prepaid)
            .unwrap_or(0.0)
    }
}

fn total_interest(entries: &[ScheduleEntry]) -> f64 {
    entries.iter().map(|e| e.interest).sum()
}

fn payoff_period(entries: &[ScheduleEntry]) -> u32 {
    entries
        .iter()
        .rev()
        .find(|e| e.payment.abs() > 0.0)
        .map(|e| e.period)
        .unwrap_or(0)
}

/// Level payment that fully amortizes `principal` over `periods` at `rate`
/// per period, rounded to cents
pub fn level_payment(principal: f64, rate: f64, periods: u32, timing: PaymentTiming) -> f64 {
    let n = periods as f64;
    let payment = if rate == 0.0 {
        principal / n
    } else {
        let ordinary = principal * rate / (1.0 - (1.0 + rate).powf(-n));
        match timing {
            PaymentTiming::End => ordinary,
            PaymentTiming::Begin => ordinary / (1.0 + rate),
        }
    };
    round_cents(payment)
}

/// Outstanding balance of one schedule track
#[derive(Debug, Clone, Copy)]
struct Track {
    balance: f64,
}

/// Per-period inputs shared by both tracks
struct Period {
    number: u32,
    rate: f64,
    payment: f64,
    accrues_interest: bool,
    is_final: bool,
}

impl Track {
    fn step(&mut self, period: &Period, extra_principal: f64) -> ScheduleEntry {
        let interest = if period.accrues_interest {
            round_cents(self.balance * period.rate)
        } else {
            0.0
        };

        let principal = if period.is_final {
            // Close out any rounding residue on the last scheduled payment
            self.balance
        } else {
            (period.payment - interest + extra_principal)
                .min(self.balance)
                .max(0.0)
        };

        self.balance = round_cents(self.balance - principal);

        ScheduleEntry {
            period: period.number,
            interest,
            principal,
            payment: interest + principal,
            ending_balance: self.balance,
        }
    }
}

/// Build the amortization schedule for the given loan terms
pub fn amortize(terms: &LoanTerms) -> Result<AmortizationSchedule> {
    terms.validate()?;

    let count = terms.payment_count as usize;
    let prepayments = terms.prepayment.normalize(count)?;
    let prepaying = prepayments.iter().any(|p| p.abs() > 0.0);

    let rate = terms.periodic_rate();
    let payment = level_payment(terms.principal, rate, terms.payment_count, terms.timing);

    let opening = round_cents(terms.principal);
    let mut baseline_track = Track { balance: opening };
    let mut prepaid_track = Track { balance: opening };

    let mut baseline = Vec::with_capacity(count);
    let mut prepaid = Vec::with_capacity(if prepaying { count } else { 0 });

    for (i, &extra) in prepayments.iter().enumerate() {
        let period = Period {
            number: i as u32 + 1,
            rate,
            payment,
            // Annuity-due pays before the first period's interest accrues
            accrues_interest: i > 0 || terms.timing == PaymentTiming::End,
            is_final: i + 1 == count,
        };

        baseline.push(baseline_track.step(&period, 0.0));
        if prepaying {
            prepaid.push(prepaid_track.step(&period, extra));
        }
    }

    let schedule = AmortizationSchedule {
        periodic_payment: payment,
        payments_per_year: terms.payments_per_year,
        baseline,
        prepaid: prepaying.then_some(prepaid),
    };

    debug!(
        "Amortized {:.2} at {:.4} over {} periods: payment {:.2}",
        terms.principal, terms.annual_rate, terms.payment_count, payment
    );

    if let Some(prepaid_payoff) = schedule.prepaid_payoff_period() {
        info!(
            "Prepayments reduced pay periods from {} to {}",
            schedule.baseline_payoff_period(),
            prepaid_payoff
        );
        info!(
            "Total interest payment changed from {:.0} to {:.0}",
            schedule.baseline_total_interest(),
            schedule.prepaid_total_interest().unwrap_or_default()
        );
    }

    Ok(schedule)
}
