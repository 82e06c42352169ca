//! Mortgage amortization: level payment, per-period schedule and annual roll-up

mod schedule;
mod annual;

pub use schedule::{
    amortize, level_payment, AmortizationSchedule, MAX_PAYMENT_COUNT, LoanTerms, PaymentTiming, Prepayment,
    ScheduleEntry,
};
pub use annual::{annualize, AnnualLoanSummary};
