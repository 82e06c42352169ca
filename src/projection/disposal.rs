//! Sale at the end of the holding period and the taxes it triggers
//!
//! The gain split is a simplification of the tax code: long-term gain is
//! measured from the acquisition cost and is not reduced by the recaptured
//! depreciation, and any realized loss is treated entirely as ordinary
//! (short-term) loss.

use serde::{Deserialize, Serialize};

use crate::assumptions::TaxAssumptions;
use crate::rounding::round_whole;

/// Proceeds, gain decomposition and taxes of the terminal sale
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SaleOutcome {
    pub gross_sale: f64,
    /// Commission rounded to whole units; reported only
    pub selling_commission: f64,
    /// Gross sale net of the unrounded commission
    pub net_sale_before_tax: f64,
    pub tax_basis: f64,
    /// Net proceeds less tax basis
    pub realized_gain: f64,
    pub long_term_gain: f64,
    pub long_term_gain_tax: f64,
    pub short_term_gain: f64,
    pub short_term_gain_tax: f64,
    pub depreciation_recapture: f64,
    pub depreciation_recapture_tax: f64,
    pub total_disposition_tax: f64,
    pub net_sale_after_tax: f64,
}

/// Inputs describing the asset at the sale date
#[derive(Debug, Clone, Copy)]
pub struct SaleTerms {
    pub gross_sale: f64,
    pub commission_rate: f64,
    pub tax_basis: f64,
    pub cumulative_depreciation: f64,
    /// Price plus buying costs at acquisition
    pub initial_asset_value: f64,
}

/// Decompose the sale gain and compute the taxes due
pub fn sale_outcome(terms: &SaleTerms, tax: &TaxAssumptions) -> SaleOutcome {
    let selling_commission = round_whole(terms.gross_sale * terms.commission_rate);
    let net_sale = terms.gross_sale * (1.0 - terms.commission_rate);
    let realized_gain = net_sale - terms.tax_basis;

    let (long_term_gain, depreciation_recapture, short_term_gain) = if realized_gain > 0.0 {
        (
            round_whole((net_sale - terms.initial_asset_value).max(0.0)),
            round_whole(realized_gain.min(terms.cumulative_depreciation)),
            0.0,
        )
    } else {
        (0.0, 0.0, realized_gain)
    };

    let long_term_gain_tax = round_whole(long_term_gain * tax.capital_gains_tax);
    let short_term_gain_tax = round_whole(short_term_gain * tax.income_tax);
    let depreciation_recapture_tax = round_whole(depreciation_recapture * tax.recapture_tax);
    let total_disposition_tax = long_term_gain_tax + short_term_gain_tax + depreciation_recapture_tax;

    SaleOutcome {
        gross_sale: terms.gross_sale,
        selling_commission,
        net_sale_before_tax: net_sale,
        tax_basis: terms.tax_basis,
        realized_gain,
        long_term_gain,
        long_term_gain_tax,
        short_term_gain,
        short_term_gain_tax,
        depreciation_recapture,
        depreciation_recapture_tax,
        total_disposition_tax,
        net_sale_after_tax: net_sale - total_disposition_tax,
    }
}

/// Sale outcome plus whole-holding-period returns
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DisposalResult {
    /// Holding period in years
    pub years: u32,

    #[serde(flatten)]
    pub sale: SaleOutcome,

    /// Loan balance repaid from the sale proceeds
    pub loan_payoff: f64,

    pub total_gain_before_tax: f64,
    pub total_gain_after_tax: f64,
    /// Total gain over initial equity (NaN when equity is zero)
    pub total_return_before_tax: f64,
    pub total_return_after_tax: f64,

    pub irr_before_tax: f64,
    pub irr_after_tax: f64,
    /// Return from operations alone, equity returned at par
    pub income_irr_before_tax: Option<f64>,
    pub income_irr_after_tax: Option<f64>,
    /// Return from the sale alone, operating cash flow excluded
    pub capital_appreciation_irr_before_tax: Option<f64>,
    pub capital_appreciation_irr_after_tax: Option<f64>,

    pub capital_gains_tax_rate: f64,
    pub income_tax_rate: f64,
    pub recapture_tax_rate: f64,
}
