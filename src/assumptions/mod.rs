//! Investment assumptions: acquisition, financing, income, operating, disposal and tax

pub mod loader;

pub use loader::{load_scenario, load_scenarios, AssumptionSheet, DEFAULT_SCENARIO_PATH};

use serde::{Deserialize, Serialize};

use crate::amortization::LoanTerms;
use crate::error::Result;

/// Acquisition assumptions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseAssumptions {
    pub price: f64,
    /// Closing and other acquisition costs, capitalized into the basis
    pub buying_costs: f64,
}

/// Mortgage financing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanAssumptions {
    pub amount: f64,
    /// Annual nominal rate
    pub rate: f64,
    pub amortization_years: u32,
    pub payments_per_year: u32,
}

impl LoanAssumptions {
    /// `None` when the period count does not fit in a `u32`
    pub fn payment_count(&self) -> Option<u32> {
        self.amortization_years.checked_mul(self.payments_per_year)
    }

    pub fn terms(&self) -> Result<LoanTerms> {
        LoanTerms::over_years(self.amount, self.rate, self.amortization_years, self.payments_per_year)
    }
}

/// Rental income
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeAssumptions {
    /// Rent per payment period
    pub rent: f64,
    pub payments_per_year: u32,
    pub vacancy: f64,
    pub rent_inflation: f64,
    /// Other annual income (parking, laundry), grows with rent
    #[serde(default)]
    pub other_income: f64,
}

impl IncomeAssumptions {
    /// First-year rent net of vacancy
    pub fn base_annual_rent(&self) -> f64 {
        self.rent * self.payments_per_year as f64 * (1.0 - self.vacancy)
    }
}

/// Operating costs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatingAssumptions {
    /// Property management fee as a fraction of collected rent
    pub management_fee: f64,
    /// Flat annual fees
    pub fixed_fees: f64,
    pub turnover_cost: f64,
    pub insurance: f64,
    pub insurance_inflation: f64,
    pub utilities: f64,
    pub utility_inflation: f64,
    pub maintenance: f64,
    pub maintenance_inflation: f64,
    pub advertising: f64,
    pub administrative: f64,
}

/// Sale assumptions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisposalAssumptions {
    /// Annual price appreciation
    pub appreciation: f64,
    /// Selling commission as a fraction of gross sale price
    pub selling_commission: f64,
}

/// Depreciation class of the property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssetClass {
    Residential,
    NonResidential,
}

impl AssetClass {
    /// Straight-line recovery period in years
    pub fn recovery_years(&self) -> f64 {
        match self {
            AssetClass::Residential => 27.5,
            AssetClass::NonResidential => 39.0,
        }
    }

    /// Parse a class label such as `Residential`, `Commercial` or `Non-Residential`
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "residential" => Some(AssetClass::Residential),
            "non-residential" | "nonresidential" | "non residential" | "commercial" => {
                Some(AssetClass::NonResidential)
            }
            _ => None,
        }
    }
}

/// Property and investor tax assumptions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxAssumptions {
    /// First-year property tax
    pub property_tax: f64,
    pub property_tax_inflation: f64,
    /// Non-depreciable land portion of the price
    pub land_value: f64,
    /// Sets the recovery period; required, never inferred
    pub asset_class: AssetClass,
    pub income_tax: f64,
    pub capital_gains_tax: f64,
    pub recapture_tax: f64,
}

/// Complete input to a projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionAssumptions {
    pub purchase: PurchaseAssumptions,
    pub loan: LoanAssumptions,
    pub income: IncomeAssumptions,
    pub operating: OperatingAssumptions,
    pub disposal: DisposalAssumptions,
    pub tax: TaxAssumptions,
}

impl ProjectionAssumptions {
    /// Price plus buying costs: the year-0 asset value and tax basis
    pub fn acquisition_cost(&self) -> f64 {
        self.purchase.price + self.purchase.buying_costs
    }

    /// Cash the investor puts in at closing
    pub fn initial_equity(&self) -> f64 {
        self.acquisition_cost() - self.loan.amount
    }

    /// Single-family rental: $1,000,000 price at 75% loan-to-value, 5% over
    /// 30 years, $5,000/month rent growing 2% with 5% vacancy
    pub fn reference_case() -> Self {
        let price = 1_000_000.0;
        Self {
            purchase: PurchaseAssumptions {
                price,
                buying_costs: 20_000.0,
            },
            loan: LoanAssumptions {
                amount: 0.75 * price,
                rate: 0.05,
                amortization_years: 30,
                payments_per_year: 12,
            },
            income: IncomeAssumptions {
                rent: 5_000.0,
                payments_per_year: 12,
                vacancy: 0.05,
                rent_inflation: 0.02,
                other_income: 0.0,
            },
            operating: OperatingAssumptions {
                management_fee: 0.08,
                fixed_fees: 1_200.0,
                turnover_cost: 1_000.0,
                insurance: 2_400.0,
                insurance_inflation: 0.03,
                utilities: 1_800.0,
                utility_inflation: 0.03,
                maintenance: 6_000.0,
                maintenance_inflation: 0.03,
                advertising: 300.0,
                administrative: 500.0,
            },
            disposal: DisposalAssumptions {
                appreciation: 0.03,
                selling_commission: 0.06,
            },
            tax: TaxAssumptions {
                property_tax: 12_000.0,
                property_tax_inflation: 0.02,
                land_value: 200_000.0,
                asset_class: AssetClass::Residential,
                income_tax: 0.35,
                capital_gains_tax: 0.20,
                recapture_tax: 0.25,
            },
        }
    }
}
