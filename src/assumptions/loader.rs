//! Key/value CSV assumption loader
//!
//! Each scenario file has a `Key,Value` header followed by one assumption per
//! row, e.g. `Purchase Price,1000000`. Keys are matched case-insensitively.

use std::collections::HashMap;
use std::fs;
use std::io::Read;
use std::path::Path;

use csv::{Reader, ReaderBuilder};

use super::{
    AssetClass, DisposalAssumptions, IncomeAssumptions, LoanAssumptions, OperatingAssumptions,
    ProjectionAssumptions, PurchaseAssumptions, TaxAssumptions,
};
use crate::error::{ProjectionError, Result};
use crate::projection::ProjectionConfig;
use crate::scenario::NamedScenario;

/// Default directory of scenario files
pub const DEFAULT_SCENARIO_PATH: &str = "data/scenarios";

/// Assumption keys as they appear in scenario files
pub mod keys {
    pub const PURCHASE_PRICE: &str = "Purchase Price";
    pub const PURCHASE_COSTS: &str = "Purchase Costs";
    pub const LOAN_AMOUNT: &str = "Loan Amount";
    pub const LOAN_TO_VALUE: &str = "Loan To Value";
    pub const RATE: &str = "Rate";
    pub const AMORTIZATION_PERIOD: &str = "Amortization Period";
    pub const PAYMENTS_PER_YEAR: &str = "Payments Per Year";
    pub const RENT: &str = "Rent";
    pub const RENT_PAYMENTS_PER_YEAR: &str = "Rent Payments Per Year";
    pub const VACANCY: &str = "Vacancy";
    pub const RENT_INFLATION: &str = "Rent Inflation";
    pub const OTHER_INCOME: &str = "Other Income";
    pub const MANAGEMENT_FEE: &str = "Property Management Fee";
    pub const FIXED_FEES: &str = "Fixed Fees";
    pub const TURNOVER_COSTS: &str = "Tenant Turnover Costs";
    pub const INSURANCE: &str = "Insurance";
    pub const INSURANCE_INFLATION: &str = "Insurance Inflation";
    pub const UTILITIES: &str = "Utilities";
    pub const UTILITY_INFLATION: &str = "Utility Inflation";
    pub const MAINTENANCE: &str = "Maintenance";
    pub const MAINTENANCE_INFLATION: &str = "Maintenance Inflation";
    pub const ADVERTISING: &str = "Advertising";
    pub const ADMINISTRATIVE: &str = "Administrative";
    pub const PRICE_APPRECIATION: &str = "Price Appreciation";
    pub const SELLING_COMMISSIONS: &str = "Selling Commissions";
    pub const PROPERTY_TAX: &str = "Property Tax";
    pub const PROPERTY_TAX_INFLATION: &str = "Property Tax Inflation";
    pub const LAND_VALUE: &str = "Land Value";
    pub const CLASS: &str = "Class";
    pub const INCOME_TAX: &str = "Income Tax";
    pub const CAPITAL_GAIN_TAX: &str = "Capital Gain Tax";
    pub const RECAPTURE_TAX: &str = "Depreciation Recapture Tax";
    pub const YEARS: &str = "Years";
}

/// Raw CSV row
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "Key")]
    key: String,
    #[serde(rename = "Value", default)]
    value: String,
}

/// Parsed key/value pairs of one scenario file
#[derive(Debug, Clone, Default)]
pub struct AssumptionSheet {
    values: HashMap<String, String>,
}

fn normalize_key(key: &str) -> String {
    key.trim().to_ascii_lowercase()
}

impl AssumptionSheet {
    /// Read a sheet from any reader (file, string buffer, request body)
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        Self::from_csv(&mut csv_reader)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut csv_reader = ReaderBuilder::new().trim(csv::Trim::All).from_path(path)?;
        Self::from_csv(&mut csv_reader)
    }

    fn from_csv<R: Read>(reader: &mut Reader<R>) -> Result<Self> {
        let mut values = HashMap::new();
        for result in reader.deserialize() {
            let row: CsvRow = result?;
            if row.key.is_empty() {
                continue;
            }
            values.insert(normalize_key(&row.key), row.value);
        }
        Ok(Self { values })
    }

    /// Build a sheet from in-memory pairs
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let values = pairs
            .into_iter()
            .map(|(k, v)| (normalize_key(k), v.trim().to_string()))
            .collect();
        Self { values }
    }

    fn raw(&self, key: &str) -> Option<&str> {
        self.values
            .get(&normalize_key(key))
            .map(|v| v.as_str())
            .filter(|v| !v.is_empty())
    }

    fn optional_number(&self, key: &str) -> Result<Option<f64>> {
        let Some(raw) = self.raw(key) else {
            return Ok(None);
        };
        let cleaned: String = raw.chars().filter(|c| !matches!(c, '$' | ',' | ' ')).collect();
        cleaned
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(Some)
            .ok_or_else(|| ProjectionError::InvalidAssumption {
                field: key.to_string(),
                value: raw.to_string(),
            })
    }

    fn number(&self, key: &str) -> Result<f64> {
        self.optional_number(key)?
            .ok_or_else(|| ProjectionError::MissingAssumption {
                field: key.to_string(),
            })
    }

    fn count(&self, key: &str) -> Result<u32> {
        let value = self.number(key)?;
        if value < 0.0 || value.fract() != 0.0 || value > u32::MAX as f64 {
            return Err(ProjectionError::InvalidAssumption {
                field: key.to_string(),
                value: value.to_string(),
            });
        }
        Ok(value as u32)
    }

    fn asset_class(&self) -> Result<AssetClass> {
        let raw = self.raw(keys::CLASS).ok_or_else(|| ProjectionError::MissingAssumption {
            field: keys::CLASS.to_string(),
        })?;
        AssetClass::from_label(raw).ok_or_else(|| ProjectionError::InvalidAssumption {
            field: keys::CLASS.to_string(),
            value: raw.to_string(),
        })
    }

    /// Projection horizon, if the sheet names one
    pub fn years(&self) -> Result<Option<i32>> {
        Ok(self.optional_number(keys::YEARS)?.map(|y| y.trunc() as i32))
    }

    /// Assemble the typed assumptions, failing on the first absent key
    pub fn assumptions(&self) -> Result<ProjectionAssumptions> {
        use keys::*;

        let purchase = PurchaseAssumptions {
            price: self.number(PURCHASE_PRICE)?,
            buying_costs: self.number(PURCHASE_COSTS)?,
        };

        let amount = match self.optional_number(LOAN_AMOUNT)? {
            Some(amount) => amount,
            None => match self.optional_number(LOAN_TO_VALUE)? {
                Some(ltv) => ltv * purchase.price,
                None => {
                    return Err(ProjectionError::MissingAssumption {
                        field: LOAN_AMOUNT.to_string(),
                    })
                }
            },
        };

        let loan = LoanAssumptions {
            amount,
            rate: self.number(RATE)?,
            amortization_years: self.count(AMORTIZATION_PERIOD)?,
            payments_per_year: self.count(PAYMENTS_PER_YEAR)?,
        };

        let income = IncomeAssumptions {
            rent: self.number(RENT)?,
            payments_per_year: self.count(RENT_PAYMENTS_PER_YEAR)?,
            vacancy: self.number(VACANCY)?,
            rent_inflation: self.number(RENT_INFLATION)?,
            other_income: self.optional_number(OTHER_INCOME)?.unwrap_or(0.0),
        };

        let operating = OperatingAssumptions {
            management_fee: self.number(MANAGEMENT_FEE)?,
            fixed_fees: self.number(FIXED_FEES)?,
            turnover_cost: self.number(TURNOVER_COSTS)?,
            insurance: self.number(INSURANCE)?,
            insurance_inflation: self.number(INSURANCE_INFLATION)?,
            utilities: self.number(UTILITIES)?,
            utility_inflation: self.number(UTILITY_INFLATION)?,
            maintenance: self.number(MAINTENANCE)?,
            maintenance_inflation: self.number(MAINTENANCE_INFLATION)?,
            advertising: self.number(ADVERTISING)?,
            administrative: self.number(ADMINISTRATIVE)?,
        };

        let disposal = DisposalAssumptions {
            appreciation: self.number(PRICE_APPRECIATION)?,
            selling_commission: self.number(SELLING_COMMISSIONS)?,
        };

        let tax = TaxAssumptions {
            property_tax: self.number(PROPERTY_TAX)?,
            property_tax_inflation: self.number(PROPERTY_TAX_INFLATION)?,
            land_value: self.number(LAND_VALUE)?,
            asset_class: self.asset_class()?,
            income_tax: self.number(INCOME_TAX)?,
            capital_gains_tax: self.number(CAPITAL_GAIN_TAX)?,
            recapture_tax: self.number(RECAPTURE_TAX)?,
        };

        Ok(ProjectionAssumptions {
            purchase,
            loan,
            income,
            operating,
            disposal,
            tax,
        })
    }

    /// Assumptions plus horizon as a named scenario
    pub fn scenario(&self, name: impl Into<String>) -> Result<NamedScenario> {
        let config = match self.years()? {
            Some(years) => ProjectionConfig { years },
            None => ProjectionConfig::default(),
        };
        Ok(NamedScenario {
            name: name.into(),
            config,
            assumptions: self.assumptions()?,
        })
    }
}

/// Load one scenario file; the scenario is named after the file stem
pub fn load_scenario<P: AsRef<Path>>(path: P) -> Result<NamedScenario> {
    let path = path.as_ref();
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "scenario".to_string());
    AssumptionSheet::from_path(path)?.scenario(name)
}

/// Load every `*.csv` scenario in a directory, sorted by name
pub fn load_scenarios<P: AsRef<Path>>(dir: P) -> Result<Vec<NamedScenario>> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_csv = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);
        if path.is_file() && is_csv {
            paths.push(path);
        }
    }
    paths.sort();

    paths.iter().map(load_scenario).collect()
}
