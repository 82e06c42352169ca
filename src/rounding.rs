//! Currency rounding helpers

/// Round to a fixed number of decimal places (half away from zero)
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Round to the currency minor unit
pub fn round_cents(value: f64) -> f64 {
    round_to(value, 2)
}

/// Round to whole currency units, as statement lines are reported
pub fn round_whole(value: f64) -> f64 {
    value.round()
}
