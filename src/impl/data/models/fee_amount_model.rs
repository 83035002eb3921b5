use std::str::FromStr;

use fractic_server_error::ServerError;
use regex::Regex;

use crate::errors::InvalidFeeAmount;

/// Non-negative fee amount. Accepts plain decimals (`1000`, `1000.5`) as well
/// as the currency-entry format used on screen (`$ 1.000,50`).
#[derive(Debug)]
pub(crate) struct FeeAmountModel(pub f64);
impl FromStr for FeeAmountModel {
    type Err = ServerError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let amount = if raw.contains('$') || raw.contains(',') {
            let currency_pattern = Regex::new(r"^\$?\s*(\d{1,3}(?:\.\d{3})*|\d+)(?:,(\d+))?$")
                .expect("hardcoded regex should be valid");
            let caps = currency_pattern
                .captures(raw)
                .ok_or_else(|| InvalidFeeAmount::new(raw))?;
            let integer_part = caps[1].replace('.', "");
            let fractional_part = caps.get(2).map_or("0", |m| m.as_str());
            format!("{}.{}", integer_part, fractional_part)
                .parse::<f64>()
                .map_err(|e| InvalidFeeAmount::with_debug(raw, &e))?
        } else {
            raw.parse::<f64>()
                .map_err(|e| InvalidFeeAmount::with_debug(raw, &e))?
        };
        if !amount.is_finite() || amount < 0.0 {
            return Err(InvalidFeeAmount::new(raw));
        }
        Ok(FeeAmountModel(amount))
    }
}

impl Into<f64> for FeeAmountModel {
    fn into(self) -> f64 {
        self.0
    }
}
