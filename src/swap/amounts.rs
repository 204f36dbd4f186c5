//! Human <-> smallest-unit amount conversion.

use crate::errors::SwapError;

/// Convert a human-readable amount string to the token's smallest integer
/// unit: `floor(amount * 10^decimals)`.
///
/// Fails with [`SwapError::InvalidAmount`] for non-numeric, non-positive or
/// non-finite input.
pub fn to_smallest(human_amount: &str, decimals: u8) -> Result<u64, SwapError> {
    let amount: f64 = human_amount
        .trim()
        .parse()
        .map_err(|_| SwapError::InvalidAmount(human_amount.to_string()))?;
    if !amount.is_finite() || amount <= 0.0 {
        return Err(SwapError::InvalidAmount(human_amount.to_string()));
    }
    Ok((amount * 10f64.powi(decimals as i32)).floor() as u64)
}

/// Convert a smallest-unit amount back to its human-readable value.
pub fn to_readable(smallest: u64, decimals: u8) -> f64 {
    smallest as f64 / 10f64.powi(decimals as i32)
}

/// Render a smallest-unit amount with fixed 6 decimal-place precision, the
/// way it is displayed in the UI.
pub fn format_readable(smallest: u64, decimals: u8) -> String {
    format!("{:.6}", to_readable(smallest, decimals))
}
