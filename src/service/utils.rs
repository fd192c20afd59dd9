//! Conversions between human-readable decimal amounts and base units.
//!
//! TEA and every token the dapp touches use 18 decimals, so amounts are always
//! scaled by 10^18.

use alloy::primitives::{Address, U256};
use rust_decimal::Decimal;
use std::str::FromStr;

use super::ServiceResult;
use super::error::ServiceError;

/// Decimals of TEA, ZNCT and the deployable token template.
pub const BASE_UNIT_DECIMALS: u8 = 18;

/// Parse a positive decimal string (e.g. "1.5") into 18-decimal base units.
///
/// Accepts an optional fractional part of at most 18 digits. Signs, exponents
/// and separators are rejected, as is anything that does not come out strictly
/// greater than zero.
///
/// # Examples
/// - "1" -> 1000000000000000000
/// - "0.000000000000000001" -> 1
pub fn to_base_units(amount: &str) -> ServiceResult<U256> {
    let amount = amount.trim();
    if amount.is_empty() {
        return Err(ServiceError::InvalidAmount(
            "Please fill all fields".to_string(),
        ));
    }

    let (whole, fraction) = amount.split_once('.').unwrap_or((amount, ""));

    let is_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (whole.is_empty() && fraction.is_empty()) || !is_digits(whole) || !is_digits(fraction) {
        return Err(ServiceError::InvalidAmount(format!(
            "'{amount}' is not a decimal number"
        )));
    }

    if fraction.len() > BASE_UNIT_DECIMALS as usize {
        return Err(ServiceError::InvalidAmount(format!(
            "'{amount}' has more than {BASE_UNIT_DECIMALS} decimal places"
        )));
    }

    // Right-pad the fraction so whole and fraction form one integer string
    let digits = format!(
        "{whole}{fraction:0<width$}",
        width = BASE_UNIT_DECIMALS as usize
    );

    let value = U256::from_str_radix(&digits, 10)
        .map_err(|e| ServiceError::InvalidAmount(format!("'{amount}' is out of range: {e}")))?;

    if value.is_zero() {
        return Err(ServiceError::InvalidAmount(
            "Amount must be greater than 0".to_string(),
        ));
    }

    Ok(value)
}

/// Inverse of [`to_base_units`]: render base units as a canonical decimal string.
pub fn from_base_units(value: U256) -> String {
    format_balance(value, BASE_UNIT_DECIMALS)
}

/// Format balance from smallest unit to human-readable format
///
/// # Returns
/// Formatted balance as string with trailing zeros removed
pub fn format_balance(balance: U256, decimals: u8) -> String {
    let divisor = U256::from(10u64).pow(U256::from(decimals));
    let whole = balance / divisor;
    let remainder = balance % divisor;

    if remainder.is_zero() {
        whole.to_string()
    } else {
        let decimal_part = remainder.to_string();
        let padded = format!("{:0>width$}", decimal_part, width = decimals as usize);
        let trimmed = padded.trim_end_matches('0');
        if trimmed.is_empty() {
            whole.to_string()
        } else {
            format!("{whole}.{trimmed}")
        }
    }
}

/// Convert U256 to Decimal with proper decimal scaling
pub fn u256_to_decimal(value: U256, decimals: u8) -> ServiceResult<Decimal> {
    let mut decimal = Decimal::from_str(&value.to_string()).map_err(|e| {
        ServiceError::InvalidAmount(format!("Failed to parse U256 to Decimal: {}", e))
    })?;

    if decimals > 0 {
        let divisor = Decimal::from(10u64.pow(decimals as u32));
        decimal /= divisor;
    }

    Ok(decimal.normalize())
}

/// TEA received per ZNCT sold, for a quote of `amount_out` TEA for `amount_in` ZNCT.
pub fn calculate_rate(amount_in: U256, amount_out: U256) -> ServiceResult<Decimal> {
    if amount_in.is_zero() {
        return Err(ServiceError::InvalidAmount("Division by zero".to_string()));
    }

    let input = u256_to_decimal(amount_in, BASE_UNIT_DECIMALS)?;
    let output = u256_to_decimal(amount_out, BASE_UNIT_DECIMALS)?;

    Ok((output / input).normalize())
}

/// Short form of an address for status displays: `0x1234...abcd`.
pub fn truncate_address(address: &Address) -> String {
    let checksummed = address.to_checksum(None);
    let len = checksummed.len();
    format!("{}...{}", &checksummed[..6], &checksummed[len - 4..])
}
