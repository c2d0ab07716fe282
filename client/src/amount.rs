//! Ether amount parsing and formatting.
//!
//! Amounts travel as decimal ether strings in records (`"0.5"`) and as wei
//! quantities on the wire (`0x6f05b59d3b20000`).

use crate::error::ClientError;

/// Decimal places between ether and wei.
pub const ETHER_DECIMALS: u32 = 18;

const WEI_PER_ETHER: u128 = 10u128.pow(ETHER_DECIMALS);

/// Parse a decimal ether amount (`"1"`, `"0.5"`, `".25"`) into wei.
///
/// Signs, exponents, separators and more than 18 fractional digits are rejected.
pub fn parse_ether(input: &str) -> Result<u128, ClientError> {
    let invalid = || ClientError::InvalidAmount(input.to_string());
    let s = input.trim();

    let (whole, frac) = match s.split_once('.') {
        Some((w, f)) => (w, f),
        None => (s, ""),
    };
    if whole.is_empty() && frac.is_empty() {
        return Err(invalid());
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    if frac.len() > ETHER_DECIMALS as usize {
        return Err(invalid());
    }

    let whole_wei = if whole.is_empty() {
        0
    } else {
        whole
            .parse::<u128>()
            .ok()
            .and_then(|w| w.checked_mul(WEI_PER_ETHER))
            .ok_or_else(invalid)?
    };
    let frac_wei = if frac.is_empty() {
        0
    } else {
        let padded = format!("{frac:0<width$}", width = ETHER_DECIMALS as usize);
        padded.parse::<u128>().map_err(|_| invalid())?
    };
    whole_wei.checked_add(frac_wei).ok_or_else(invalid)
}

/// Format wei as a decimal ether string. Whole amounts keep one decimal
/// place (`"1.0"`); trailing zeros are otherwise trimmed.
pub fn format_ether(wei: u128) -> String {
    let whole = wei / WEI_PER_ETHER;
    let frac = wei % WEI_PER_ETHER;
    if frac == 0 {
        return format!("{whole}.0");
    }
    let digits = format!("{frac:018}");
    format!("{whole}.{}", digits.trim_end_matches('0'))
}

/// Encode a quantity as a JSON-RPC hex string (`0x0`, `0x5208`).
pub fn to_hex_quantity(value: u128) -> String {
    format!("{value:#x}")
}

/// Decode a JSON-RPC hex quantity.
pub fn parse_hex_quantity(s: &str) -> Option<u128> {
    let digits = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X"))?;
    if digits.is_empty() {
        return None;
    }
    u128::from_str_radix(digits, 16).ok()
}
