use rust_decimal::Decimal;
use std::str::FromStr;
use thiserror::Error;

/// Decimal exponent of the ledger's smallest unit (1 token = 10^24 yocto).
pub const NOMINATION_EXP: u32 = 24;

/// Fractional digits shown on the dashboard.
pub const DISPLAY_FRAC_DIGITS: u32 = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("invalid amount: {0:?}")]
    Invalid(String),
    #[error("negative amount: {0}")]
    Negative(String),
    #[error("amount {0} has more than {exp} fractional digits", exp = NOMINATION_EXP)]
    TooPrecise(String),
    #[error("amount {0} does not fit in u128")]
    Overflow(String),
}

fn unit() -> u128 {
    10u128.pow(NOMINATION_EXP)
}

/// Convert a human amount ("1", "0.25", "1,000.5") to yocto units.
pub fn parse_amount(input: &str) -> Result<u128, FormatError> {
    let cleaned: String = input.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return Err(FormatError::Invalid(input.to_string()));
    }

    let frac_len = cleaned.split_once('.').map_or(0, |(_, frac)| frac.len());
    if frac_len > NOMINATION_EXP as usize {
        return Err(FormatError::TooPrecise(cleaned));
    }

    let value = Decimal::from_str(&cleaned).map_err(|_| FormatError::Invalid(input.to_string()))?;
    if value.is_sign_negative() && !value.is_zero() {
        return Err(FormatError::Negative(cleaned));
    }

    // Decimal keeps at most 28 significant digits, so the exact value is
    // rebuilt from the text: whole digits, fraction digits, then zero padding.
    let digits = cleaned.trim_start_matches(['-', '+']);
    let (whole, frac) = digits.split_once('.').unwrap_or((digits, ""));
    let padding = std::iter::repeat(0).take(NOMINATION_EXP as usize - frac.len());
    whole
        .chars()
        .chain(frac.chars())
        .filter_map(|c| c.to_digit(10))
        .chain(padding)
        .try_fold(0u128, |acc, d| acc.checked_mul(10)?.checked_add(u128::from(d)))
        .ok_or(FormatError::Overflow(cleaned))
}

/// Render yocto units as a display string rounded to `frac_digits`,
/// with comma-grouped whole part and trailing zeros trimmed.
pub fn format_amount(yocto: u128, frac_digits: u32) -> String {
    let frac_digits = frac_digits.min(NOMINATION_EXP);
    let mut amount = yocto;
    if frac_digits < NOMINATION_EXP {
        let half = 5 * 10u128.pow(NOMINATION_EXP - frac_digits - 1);
        amount = amount.saturating_add(half);
    }

    let whole = group_thousands(amount / unit());
    let frac = format!("{:0width$}", amount % unit(), width = NOMINATION_EXP as usize);
    let frac = frac[..frac_digits as usize].trim_end_matches('0');

    if frac.is_empty() {
        whole
    } else {
        format!("{}.{}", whole, frac)
    }
}

fn group_thousands(n: u128) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Two-digit ticket number: 7 -> "07", 42 -> "42".
pub fn format_number(n: u8) -> String {
    format!("{:02}", n)
}
