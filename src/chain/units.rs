//! Conversion between yoctoNEAR and decimal NEAR text.

/// Decimal places in one NEAR.
pub const NEAR_DECIMALS: u32 = 24;

/// yoctoNEAR in one NEAR.
pub const ONE_NEAR: u128 = 10u128.pow(NEAR_DECIMALS);

/// Parse `"1.5"` into yoctoNEAR. `None` for anything that is not a plain
/// non-negative decimal with at most 24 fractional digits.
pub fn parse_near_amount(text: &str) -> Option<u128> {
    let text = text.trim().replace(',', "");
    let (whole, fraction) = match text.split_once('.') {
        Some((w, f)) => (w, f),
        None => (text.as_str(), ""),
    };
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    if fraction.len() > NEAR_DECIMALS as usize {
        return None;
    }
    let digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if !digits(whole) || !digits(fraction) {
        return None;
    }

    let whole: u128 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let padded = format!("{:0<width$}", fraction, width = NEAR_DECIMALS as usize);
    let fraction: u128 = padded.parse().ok()?;
    whole.checked_mul(ONE_NEAR)?.checked_add(fraction)
}

/// Format yoctoNEAR as NEAR, truncated to `decimals` places.
pub fn format_near_amount(yocto: u128, decimals: u32) -> String {
    let decimals = decimals.min(NEAR_DECIMALS);
    let whole = yocto / ONE_NEAR;
    if decimals == 0 {
        return whole.to_string();
    }
    let fraction = (yocto % ONE_NEAR) / 10u128.pow(NEAR_DECIMALS - decimals);
    format!("{}.{:0width$}", whole, fraction, width = decimals as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(parse_near_amount("1"), Some(ONE_NEAR));
        assert_eq!(parse_near_amount("1.5"), Some(ONE_NEAR + ONE_NEAR / 2));
        assert_eq!(parse_near_amount(".25"), Some(ONE_NEAR / 4));
        assert_eq!(parse_near_amount("1,000"), Some(1000 * ONE_NEAR));
        assert_eq!(parse_near_amount("0.000000000000000000000001"), Some(1));
    }

    #[test]
    fn test_parse_rejects() {
        assert_eq!(parse_near_amount(""), None);
        assert_eq!(parse_near_amount("."), None);
        assert_eq!(parse_near_amount("-1"), None);
        assert_eq!(parse_near_amount("1e3"), None);
        assert_eq!(parse_near_amount("0.0000000000000000000000001"), None);
    }

    #[test]
    fn test_format() {
        assert_eq!(format_near_amount(ONE_NEAR + ONE_NEAR / 2, 2), "1.50");
        assert_eq!(format_near_amount(123_456_789, 2), "0.00");
        assert_eq!(format_near_amount(7 * ONE_NEAR, 0), "7");
    }
}
