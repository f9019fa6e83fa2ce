use rust_decimal::Decimal;
use std::str::FromStr;

/// Parses a monetary amount from free-form input, degrading to zero instead of failing.
///
/// Leading whitespace is skipped and the longest numeric prefix is read, so
/// `"12.50 EUR"` yields `12.50`. Input with no numeric prefix, values that do
/// not fit a [`Decimal`], and negative results all become zero.
pub fn parse_amount(raw: &str) -> Decimal {
    let trimmed = raw.trim_start();
    let prefix = numeric_prefix(trimmed);
    if prefix.is_empty() {
        return Decimal::ZERO;
    }
    let (sign, unsigned) = match prefix.strip_prefix(['+', '-']) {
        Some(rest) => (&prefix[..1], rest),
        None => ("", prefix),
    };
    let literal = if unsigned.starts_with('.') {
        format!("{sign}0{unsigned}")
    } else {
        format!("{sign}{unsigned}")
    };
    let parsed = if literal.contains(['e', 'E']) {
        Decimal::from_scientific(&literal).ok()
    } else {
        Decimal::from_str(&literal).ok()
    };
    match parsed {
        Some(value) if value.is_sign_negative() => Decimal::ZERO,
        Some(value) => value.normalize(),
        None => Decimal::ZERO,
    }
}

/// Returns the longest prefix shaped like `[+-]?(d+[.d*]|.d+)([eE][+-]?d+)?`.
fn numeric_prefix(input: &str) -> &str {
    let bytes = input.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        let frac_digits = frac_end - frac_start;
        if digits > 0 || frac_digits > 0 {
            // A bare trailing dot ("12.") is dropped so the decimal parser accepts it.
            end = if frac_digits > 0 { frac_end } else { end };
            digits += frac_digits;
        }
    }

    if digits == 0 {
        return "";
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    &input[..end]
}

/// Serde adapter writing amounts as exact JSON numbers.
///
/// The decimal text is emitted verbatim, so values beyond `f64` precision
/// survive a save and reload unchanged. Trailing fractional zeros are dropped
/// first, which keeps whole amounts as plain integers.
pub mod json_number {
    use rust_decimal::Decimal;
    use serde::Serializer;

    pub fn serialize<S>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        rust_decimal::serde::arbitrary_precision::serialize(&value.normalize(), serializer)
    }
}
