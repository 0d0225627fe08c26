/// Formats `value` with `digits` significant digits, the way C's `%g` conversion does.
///
/// Fixed notation is used when the decimal exponent lies in `-4..digits`, scientific notation
/// otherwise. Trailing zeros of the fraction are removed in both cases.
///
/// # Examples
///
/// ```
/// use rs_nbody::utils::format_significant;
///
/// assert_eq!(format_significant(0.5, 9), "0.5");
/// assert_eq!(format_significant(1234.5678, 9), "1234.5678");
/// assert_eq!(format_significant(0.00001, 9), "1e-05");
/// assert_eq!(format_significant(-3.0, 9), "-3");
/// ```
pub fn format_significant(value: f64, digits: usize) -> String {
    if value == 0.0 {
        return if value.is_sign_negative() { "-0".to_string() } else { "0".to_string() };
    }
    if !value.is_finite() {
        return value.to_string();
    }
    let digits = digits.max(1);

    // Rounding to `digits` may carry into the next power of ten, so the exponent is read back
    // from the formatted scientific representation rather than computed with log10.
    let scientific = format!("{:.*e}", digits - 1, value);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => return scientific,
    };

    if exponent < -4 || exponent >= digits as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim_fraction(mantissa), sign, exponent.abs())
    } else {
        let decimals = (digits as i32 - 1 - exponent) as usize;
        trim_fraction(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn trim_fraction(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}
