//! Fixed-point number formatting for G-code words.

/// Decimal places needed to resolve `accuracy`: `ceil(-log10(accuracy))`.
///
/// A small slack absorbs the rounding of `log10` so that exact powers of
/// ten map to their own exponent (1e-4 gives 4, not 5).
pub fn places_for(accuracy: f64) -> usize {
    let places = (-accuracy.log10() - 1e-9).ceil();
    if places > 0.0 {
        places as usize
    } else {
        0
    }
}

/// Format `value` with exactly `places` decimals, never in exponent form.
///
/// Values that round to zero are printed without a sign.
pub fn format_number(value: f64, places: usize) -> String {
    let text = format!("{:.*}", places, value);
    match text.strip_prefix('-') {
        Some(unsigned) if unsigned.chars().all(|c| c == '0' || c == '.') => unsigned.to_string(),
        _ => text,
    }
}
