/// Largest scale a 256-bit token amount can carry.
pub const MAX_DECIMALS: u32 = 77;

/// Render an unsigned base-unit integer string with `decimals` places.
///
/// Trailing fractional zeros are dropped. Returns `None` for anything that
/// is not a non-empty run of ASCII digits, or when `decimals` exceeds
/// [`MAX_DECIMALS`].
pub fn format_units(value: &str, decimals: u32) -> Option<String> {
    if decimals > MAX_DECIMALS {
        return None;
    }
    let value = value.trim();
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let decimals = decimals as usize;
    let padded = if value.len() <= decimals {
        format!("{}{}", "0".repeat(decimals + 1 - value.len()), value)
    } else {
        value.to_string()
    };
    let (integer, fraction) = padded.split_at(padded.len() - decimals);

    let integer = integer.trim_start_matches('0');
    let integer = if integer.is_empty() { "0" } else { integer };
    let fraction = fraction.trim_end_matches('0');

    if fraction.is_empty() {
        Some(integer.to_string())
    } else {
        Some(format!("{}.{}", integer, fraction))
    }
}
