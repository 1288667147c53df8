//! Search-space arithmetic.
//!
//! The number of candidates is `charset_len ^ byte_size`, which leaves the
//! integer range after a dozen bytes, so everything here works in `f64`.

const SECONDS_PER_MINUTE: f64 = 60.0;
const SECONDS_PER_HOUR: f64 = 3_600.0;
const SECONDS_PER_DAY: f64 = 86_400.0;
const SECONDS_PER_YEAR: f64 = 31_536_000.0;

/// Number of distinct candidates of `byte_size` bytes over `charset_len` symbols.
pub fn combinations(charset_len: usize, byte_size: usize) -> f64 {
    // powi takes i32; anything past that is infinite for every charset > 1 anyway.
    let exponent = i32::try_from(byte_size).unwrap_or(i32::MAX);
    (charset_len as f64).powi(exponent)
}

/// Format a count for humans.
///
/// Below one million: a grouped integer (`123,456`).
/// Otherwise scientific notation with two decimals (`1.23 × 10^45`).
pub fn format_large_number(number: f64) -> String {
    if !number.is_finite() {
        return "more than 10^308".to_string();
    }
    if number < 1e6 {
        return group_thousands(number.round() as u64);
    }

    let exponent = number.log10().floor();
    let mantissa = number / 10f64.powf(exponent);
    format!("{:.2} × 10^{}", mantissa, exponent as i64)
}

/// Format a duration in seconds using the largest sensible unit.
pub fn format_time_estimate(seconds: f64) -> String {
    if seconds < SECONDS_PER_MINUTE {
        format!("{:.2} seconds", seconds)
    } else if seconds < SECONDS_PER_HOUR {
        format!("{:.2} minutes", seconds / SECONDS_PER_MINUTE)
    } else if seconds < SECONDS_PER_DAY {
        format!("{:.2} hours", seconds / SECONDS_PER_HOUR)
    } else if seconds < SECONDS_PER_YEAR {
        format!("{:.2} days", seconds / SECONDS_PER_DAY)
    } else if seconds < SECONDS_PER_YEAR * 100.0 {
        format!("{:.2} years", seconds / SECONDS_PER_YEAR)
    } else {
        format!("{} years", format_large_number(seconds / SECONDS_PER_YEAR))
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}
