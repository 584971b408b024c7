//! Display formatting for dashboard values.

const SUFFIXES: [&str; 9] = ["", "k", "M", "B", "T", "P", "E", "Z", "Y"];

/// Abbreviate a large number with a magnitude suffix: `1_234_567.0` at
/// precision 2 becomes `"1.23M"`. Trailing zeros are dropped (`"1M"`).
pub fn millify(value: f64, precision: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let mut idx = 0;
    let mut scaled = value;
    while scaled.abs() >= 1000.0 && idx < SUFFIXES.len() - 1 {
        scaled /= 1000.0;
        idx += 1;
    }

    let text = trim_zeros(format!("{:.*}", precision, scaled));
    format!("{}{}", text, SUFFIXES[idx])
}

/// Fraction as a percentage: `0.2345` -> `"23.45%"`.
pub fn percent(fraction: f64, precision: usize) -> String {
    format!("{:.*}%", precision, fraction * 100.0)
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn trim_zeros(text: String) -> String {
    if !text.contains('.') {
        return text;
    }
    let trimmed = text.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "-0" => "0".to_string(),
        other => other.to_string(),
    }
}
