use chrono::NaiveDate;

/// Placeholder shown when an indicator cannot be computed.
pub const NOT_AVAILABLE: &str = "—";

/// Format a floating-point number with thousands separators and a fixed number
/// of decimal places.
///
/// # Examples
///
/// ```
/// use cme_core::formatting::format_number;
///
/// assert_eq!(format_number(1234.5,  1), "1,234.5");
/// assert_eq!(format_number(1234567.0, 0), "1,234,567");
/// assert_eq!(format_number(0.0, 2), "0.00");
/// assert_eq!(format_number(-9876.5, 1), "-9,876.5");
/// ```
pub fn format_number(value: f64, decimals: u32) -> String {
    // Handle the sign separately so the thousands grouping works on the
    // absolute value.
    let negative = value < 0.0;
    let abs_value = value.abs();

    // Round to the requested decimal places.
    // Add a tiny epsilon (half ULP at the target precision) before rounding
    // to avoid IEEE 754 binary-representation issues at exact midpoints.
    let factor = 10_f64.powi(decimals as i32);
    let epsilon = f64::EPSILON * abs_value * factor;
    let rounded = ((abs_value * factor) + epsilon).round() / factor;

    let integer_part = rounded.trunc() as u64;
    let frac_part = rounded - rounded.trunc();

    let int_str = integer_part.to_string();
    let grouped = group_thousands(&int_str);

    let result = if decimals == 0 {
        grouped
    } else {
        // Format the fractional part to the exact number of decimals.
        let frac_str = format!("{:.prec$}", frac_part, prec = decimals as usize);
        // `frac_str` starts with "0.", e.g. "0.50". Strip the leading "0".
        let decimal_digits = &frac_str[1..];
        format!("{}{}", grouped, decimal_digits)
    };

    if negative {
        format!("-{}", result)
    } else {
        result
    }
}

/// Format an intervention count for a KPI card: no decimals, thousands
/// separators.
///
/// # Examples
///
/// ```
/// use cme_core::formatting::format_count;
///
/// assert_eq!(format_count(12845.0), "12,845");
/// ```
pub fn format_count(value: f64) -> String {
    format_number(value, 0)
}

/// Format a ratio as a percentage with one decimal place.
///
/// The input is the raw ratio (0.25, not 25).
///
/// # Examples
///
/// ```
/// use cme_core::formatting::format_percent;
///
/// assert_eq!(format_percent(0.253), "25.3%");
/// assert_eq!(format_percent(-0.25), "-25.0%");
/// ```
pub fn format_percent(ratio: f64) -> String {
    format!("{}%", format_number(ratio * 100.0, 1))
}

/// Label for a monthly bucket: `YYYY-MM`, or `sin fecha` for the bucket of
/// rows with no interpretable month.
pub fn format_month(month: Option<NaiveDate>) -> String {
    match month {
        Some(date) => date.format("%Y-%m").to_string(),
        None => "sin fecha".to_string(),
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    let remainder = chars.len() % 3;
    for (i, &c) in chars.iter().enumerate() {
        if i != 0 && (i % 3 == remainder) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

// ── Tests ──────────────────────────────────────────────────────────────────────
