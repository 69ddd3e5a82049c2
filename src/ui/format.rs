use crate::data::model::Metric;

/// Insert `,` every three digits of a non-negative integer string.
fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Fixed-point with grouped thousands, e.g. `-1,234.50` for `decimals = 2`.
fn grouped(value: f64, decimals: usize) -> String {
    let text = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };
    let sign = if value < 0.0 && text.chars().any(|c| c != '0' && c != '.') {
        "-"
    } else {
        ""
    };
    match frac_part {
        Some(f) => format!("{sign}{}.{f}", group_thousands(int_part)),
        None => format!("{sign}{}", group_thousands(int_part)),
    }
}

/// Decimals that keep 12 significant digits before trimming.
fn plain_decimals(value: f64) -> usize {
    const SIGNIFICANT: usize = 12;
    let magnitude = value.abs();
    let int_digits = if magnitude >= 1.0 {
        magnitude.log10().floor() as usize + 1
    } else {
        1
    };
    SIGNIFICANT.saturating_sub(int_digits)
}

/// Full table cell text: `$1,234.56` for money, `1,234.5` otherwise.
pub fn format_metric_value(value: f64, metric: Metric) -> String {
    if metric.is_currency() {
        let body = grouped(value, 2);
        match body.strip_prefix('-') {
            Some(rest) => format!("-${rest}"),
            None => format!("${body}"),
        }
    } else {
        let body = grouped(value, plain_decimals(value));
        if body.contains('.') {
            body.trim_end_matches('0').trim_end_matches('.').to_string()
        } else {
            body
        }
    }
}

/// Short axis label with an SI suffix, e.g. `$1.5G` or `12k`.
pub fn format_compact(value: f64, currency: bool) -> String {
    const SUFFIXES: [(f64, &str); 4] = [(1e12, "T"), (1e9, "G"), (1e6, "M"), (1e3, "k")];

    let magnitude = value.abs();
    let (scaled, suffix) = SUFFIXES
        .iter()
        .find(|(scale, _)| magnitude >= *scale)
        .map(|&(scale, s)| (value / scale, s))
        .unwrap_or((value, ""));

    let mut number = format!("{scaled:.2}");
    if number.contains('.') {
        number = number.trim_end_matches('0').trim_end_matches('.').to_string();
    }
    if currency {
        format!("${number}{suffix}")
    } else {
        format!("{number}{suffix}")
    }
}
