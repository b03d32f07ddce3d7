//! Display formatting shared by every presentation surface.

/// Headline titles longer than this are cut and suffixed with `...`.
pub const TITLE_DISPLAY_LIMIT: usize = 100;

/// `$185.64`
pub fn format_price(value: f64) -> String {
    format!("${value:.2}")
}

/// `1.39 (0.75%)`
pub fn format_delta(change: f64, percent: f64) -> String {
    format!("{change:.2} ({percent:.2}%)")
}

/// Billions with two decimals (`$2915.40B`), or `N/A`.
pub fn format_market_cap(market_cap: Option<f64>) -> String {
    match market_cap {
        Some(value) => format!("${:.2}B", value / 1e9),
        None => String::from("N/A"),
    }
}

/// Whole number with comma thousands separators.
pub fn format_volume(volume: u64) -> String {
    let digits = volume.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Three-decimal score text used for polarity and subjectivity.
pub fn format_score(value: f64) -> String {
    format!("{value:.3}")
}

/// Cuts a title to [`TITLE_DISPLAY_LIMIT`] characters plus `...` when it is longer.
pub fn truncate_title(title: &str) -> String {
    if title.chars().count() > TITLE_DISPLAY_LIMIT {
        let mut cut: String = title.chars().take(TITLE_DISPLAY_LIMIT).collect();
        cut.push_str("...");
        cut
    } else {
        title.to_owned()
    }
}

/// Change from `previous` to `current` and its percentage; 0% when `previous` is zero.
pub fn price_change(current: f64, previous: f64) -> (f64, f64) {
    let change = current - previous;
    let percent = if previous == 0.0 {
        0.0
    } else {
        change / previous * 100.0
    };
    (change, percent)
}
