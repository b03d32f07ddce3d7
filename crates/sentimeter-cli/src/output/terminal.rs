//! Plain-text rendering of dashboard panels.

use std::fmt::Write;

use sentimeter_core::dashboard::format::{format_score, truncate_title};
use sentimeter_core::dashboard::view::{GAUGE_MAX, GAUGE_MIN};
use sentimeter_core::dashboard::{
    PricePanel, SentimentGauge, SentimentView, DASHBOARD_TITLE, DISCLAIMER,
};
use sentimeter_core::{DashboardReport, MarketData, MarketPanel, Period, SentimentPanel, Symbol};

use crate::commands::news::NewsResponseData;
use crate::commands::score::ScoreResponseData;

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
const GAUGE_WIDTH: usize = 41;

// `write!` into a String cannot fail, so results are discarded throughout.

pub fn render_dashboard(report: &DashboardReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{DASHBOARD_TITLE}");
    let _ = writeln!(
        out,
        "{} · {} · model {}",
        report.symbol, report.period, report.model
    );
    let _ = writeln!(out);

    match &report.market {
        MarketPanel::Unavailable { message, raw, .. } => {
            let _ = writeln!(out, "error: {message}");
            let _ = writeln!(out, "Raw data received:");
            let _ = writeln!(out, "{raw}");
            return out;
        }
        MarketPanel::Ready(panel) => write_price_panel(&mut out, panel),
    }

    let _ = writeln!(out);
    match &report.sentiment {
        Some(SentimentPanel::Analyzed(view)) => write_sentiment(&mut out, view),
        Some(SentimentPanel::NoNews { warning }) => {
            let _ = writeln!(out, "warning: {warning}");
        }
        None => {}
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{DISCLAIMER}");
    out
}

fn write_price_panel(out: &mut String, panel: &PricePanel) {
    let metrics = &panel.metrics;
    if let Some(name) = &panel.company_name {
        let _ = writeln!(out, "{name}");
    }
    let _ = writeln!(
        out,
        "{:<20} {}  {}",
        metrics.title, metrics.price, metrics.delta
    );
    if let Some(market_cap) = &metrics.market_cap {
        let _ = writeln!(out, "{:<20} {market_cap}", "Market Cap");
    }
    let _ = writeln!(out, "{:<20} {}", "Volume", metrics.volume);

    let closes: Vec<f64> = panel.chart.points.iter().map(|point| point.close).collect();
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", panel.chart.title);
    if let (Some(first), Some(last), Some((low, high))) = (
        panel.chart.points.first(),
        panel.chart.points.last(),
        panel.chart.close_range(),
    ) {
        let _ = writeln!(out, "  {}", sparkline(&closes));
        let _ = writeln!(
            out,
            "  {} .. {}   low {low:.2}  high {high:.2}",
            first.label, last.label
        );
    }
}

fn write_sentiment(out: &mut String, view: &SentimentView) {
    let _ = writeln!(out, "{:<20} {}", "Overall Sentiment", view.overview.label);
    let _ = writeln!(out, "{:<20} {}", "Sentiment Score", view.overview.score);
    let _ = writeln!(out, "{:<20} {}", "Subjectivity", view.overview.subjectivity);
    let _ = writeln!(out, "{}", gauge_line(&view.gauge));

    let distribution = view
        .distribution
        .iter()
        .map(|slice| format!("{} {}", slice.label, slice.count))
        .collect::<Vec<_>>()
        .join(" · ");
    let _ = writeln!(out, "{:<20} {distribution}", "Sentiment Distribution");

    let _ = writeln!(out);
    let _ = writeln!(out, "📋 Recent News Headlines");
    let _ = writeln!(
        out,
        "{:>3}  {:<9} {:>7}  {:<16} {:<16}  Title",
        "#", "Sentiment", "Score", "Source", "Published"
    );
    for (index, row) in view.headlines.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>3}  {:<9} {:>7}  {:<16} {:<16}  {}",
            index + 1,
            row.label.as_str(),
            row.score,
            clip(&row.source, 16),
            row.published,
            row.title
        );
    }
}

fn gauge_line(gauge: &SentimentGauge) -> String {
    let span = GAUGE_MAX - GAUGE_MIN;
    let slot = |value: f64| -> usize {
        let ratio = ((value - GAUGE_MIN) / span).clamp(0.0, 1.0);
        (ratio * (GAUGE_WIDTH - 1) as f64).round() as usize
    };

    let mut cells = vec!['-'; GAUGE_WIDTH];
    cells[slot(gauge.reference)] = '|';
    cells[slot(gauge.threshold)] = '!';
    cells[slot(gauge.value)] = '●';
    let bar: String = cells.into_iter().collect();

    format!(
        "{:<20} [{bar}] {:.1} ({})",
        gauge.title,
        gauge.value,
        gauge.band().color
    )
}

/// One block character per value, scaled between the series minimum and maximum.
pub fn sparkline(values: &[f64]) -> String {
    let (low, high) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(low, high), value| {
            (low.min(*value), high.max(*value))
        });
    let span = high - low;
    let top = SPARK_LEVELS.len() - 1;

    values
        .iter()
        .map(|value| {
            let level = if span > 0.0 {
                (((value - low) / span) * top as f64).round() as usize
            } else {
                top / 2
            };
            SPARK_LEVELS[level.min(top)]
        })
        .collect()
}

pub fn render_prices(symbol: &Symbol, period: Period, data: &MarketData) -> String {
    let mut out = String::new();
    let snapshot = match data {
        MarketData::Available(snapshot) => snapshot,
        MarketData::Unavailable { reason } => {
            let _ = writeln!(out, "{symbol} ({period}): no price data ({reason})");
            return out;
        }
    };

    if let Some(name) = snapshot.issuer.long_name() {
        let _ = writeln!(out, "{name} ({symbol}) · {period}");
    } else {
        let _ = writeln!(out, "{symbol} · {period}");
    }
    let _ = writeln!(
        out,
        "{:<10} {:>10} {:>10} {:>10} {:>10} {:>14}",
        "Date", "Open", "High", "Low", "Close", "Volume"
    );
    for point in &snapshot.history.points {
        let _ = writeln!(
            out,
            "{:<10} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>14}",
            point.date.format_date(),
            point.open,
            point.high,
            point.low,
            point.close,
            point.volume
        );
    }
    out
}

pub fn render_news(data: &NewsResponseData) -> String {
    let mut out = String::new();
    let provider = data.provider.map_or("none", |provider| provider.as_str());
    let _ = writeln!(out, "{} headlines via {provider} · model {}", data.symbol, data.model);

    if let Some(aggregate) = &data.aggregate {
        let _ = writeln!(
            out,
            "overall {} · score {} · subjectivity {}",
            aggregate.label,
            format_score(aggregate.mean_polarity),
            format_score(aggregate.mean_subjectivity)
        );
    }

    for (index, item) in data.headlines.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>3}  {:<9} {:>7}  {:<16}  {}",
            index + 1,
            item.sentiment.label.as_str(),
            format_score(item.sentiment.polarity),
            item.headline.published,
            truncate_title(&item.headline.title)
        );
    }
    out
}

pub fn render_score(data: &ScoreResponseData) -> String {
    format!(
        "{} · polarity {} · subjectivity {} · model {}\n",
        data.result.label,
        format_score(data.result.polarity),
        format_score(data.result.subjectivity),
        data.model
    )
}

fn clip(text: &str, width: usize) -> String {
    if text.chars().count() > width {
        let mut clipped: String = text.chars().take(width - 1).collect();
        clipped.push('…');
        clipped
    } else {
        text.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use sentimeter_core::{DashboardConfig, SentimentResult};

    use super::*;

    #[test]
    fn sparkline_spans_all_levels() {
        assert_eq!(sparkline(&[1.0, 2.0, 3.0]), "▁▅█");
        assert_eq!(sparkline(&[5.0, 5.0]), "▄▄");
        assert_eq!(sparkline(&[]), "");
    }

    #[test]
    fn gauge_marks_needle_reference_and_threshold() {
        let line = gauge_line(&SentimentGauge::new(-1.0));
        assert!(line.contains("[●"));
        assert!(line.contains('|'));
        assert!(line.contains('!'));
        assert!(line.ends_with("-100.0 (red)"));
    }

    #[test]
    fn score_line_uses_three_decimals() {
        let data = ScoreResponseData {
            text: String::from("fine"),
            model: "vader",
            result: SentimentResult::new(0.25, 0.5),
        };
        assert_eq!(
            render_score(&data),
            "Positive · polarity 0.250 · subjectivity 0.500 · model vader\n"
        );
    }

    #[tokio::test]
    async fn unavailable_dashboard_shows_message_and_raw_payload() {
        let service = DashboardConfig::default().with_mock(true).build_service();
        let report = service.run("not a symbol", Period::OneMonth).await;

        let text = render_dashboard(&report);

        assert!(text.contains(
            "error: Could not fetch data for NOT A SYMBOL. Please check the stock symbol or try a different analysis period."
        ));
        assert!(text.contains("Raw data received:\n[]"));
        assert!(!text.contains(DISCLAIMER));
    }

    #[tokio::test]
    async fn mock_dashboard_renders_every_section() {
        let service = DashboardConfig::default().with_mock(true).build_service();
        let report = service.run("AAPL", Period::OneMonth).await;

        let text = render_dashboard(&report);

        assert!(text.contains("AAPL Stock Price"));
        assert!(text.contains("Volume"));
        assert!(text.contains("Overall Sentiment"));
        assert!(text.contains("📋 Recent News Headlines"));
        assert!(text.ends_with(&format!("{DISCLAIMER}\n")));
    }
}
