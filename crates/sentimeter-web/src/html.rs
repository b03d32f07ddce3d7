//! HTML page assembly.

use std::fmt::Write;

use sentimeter_core::dashboard::{PricePanel, SentimentView, DASHBOARD_TITLE, DISCLAIMER};
use sentimeter_core::{DashboardReport, MarketPanel, Period, SentimentPanel};

use crate::charts::{self, ChartError};

const STYLE: &str = "body{font-family:sans-serif;margin:0;display:flex}\
aside{width:220px;padding:16px;background:#f0f2f6;min-height:100vh}\
main{flex:1;padding:16px 32px}\
.metrics{display:flex;gap:48px;margin:16px 0}\
.metric .label{color:#555;font-size:14px}.metric .value{font-size:28px}\
.delta-up{color:green}.delta-down{color:#d62728}\
.row{display:flex;gap:24px;flex-wrap:wrap}\
.error{background:#fde2e2;padding:12px;border-radius:4px}\
.warning{background:#fff4ce;padding:12px;border-radius:4px}\
table{border-collapse:collapse;width:100%}td,th{border-bottom:1px solid #ddd;padding:6px;text-align:left}\
.note{color:#555;font-size:13px;margin-top:32px}";

/// Escapes text for element content and double-quoted attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

// Writing into a String cannot fail; `write!` results are discarded below.

pub fn render_page(report: &DashboardReport) -> Result<String, ChartError> {
    let mut out = String::new();
    let _ = write!(
        out,
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>{}</title><style>{STYLE}</style></head><body>",
        escape_html(DASHBOARD_TITLE)
    );
    write_sidebar(&mut out, report);
    let _ = write!(out, "<main><h1>{}</h1>", escape_html(DASHBOARD_TITLE));

    match &report.market {
        MarketPanel::Unavailable { message, raw, .. } => {
            let _ = write!(
                out,
                "<div class=\"error\">{}</div><p>Raw data received:</p><pre>{}</pre>",
                escape_html(message),
                escape_html(&raw.to_string())
            );
        }
        MarketPanel::Ready(panel) => {
            write_price_panel(&mut out, panel)?;
            match &report.sentiment {
                Some(SentimentPanel::Analyzed(view)) => write_sentiment(&mut out, view)?,
                Some(SentimentPanel::NoNews { warning }) => {
                    let _ = write!(out, "<div class=\"warning\">{}</div>", escape_html(warning));
                }
                None => {}
            }
            let _ = write!(out, "<p class=\"note\">{}</p>", escape_html(DISCLAIMER));
        }
    }

    let _ = write!(out, "</main></body></html>");
    Ok(out)
}

fn write_sidebar(out: &mut String, report: &DashboardReport) {
    let symbol = escape_html(&report.symbol);
    let _ = write!(
        out,
        "<aside><h3>Settings</h3><form method=\"get\" action=\"/\">\
<label>Enter Stock Symbol<br><input name=\"symbol\" value=\"{symbol}\"></label><br><br>\
<label>Analysis Period<br><select name=\"period\">"
    );
    for period in Period::ALL {
        let selected = if period == report.period { " selected" } else { "" };
        let _ = write!(out, "<option value=\"{period}\"{selected}>{period}</option>");
    }
    let _ = write!(
        out,
        "</select></label><br><br><button type=\"submit\">Analyze</button></form>\
<form method=\"post\" action=\"/refresh\"><input type=\"hidden\" name=\"symbol\" value=\"{symbol}\">\
<input type=\"hidden\" name=\"period\" value=\"{}\"><br><button type=\"submit\">Refresh Data</button></form>\
<p class=\"note\">model: {}</p></aside>",
        report.period,
        escape_html(report.model)
    );
}

fn metric(out: &mut String, label: &str, value: &str, delta: Option<(&str, bool)>) {
    let _ = write!(
        out,
        "<div class=\"metric\"><div class=\"label\">{}</div><div class=\"value\">{}</div>",
        escape_html(label),
        escape_html(value)
    );
    if let Some((delta, up)) = delta {
        let class = if up { "delta-up" } else { "delta-down" };
        let _ = write!(out, "<div class=\"{class}\">{}</div>", escape_html(delta));
    }
    let _ = write!(out, "</div>");
}

fn write_price_panel(out: &mut String, panel: &PricePanel) -> Result<(), ChartError> {
    let metrics = &panel.metrics;
    if let Some(name) = &panel.company_name {
        let _ = write!(out, "<h2>{}</h2>", escape_html(name));
    }

    let _ = write!(out, "<div class=\"metrics\">");
    metric(
        out,
        &metrics.title,
        &metrics.price,
        Some((&metrics.delta, metrics.change >= 0.0)),
    );
    if let Some(market_cap) = &metrics.market_cap {
        metric(out, "Market Cap", market_cap, None);
    }
    metric(out, "Volume", &metrics.volume, None);
    let _ = write!(out, "</div>");

    let _ = write!(out, "<section>{}</section>", charts::price_chart(&panel.chart)?);
    Ok(())
}

fn write_sentiment(out: &mut String, view: &SentimentView) -> Result<(), ChartError> {
    let _ = write!(out, "<h2>📰 News Sentiment Analysis</h2><div class=\"row\">");
    let _ = write!(out, "<div>{}</div>", charts::gauge_chart(&view.gauge)?);
    let _ = write!(out, "<div>{}</div>", charts::pie_chart(&view.distribution)?);
    let _ = write!(out, "</div><div class=\"metrics\">");
    metric(out, "Overall Sentiment", view.overview.label.as_str(), None);
    metric(out, "Sentiment Score", &view.overview.score, None);
    metric(out, "Subjectivity", &view.overview.subjectivity, None);
    let _ = write!(out, "</div>");

    let _ = write!(
        out,
        "<h2>📋 Recent News Headlines</h2><table><thead><tr>\
<th>Title</th><th>Sentiment</th><th>Score</th><th>Source</th><th>Published</th>\
</tr></thead><tbody>"
    );
    for row in &view.headlines {
        let _ = write!(
            out,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape_html(&row.title),
            row.label,
            escape_html(&row.score),
            escape_html(&row.source),
            escape_html(&row.published)
        );
    }
    let _ = write!(out, "</tbody></table>");

    let _ = write!(
        out,
        "<section>{}</section>",
        charts::timeline_chart(&view.timeline)?
    );
    Ok(())
}
