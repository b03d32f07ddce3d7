//! Server-side SVG charts.
//!
//! Each function returns a standalone `<svg>` document string that the page embeds inline.

use std::f64::consts::PI;

use plotters::prelude::*;
use sentimeter_core::dashboard::{label_color, PieSlice, PriceChart, SentimentGauge, TimelinePoint};
use sentimeter_core::UtcDateTime;

pub const LINE_CHART_SIZE: (u32, u32) = (900, 400);
pub const GAUGE_SIZE: (u32, u32) = (500, 300);
pub const PIE_SIZE: (u32, u32) = (500, 360);

const GRAY: RGBColor = RGBColor(128, 128, 128);
const DARK_BLUE: RGBColor = RGBColor(0, 0, 139);
const DARK_GREEN: RGBColor = RGBColor(0, 128, 0);
const CRIMSON: RGBColor = RGBColor(214, 39, 40);
const GOLD: RGBColor = RGBColor(238, 210, 2);

#[derive(Debug, thiserror::Error)]
#[error("chart rendering failed: {0}")]
pub struct ChartError(String);

fn render_err<E: std::fmt::Display>(error: E) -> ChartError {
    ChartError(error.to_string())
}

fn named_color(name: &str) -> RGBColor {
    match name {
        "green" => DARK_GREEN,
        "red" => CRIMSON,
        "yellow" => GOLD,
        "gray" => GRAY,
        _ => BLACK,
    }
}

/// Label for an integral axis position; blank between points and outside the series.
fn index_label(labels: &[String], position: f64) -> String {
    let rounded = position.round();
    if (position - rounded).abs() > 1e-6 || rounded < 0.0 {
        return String::new();
    }
    labels.get(rounded as usize).cloned().unwrap_or_default()
}

/// Close price over time, one x step per trading day.
pub fn price_chart(chart: &PriceChart) -> Result<String, ChartError> {
    let labels: Vec<String> = chart.points.iter().map(|point| point.label.clone()).collect();
    let (low, high) = chart.close_range().unwrap_or((0.0, 1.0));
    let padding = ((high - low) * 0.1).max(0.5);
    let last_index = chart.points.len().saturating_sub(1).max(1) as f64;

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, LINE_CHART_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;

        let mut ctx = ChartBuilder::on(&root)
            .caption(&chart.title, ("sans-serif", 22).into_font())
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(70)
            .build_cartesian_2d(0f64..last_index, (low - padding).max(0.0)..high + padding)
            .map_err(render_err)?;

        ctx.configure_mesh()
            .x_labels(6)
            .x_label_formatter(&|x| index_label(&labels, *x))
            .y_label_formatter(&|y| format!("{y:.2}"))
            .x_desc("Date")
            .y_desc("Price ($)")
            .draw()
            .map_err(render_err)?;

        ctx.draw_series(LineSeries::new(
            chart
                .points
                .iter()
                .enumerate()
                .map(|(index, point)| (index as f64, point.close)),
            BLUE.stroke_width(2),
        ))
        .map_err(render_err)?;

        root.present().map_err(render_err)?;
    }
    Ok(svg)
}

/// Screen angle for a gauge value: `min` points left, `max` points right.
fn gauge_angle(gauge: &SentimentGauge, value: f64) -> f64 {
    let ratio = ((gauge.max - value) / (gauge.max - gauge.min)).clamp(0.0, 1.0);
    PI * ratio
}

fn polar(center: (i32, i32), radius: f64, angle: f64) -> (i32, i32) {
    (
        center.0 + (radius * angle.cos()).round() as i32,
        center.1 - (radius * angle.sin()).round() as i32,
    )
}

/// Closed outline of the ring section between two angles.
fn ring_segment(center: (i32, i32), inner: f64, outer: f64, from: f64, to: f64) -> Vec<(i32, i32)> {
    const STEPS: usize = 48;
    let at = |step: usize| from + (to - from) * step as f64 / STEPS as f64;

    let mut outline: Vec<(i32, i32)> = (0..=STEPS).map(|step| polar(center, outer, at(step))).collect();
    outline.extend((0..=STEPS).rev().map(|step| polar(center, inner, at(step))));
    outline
}

/// Half-ring gauge with colored bands, a value bar, the threshold marker and a delta readout.
pub fn gauge_chart(gauge: &SentimentGauge) -> Result<String, ChartError> {
    const CENTER: (i32, i32) = (250, 235);
    const INNER: f64 = 120.0;
    const OUTER: f64 = 190.0;

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, GAUGE_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;

        for band in &gauge.bands {
            let outline = ring_segment(
                CENTER,
                INNER,
                OUTER,
                gauge_angle(gauge, band.from),
                gauge_angle(gauge, band.to),
            );
            root.draw(&Polygon::new(outline, named_color(band.color).mix(0.5).filled()))
                .map_err(render_err)?;
        }

        if gauge.value > gauge.min {
            let bar = ring_segment(
                CENTER,
                INNER + 25.0,
                OUTER - 25.0,
                gauge_angle(gauge, gauge.min),
                gauge_angle(gauge, gauge.value),
            );
            root.draw(&Polygon::new(bar, DARK_BLUE.filled()))
                .map_err(render_err)?;
        }

        let threshold = gauge_angle(gauge, gauge.threshold);
        root.draw(&PathElement::new(
            vec![polar(CENTER, INNER, threshold), polar(CENTER, OUTER, threshold)],
            BLACK.stroke_width(4),
        ))
        .map_err(render_err)?;

        root.draw(&Text::new(
            gauge.title,
            (175, 12),
            ("sans-serif", 24).into_font(),
        ))
        .map_err(render_err)?;
        root.draw(&Text::new(
            format!("{:.1}", gauge.value),
            (215, 185),
            ("sans-serif", 36).into_font(),
        ))
        .map_err(render_err)?;

        let delta = gauge.value - gauge.reference;
        let (arrow, color) = if delta >= 0.0 {
            ("▲", DARK_GREEN)
        } else {
            ("▼", CRIMSON)
        };
        root.draw(&Text::new(
            format!("{arrow} {:.1}", delta.abs()),
            (225, 250),
            ("sans-serif", 18).into_font().color(&color),
        ))
        .map_err(render_err)?;

        root.present().map_err(render_err)?;
    }
    Ok(svg)
}

/// Label distribution as pie wedges, clockwise from twelve o'clock, with a legend.
pub fn pie_chart(slices: &[PieSlice]) -> Result<String, ChartError> {
    const CENTER: (i32, i32) = (180, 195);
    const RADIUS: f64 = 140.0;
    const STEPS_PER_TURN: f64 = 96.0;

    let total: usize = slices.iter().map(|slice| slice.count).sum();

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, PIE_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;
        root.draw(&Text::new(
            "Sentiment Distribution",
            (120, 12),
            ("sans-serif", 22).into_font(),
        ))
        .map_err(render_err)?;

        let mut start = -PI / 2.0;
        for (index, slice) in slices.iter().enumerate() {
            if total == 0 || slice.count == 0 {
                continue;
            }
            let share = slice.count as f64 / total as f64;
            let sweep = 2.0 * PI * share;
            let steps = (STEPS_PER_TURN * share).ceil().max(2.0) as usize;

            let mut wedge = vec![CENTER];
            wedge.extend((0..=steps).map(|step| {
                let angle = start + sweep * step as f64 / steps as f64;
                (
                    CENTER.0 + (RADIUS * angle.cos()).round() as i32,
                    CENTER.1 + (RADIUS * angle.sin()).round() as i32,
                )
            }));
            let color = named_color(slice.color);
            root.draw(&Polygon::new(wedge, color.filled()))
                .map_err(render_err)?;
            start += sweep;

            let y = 90 + index as i32 * 32;
            root.draw(&Rectangle::new([(350, y), (366, y + 16)], color.filled()))
                .map_err(render_err)?;
            root.draw(&Text::new(
                format!("{} {} ({:.1}%)", slice.label, slice.count, share * 100.0),
                (374, y),
                ("sans-serif", 16).into_font(),
            ))
            .map_err(render_err)?;
        }

        root.present().map_err(render_err)?;
    }
    Ok(svg)
}

/// Minimum horizontal padding around the publish times, in seconds.
const MIN_TIME_PAD: f64 = 1_800.0;

/// X layout of the timeline: publish times in unix seconds, with headlines lacking a parsed
/// time gathered in one slot right of the latest one.
#[derive(Debug, Clone, Copy, PartialEq)]
struct TimeAxis {
    start: f64,
    timed_end: f64,
    undated_x: f64,
    end: f64,
}

impl TimeAxis {
    fn for_points(points: &[TimelinePoint]) -> Self {
        let bounds = points
            .iter()
            .filter_map(|point| point.published_at)
            .map(|at| at.unix_timestamp() as f64)
            .fold(None, |bounds: Option<(f64, f64)>, at| match bounds {
                None => Some((at, at)),
                Some((first, last)) => Some((first.min(at), last.max(at))),
            });
        let Some((first, last)) = bounds else {
            return Self {
                start: 0.0,
                timed_end: 0.0,
                undated_x: 1.0,
                end: 2.0,
            };
        };

        let pad = ((last - first) * 0.05).max(MIN_TIME_PAD);
        let timed_end = last + pad;
        let has_undated = points.iter().any(|point| point.published_at.is_none());
        let (undated_x, end) = if has_undated {
            (timed_end + pad, timed_end + 2.0 * pad)
        } else {
            (timed_end, timed_end)
        };
        Self {
            start: first - pad,
            timed_end,
            undated_x,
            end,
        }
    }

    fn x(&self, point: &TimelinePoint) -> f64 {
        point
            .published_at
            .map_or(self.undated_x, |at| at.unix_timestamp() as f64)
    }

    /// Minute-resolution tick label; blank outside the dated range.
    fn label(&self, x: f64) -> String {
        if self.timed_end <= self.start || x < self.start || x > self.timed_end {
            return String::new();
        }
        UtcDateTime::from_unix_timestamp(x.round() as i64)
            .map(UtcDateTime::format_minute)
            .unwrap_or_default()
    }
}

/// Polarity per headline against its publish time, with a dashed zero line.
pub fn timeline_chart(points: &[TimelinePoint]) -> Result<String, ChartError> {
    let axis = TimeAxis::for_points(points);
    let has_undated = points.iter().any(|point| point.published_at.is_none());

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, LINE_CHART_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;

        let mut ctx = ChartBuilder::on(&root)
            .caption("News Sentiment Over Time", ("sans-serif", 22).into_font())
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(axis.start..axis.end, -1.05f64..1.05f64)
            .map_err(render_err)?;

        ctx.configure_mesh()
            .x_labels(5)
            .x_label_formatter(&|x| axis.label(*x))
            .x_desc("Published")
            .y_desc("Sentiment Score")
            .draw()
            .map_err(render_err)?;

        let dash = (axis.end - axis.start) / 90.0;
        let dash_starts = (0..90).map(|step| axis.start + step as f64 * dash);
        ctx.draw_series(dash_starts.map(|x| {
            PathElement::new(vec![(x, 0.0), (x + dash / 2.0, 0.0)], GRAY.stroke_width(1))
        }))
        .map_err(render_err)?;

        if has_undated {
            ctx.draw_series(std::iter::once(Text::new(
                "undated",
                (axis.undated_x, -0.95),
                ("sans-serif", 14).into_font(),
            )))
            .map_err(render_err)?;
        }

        ctx.draw_series(points.iter().map(|point| {
            Circle::new(
                (axis.x(point), point.polarity),
                6,
                named_color(label_color(point.label)).filled(),
            )
        }))
        .map_err(render_err)?;

        root.present().map_err(render_err)?;
    }
    Ok(svg)
}
