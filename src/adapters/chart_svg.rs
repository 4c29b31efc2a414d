//! SVG line chart of a price series.

use crate::domain::date_range::DATE_FORMAT;
use chrono::NaiveDate;
use std::fmt::Write;

/// Margin around the plot area on every side.
pub const CHART_PADDING: f64 = 60.0;

#[derive(Debug, Clone, PartialEq)]
pub struct ChartStyle {
    pub color: String,
    pub width: f64,
    pub height: f64,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            color: "blue".to_string(),
            width: 800.0,
            height: 400.0,
        }
    }
}

pub fn render_price_chart(name: &str, points: &[(NaiveDate, f64)], style: &ChartStyle) -> String {
    let width = style.width;
    let height = style.height;
    let padding = CHART_PADDING;
    let title = escape(&format!("Evolution of {name} prices"));

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width:.0}" height="{height:.0}" viewBox="0 0 {width:.0} {height:.0}">"#
    );
    let _ = writeln!(svg, r#"  <rect width="100%" height="100%" fill="white"/>"#);
    let _ = writeln!(
        svg,
        r#"  <text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="16">{title}</text>"#,
        width / 2.0,
        padding / 2.0
    );

    if points.is_empty() {
        let _ = writeln!(
            svg,
            r#"  <text x="{:.1}" y="{:.1}" text-anchor="middle">No price data available.</text>"#,
            width / 2.0,
            height / 2.0
        );
        svg.push_str("</svg>\n");
        return svg;
    }

    let min_value = points.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
    let max_value = points.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);

    let plot_width = (width - 2.0 * padding).max(0.0);
    let plot_height = (height - 2.0 * padding).max(0.0);

    let range = max_value - min_value;
    let scale_y = if range > 0.0 { plot_height / range } else { 1.0 };
    let scale_x = if points.len() > 1 {
        plot_width / (points.len() - 1) as f64
    } else {
        0.0
    };

    let coords: Vec<(f64, f64)> = points
        .iter()
        .enumerate()
        .map(|(i, (_, value))| {
            let x = padding + i as f64 * scale_x;
            let y = height - padding - (value - min_value) * scale_y;
            (x, y)
        })
        .collect();

    // axes
    let _ = writeln!(
        svg,
        r#"  <line x1="{padding:.1}" y1="{padding:.1}" x2="{padding:.1}" y2="{:.1}" stroke="black"/>"#,
        height - padding
    );
    let _ = writeln!(
        svg,
        r#"  <line x1="{padding:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="black"/>"#,
        height - padding,
        width - padding,
        height - padding
    );

    let polyline: Vec<String> = coords.iter().map(|(x, y)| format!("{x:.1},{y:.1}")).collect();
    let color = escape(&style.color);
    let _ = writeln!(
        svg,
        r#"  <polyline fill="none" stroke="{color}" stroke-width="1.5" points="{}"/>"#,
        polyline.join(" ")
    );
    for (x, y) in &coords {
        let _ = writeln!(svg, r#"  <circle cx="{x:.1}" cy="{y:.1}" r="2" fill="{color}"/>"#);
    }

    let first = points[0].0.format(DATE_FORMAT);
    let last = points[points.len() - 1].0.format(DATE_FORMAT);
    let _ = writeln!(
        svg,
        r#"  <text x="{padding:.1}" y="{:.1}" font-size="11">{first}</text>"#,
        height - padding / 2.0
    );
    let _ = writeln!(
        svg,
        r#"  <text x="{:.1}" y="{:.1}" text-anchor="end" font-size="11">{last}</text>"#,
        width - padding,
        height - padding / 2.0
    );
    let _ = writeln!(
        svg,
        r#"  <text x="{:.1}" y="{padding:.1}" text-anchor="end" font-size="11">{max_value:.2}</text>"#,
        padding - 5.0
    );
    let _ = writeln!(
        svg,
        r#"  <text x="{:.1}" y="{:.1}" text-anchor="end" font-size="11">{min_value:.2}</text>"#,
        padding - 5.0,
        height - padding
    );

    svg.push_str("</svg>\n");
    svg
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
