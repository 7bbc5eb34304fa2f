// SVG rendering of a projected chart
use crate::domain::chart::{ChartBounds, Point, ProjectedChart};
use std::fmt::Write;

const SYSTOLIC_COLOR: &str = "#ff3b30";
const DIASTOLIC_COLOR: &str = "#007aff";
const GRID_COLOR: &str = "#c7c7cc";
const BACKGROUND_COLOR: &str = "#f2f2f7";

/// Render the chart; `None` draws only the background.
pub fn render_svg(chart: Option<&ProjectedChart>, bounds: ChartBounds) -> String {
    let mut svg = String::new();
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = bounds.width,
        h = bounds.height
    );
    let _ = write!(
        svg,
        r#"<rect width="{}" height="{}" rx="12" fill="{}"/>"#,
        bounds.width, bounds.height, BACKGROUND_COLOR
    );

    if let Some(chart) = chart {
        for line in &chart.grid_lines {
            let _ = write!(
                svg,
                r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}" stroke-width="0.5"/>"#,
                line.x_start, line.y, line.x_end, line.y, GRID_COLOR
            );
        }
        polyline(&mut svg, &chart.systolic, SYSTOLIC_COLOR);
        polyline(&mut svg, &chart.diastolic, DIASTOLIC_COLOR);
    }

    svg.push_str("</svg>");
    svg
}

fn polyline(svg: &mut String, points: &[Point], color: &str) {
    let coords: Vec<String> = points
        .iter()
        .map(|p| format!("{:.2},{:.2}", p.x, p.y))
        .collect();
    let _ = write!(
        svg,
        r#"<polyline points="{}" fill="none" stroke="{}" stroke-width="2" stroke-linejoin="round" stroke-linecap="round"/>"#,
        coords.join(" "),
        color
    );
}
