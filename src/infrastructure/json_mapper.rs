// Mapper to convert dashboard snapshots to JSON views
use crate::application::dashboard_service::DashboardSnapshot;
use crate::domain::chart::{Point, ProjectedChart};
use crate::domain::measurement::Measurement;
use crate::domain::summary::Summary;
use chrono::DateTime;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct DashboardView {
    pub status: String,
    pub items: Vec<MeasurementRow>,
    pub summary: SummaryView,
    pub chart: Option<ChartView>,
}

#[derive(Debug, Serialize)]
pub struct MeasurementRow {
    pub title: String,
    pub subtitle: String,
    pub sbp: u32,
    pub dbp: u32,
    pub hr: Option<u32>,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct SummaryView {
    pub text: String,
    pub count: usize,
    pub mean_sbp: Option<f64>,
    pub mean_dbp: Option<f64>,
    pub mean_hr: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct ChartView {
    pub min_value: f64,
    pub max_value: f64,
    pub grid_lines: Vec<f64>,
    pub sbp: Vec<[f64; 2]>,
    pub dbp: Vec<[f64; 2]>,
}

pub fn dashboard_to_view(snapshot: DashboardSnapshot) -> DashboardView {
    DashboardView {
        status: snapshot.status.to_string(),
        items: snapshot.series.items().iter().map(measurement_to_row).collect(),
        summary: summary_to_view(&snapshot.summary),
        chart: snapshot.chart.map(chart_to_view),
    }
}

fn measurement_to_row(m: &Measurement) -> MeasurementRow {
    MeasurementRow {
        title: m.title(),
        subtitle: display_timestamp(m.timestamp()),
        sbp: m.systolic(),
        dbp: m.diastolic(),
        hr: m.heart_rate(),
        timestamp: m.timestamp().to_string(),
    }
}

/// "Aug 30, 2025 at 2:15 PM", or the raw string when it is not RFC 3339
pub fn display_timestamp(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(ts) => ts.format("%b %-d, %Y at %-I:%M %p").to_string(),
        Err(_) => raw.to_string(),
    }
}

fn summary_to_view(summary: &Summary) -> SummaryView {
    let text = summary.to_string();
    match summary {
        Summary::NoData => SummaryView {
            text,
            count: 0,
            mean_sbp: None,
            mean_dbp: None,
            mean_hr: None,
        },
        Summary::Stats(stats) => SummaryView {
            text,
            count: stats.count,
            mean_sbp: Some(stats.mean_systolic),
            mean_dbp: Some(stats.mean_diastolic),
            mean_hr: stats.mean_heart_rate,
        },
    }
}

fn chart_to_view(chart: ProjectedChart) -> ChartView {
    fn pairs(points: &[Point]) -> Vec<[f64; 2]> {
        points.iter().map(|p| [p.x, p.y]).collect()
    }

    ChartView {
        min_value: chart.range.min,
        max_value: chart.range.max,
        grid_lines: chart.grid_lines.iter().map(|g| g.y).collect(),
        sbp: pairs(&chart.systolic),
        dbp: pairs(&chart.diastolic),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dashboard_service::Status;
    use crate::domain::chart::{project, ChartBounds};
    use crate::domain::measurement::Series;
    use crate::domain::summary::aggregate;

    fn snapshot(items: Vec<Measurement>) -> DashboardSnapshot {
        let series = Series::from_store(items, 20);
        let summary = aggregate(series.items());
        let chart = project(
            &series.systolic_values(),
            &series.diastolic_values(),
            ChartBounds::new(300.0, 160.0, 12.0),
        );
        DashboardSnapshot {
            status: Status::Loaded(series.len()),
            series,
            summary,
            chart,
        }
    }

    #[test]
    fn test_display_timestamp() {
        assert_eq!(
            display_timestamp("2025-08-30T14:15:00Z"),
            "Aug 30, 2025 at 2:15 PM"
        );
        assert_eq!(display_timestamp("yesterday"), "yesterday");
    }

    #[test]
    fn test_dashboard_view() {
        let view = dashboard_to_view(snapshot(vec![
            Measurement::new(120, 75, Some(70), "2025-08-30T09:05:00Z".to_string()),
            Measurement::new(130, 85, None, "2025-08-29T21:40:00Z".to_string()),
        ]));

        assert_eq!(view.status, "Loaded 2 item(s)");
        assert_eq!(view.items[0].title, "120/75  HR: 70");
        assert_eq!(view.items[0].subtitle, "Aug 30, 2025 at 9:05 AM");
        assert_eq!(view.items[1].title, "130/85");
        assert_eq!(view.summary.count, 2);
        assert_eq!(view.summary.mean_sbp, Some(125.0));
        assert_eq!(view.summary.mean_hr, Some(70.0));

        let chart = view.chart.unwrap();
        assert_eq!(chart.grid_lines.len(), 4);
        assert_eq!(chart.sbp.len(), 2);
        assert_eq!(chart.min_value, 70.0);
        assert_eq!(chart.max_value, 135.0);
    }

    #[test]
    fn test_single_item_view_has_no_chart() {
        let view = dashboard_to_view(snapshot(vec![Measurement::new(
            120,
            75,
            None,
            "2025-08-30T09:05:00Z".to_string(),
        )]));

        assert!(view.chart.is_none());
        assert_eq!(view.summary.text, "Avg (1):  SBP 120.0   DBP 75.0   HR —");

        let json = serde_json::to_value(&view).unwrap();
        assert!(json["chart"].is_null());
        assert!(json["summary"]["mean_hr"].is_null());
    }
}
