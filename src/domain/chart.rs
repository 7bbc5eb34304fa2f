// Chart projection - maps systolic/diastolic values to drawing coordinates

/// Padding added above and below the data range, in mmHg.
const VALUE_PADDING: f64 = 5.0;
/// Number of equal horizontal bands between grid lines.
const GRID_BANDS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartBounds {
    pub width: f64,
    pub height: f64,
    pub inset: f64,
}

impl ChartBounds {
    pub fn new(width: f64, height: f64, inset: f64) -> Self {
        Self {
            width,
            height,
            inset,
        }
    }

    /// Finite positive size and a finite non-negative inset.
    pub fn is_drawable(&self) -> bool {
        self.width.is_finite()
            && self.width > 0.0
            && self.height.is_finite()
            && self.height > 0.0
            && self.inset.is_finite()
            && self.inset >= 0.0
    }

    fn plot_area(&self) -> PlotArea {
        PlotArea {
            left: self.inset,
            top: self.inset,
            width: (self.width - 2.0 * self.inset).max(0.0),
            height: (self.height - 2.0 * self.inset).max(0.0),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct PlotArea {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
}

impl PlotArea {
    fn right(&self) -> f64 {
        self.left + self.width
    }

    fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Shared vertical scale for both series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    fn from_values<'a>(values: impl Iterator<Item = &'a f64>) -> Self {
        let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
        Self {
            min: (lo - VALUE_PADDING).max(0.0),
            max: hi + VALUE_PADDING,
        }
    }

    pub fn span(&self) -> f64 {
        (self.max - self.min).max(1.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridLine {
    pub y: f64,
    pub x_start: f64,
    pub x_end: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedChart {
    pub range: ValueRange,
    pub grid_lines: Vec<GridLine>,
    pub systolic: Vec<Point>,
    pub diastolic: Vec<Point>,
}

/// Project both series into `bounds`.
///
/// Returns `None` when either series has fewer than two values or the two
/// lengths differ; such a chart has nothing comparable to draw.
pub fn project(systolic: &[f64], diastolic: &[f64], bounds: ChartBounds) -> Option<ProjectedChart> {
    if systolic.len() < 2 || systolic.len() != diastolic.len() {
        return None;
    }

    let area = bounds.plot_area();
    let range = ValueRange::from_values(systolic.iter().chain(diastolic.iter()));

    Some(ProjectedChart {
        range,
        grid_lines: grid_lines(&area),
        systolic: path(systolic, &area, &range),
        diastolic: path(diastolic, &area, &range),
    })
}

fn grid_lines(area: &PlotArea) -> Vec<GridLine> {
    (0..=GRID_BANDS)
        .map(|i| GridLine {
            y: area.top + area.height * i as f64 / GRID_BANDS as f64,
            x_start: area.left,
            x_end: area.right(),
        })
        .collect()
}

fn path(values: &[f64], area: &PlotArea, range: &ValueRange) -> Vec<Point> {
    let steps = values.len().saturating_sub(1).max(1);
    let step_x = area.width / steps as f64;

    values
        .iter()
        .enumerate()
        .map(|(idx, v)| Point {
            x: area.left + idx as f64 * step_x,
            y: area.bottom() - ((v - range.min) / range.span()) * area.height,
        })
        .collect()
}
