use serde::{Deserialize, Serialize};

/// Opaque handle to a chart allocated by a `ChartBackend`.
///
/// Handles must be returned to the backend before the card set they belong
/// to is replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChartHandle(pub u64);

/// Everything a UI target needs to draw an item's stock trend line.
///
/// The core computes the numbers; the frontend only renders them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    /// Section title shown above the chart
    pub title: String,

    /// Name of the single data series
    pub series_name: String,

    /// X-axis labels: snapshot date, or label when the date is empty
    pub labels: Vec<String>,

    /// Stock value per snapshot
    pub values: Vec<f64>,

    /// Pre-formatted tooltip text per point (e.g., `"Stock: 80.000"`)
    pub tooltips: Vec<String>,

    pub height: u32,
    pub color: String,
    pub x_axis_label: String,
    pub y_axis_label: String,
}

impl ChartSpec {
    pub fn point_count(&self) -> usize {
        self.values.len()
    }

    /// Lowest and highest stock values, or `None` for an empty series.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        let mut iter = self.values.iter().copied();
        let first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }
}
