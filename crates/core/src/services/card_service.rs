use std::sync::Arc;

use crate::models::card::{Card, CardHeader, ChartSection, MetaLine};
use crate::models::chart::ChartSpec;
use crate::models::item::Item;
use crate::services::chart_service::ChartRegistry;
use crate::services::format_service::{render_quantity, NumberFormatter, NumberStyle};
use crate::services::transform_service::SnapshotTransformer;

const NO_DESIGNATION: &str = "No designation";
const NO_SNAPSHOTS_NOTE: &str = "No stock snapshots available for this item.";

const CHART_TITLE: &str = "Stock Balance";
const CHART_HEIGHT: u32 = 260;
const CHART_COLOR: &str = "#2490ef";

/// Builds one card per item: header, variance table and trend chart.
pub struct CardRenderer {
    transformer: SnapshotTransformer,
    formatter: Arc<dyn NumberFormatter>,
}

impl CardRenderer {
    pub fn new(formatter: Arc<dyn NumberFormatter>) -> Self {
        Self {
            transformer: SnapshotTransformer::new(Arc::clone(&formatter)),
            formatter,
        }
    }

    /// Render a single item. Pure: the chart is described but not allocated.
    pub fn render(&self, item: &Item) -> Card {
        Card {
            header: self.header(item),
            table: self.transformer.transform(item),
            chart: self.chart(item),
            search_text: item.search_text(),
            hidden: false,
        }
    }

    /// Render every item that has differences, allocating one chart per card.
    ///
    /// The caller must have disposed the previous card set's charts. A chart
    /// the backend refuses leaves the card without a handle; the card itself
    /// is still shown.
    pub fn render_all(&self, items: &[Item], charts: &mut ChartRegistry) -> Vec<Card> {
        items
            .iter()
            .filter(|item| item.has_differences())
            .map(|item| {
                let mut card = self.render(item);
                if let ChartSection::Chart { spec, handle } = &mut card.chart {
                    match charts.allocate(spec) {
                        Ok(h) => *handle = Some(h),
                        Err(e) => {
                            tracing::warn!(code = %item.code, error = %e, "chart allocation failed");
                        }
                    }
                }
                card
            })
            .collect()
    }

    fn header(&self, item: &Item) -> CardHeader {
        let designation = item.designation.as_deref().filter(|d| !d.trim().is_empty());

        let price = item.price.map(|p| self.formatter.format_currency(p));
        let meta = [
            ("Category", item.main_category.as_deref()),
            ("Brand", item.brand.as_deref()),
            ("Price", price.as_deref()),
            ("Last entry", item.last_updated.as_deref()),
        ]
        .into_iter()
        .filter_map(|(label, value)| {
            let value = value.filter(|v| !v.is_empty())?;
            Some(MetaLine {
                label: label.to_string(),
                value: value.to_string(),
            })
        })
        .collect();

        CardHeader {
            code: item.code.clone(),
            title: designation.unwrap_or(NO_DESIGNATION).to_string(),
            title_muted: designation.is_none(),
            meta,
        }
    }

    fn chart(&self, item: &Item) -> ChartSection {
        if item.history.is_empty() {
            return ChartSection::Note(NO_SNAPSHOTS_NOTE.to_string());
        }

        let values: Vec<f64> = item.history.iter().map(|s| s.stock).collect();
        let tooltips = values
            .iter()
            .map(|v| {
                format!(
                    "Stock: {}",
                    render_quantity(self.formatter.as_ref(), *v, NumberStyle::PLAIN)
                )
            })
            .collect();

        ChartSection::Chart {
            spec: ChartSpec {
                title: CHART_TITLE.to_string(),
                series_name: CHART_TITLE.to_string(),
                labels: item.history.iter().map(|s| s.axis_label().to_string()).collect(),
                values,
                tooltips,
                height: CHART_HEIGHT,
                color: CHART_COLOR.to_string(),
                x_axis_label: "Snapshot".to_string(),
                y_axis_label: "Stock".to_string(),
            },
            handle: None,
        }
    }
}
