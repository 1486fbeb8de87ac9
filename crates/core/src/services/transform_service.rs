use std::collections::HashMap;
use std::sync::Arc;

use crate::models::card::{Cell, CellTone, RowKind, TableRow, VarianceTable};
use crate::models::item::Item;
use crate::services::format_service::{render_quantity, NumberFormatter, NumberStyle, PLACEHOLDER};

/// Number of summary columns appended after the snapshot columns.
pub const SUMMARY_COLUMNS: usize = 3;

const EMPTY_HISTORY_NOTE: &str = "No stock deviations detected in this period.";

/// Turns an item into the rows of its variance table.
///
/// Pure data transformation: the formatter only produces text, it never
/// influences which cells are filled.
pub struct SnapshotTransformer {
    formatter: Arc<dyn NumberFormatter>,
}

impl SnapshotTransformer {
    pub fn new(formatter: Arc<dyn NumberFormatter>) -> Self {
        Self { formatter }
    }

    /// Build the variance table for one item.
    ///
    /// Layout per row: label, one cell per snapshot, then out / in / current
    /// balance. Only the Totals row fills the summary cells; only the other
    /// rows fill the snapshot cells.
    pub fn transform(&self, item: &Item) -> VarianceTable {
        if item.history.is_empty() {
            return VarianceTable {
                columns: Vec::new(),
                rows: Vec::new(),
                empty_note: Some(EMPTY_HISTORY_NOTE.to_string()),
            };
        }

        let mut columns = Vec::with_capacity(item.history.len() + SUMMARY_COLUMNS + 1);
        columns.push("Metric".to_string());
        columns.extend(item.history.iter().map(|s| s.axis_label().to_string()));
        columns.extend(["Out", "In", "Current Balance"].map(String::from));

        VarianceTable {
            columns,
            rows: vec![
                self.variance_row(item),
                self.balance_row(item),
                self.price_row(item),
                self.totals_row(item),
            ],
            empty_note: None,
        }
    }

    fn variance_row(&self, item: &Item) -> TableRow {
        // Later entries win when the service sends the same date twice.
        let variance_by_date: HashMap<&str, f64> = item
            .differences
            .iter()
            .map(|d| (d.date.as_str(), d.difference))
            .collect();

        let mut cells: Vec<Cell> = item
            .history
            .iter()
            .enumerate()
            .map(|(index, snapshot)| {
                if index == 0 {
                    return placeholder();
                }
                match variance_by_date.get(snapshot.date.as_str()) {
                    Some(&value) => {
                        let tone = if value >= 0.0 {
                            CellTone::Positive
                        } else {
                            CellTone::Negative
                        };
                        Cell::new(self.quantity(value, NumberStyle::SIGNED), tone)
                    }
                    None => placeholder(),
                }
            })
            .collect();
        cells.extend(summary_placeholders());

        TableRow {
            kind: RowKind::Variance,
            label: "Variance".to_string(),
            cells,
        }
    }

    fn balance_row(&self, item: &Item) -> TableRow {
        let mut cells: Vec<Cell> = item
            .history
            .iter()
            .map(|s| Cell::new(self.quantity(s.stock, NumberStyle::PLAIN), CellTone::Neutral))
            .collect();
        cells.extend(summary_placeholders());

        TableRow {
            kind: RowKind::Balance,
            label: "Balance".to_string(),
            cells,
        }
    }

    fn price_row(&self, item: &Item) -> TableRow {
        let mut cells: Vec<Cell> = item
            .history
            .iter()
            .map(|s| match s.price {
                Some(price) => Cell::new(self.formatter.format_currency(price), CellTone::Neutral),
                None => placeholder(),
            })
            .collect();
        cells.extend(summary_placeholders());

        TableRow {
            kind: RowKind::Price,
            label: "Price".to_string(),
            cells,
        }
    }

    fn totals_row(&self, item: &Item) -> TableRow {
        let mut cells: Vec<Cell> = item.history.iter().map(|_| placeholder()).collect();
        cells.push(Cell::new(
            self.quantity(item.totals.total_out(), NumberStyle::PLAIN),
            CellTone::TotalOut,
        ));
        cells.push(Cell::new(
            self.quantity(item.totals.total_in(), NumberStyle::PLAIN),
            CellTone::TotalIn,
        ));
        cells.push(Cell::new(
            self.quantity(item.current_balance(), NumberStyle::PLAIN),
            CellTone::CurrentBalance,
        ));

        TableRow {
            kind: RowKind::Totals,
            label: "Totals".to_string(),
            cells,
        }
    }

    fn quantity(&self, value: f64, style: NumberStyle) -> String {
        render_quantity(self.formatter.as_ref(), value, style)
    }
}

fn placeholder() -> Cell {
    Cell::new(PLACEHOLDER, CellTone::Placeholder)
}

fn summary_placeholders() -> impl Iterator<Item = Cell> {
    std::iter::repeat_with(placeholder).take(SUMMARY_COLUMNS)
}
