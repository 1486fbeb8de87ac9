use serde::{Deserialize, Serialize};

use super::chart::{ChartHandle, ChartSpec};

/// Visual role of a table cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellTone {
    Placeholder,
    Neutral,
    Positive,
    Negative,
    TotalOut,
    TotalIn,
    CurrentBalance,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub text: String,
    pub tone: CellTone,
}

impl Cell {
    pub fn new(text: impl Into<String>, tone: CellTone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.tone == CellTone::Placeholder
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RowKind {
    Variance,
    Balance,
    Price,
    Totals,
}

/// One metric row: a label followed by one cell per snapshot and the three
/// trailing summary cells (out, in, current balance).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    pub kind: RowKind,
    pub label: String,
    pub cells: Vec<Cell>,
}

impl TableRow {
    pub fn texts(&self) -> Vec<&str> {
        self.cells.iter().map(|c| c.text.as_str()).collect()
    }
}

/// The per-item variance table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VarianceTable {
    /// Header: `Metric`, one column per snapshot, `Out`, `In`, `Current Balance`
    pub columns: Vec<String>,

    /// Variance, Balance, Price and Totals rows, in that order
    pub rows: Vec<TableRow>,

    /// Shown instead of the table when the item has no history
    pub empty_note: Option<String>,
}

impl VarianceTable {
    pub fn row(&self, kind: RowKind) -> Option<&TableRow> {
        self.rows.iter().find(|r| r.kind == kind)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaLine {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardHeader {
    pub code: String,

    /// Designation, or a fallback text when the item has none
    pub title: String,

    /// True when `title` is the fallback and should be rendered muted
    pub title_muted: bool,

    /// Category/brand/price/last-entry lines; absent values are left out
    pub meta: Vec<MetaLine>,
}

/// Chart area of a card: either a trend chart or a short note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ChartSection {
    Chart {
        spec: ChartSpec,
        /// Set once the chart has been allocated on a backend
        handle: Option<ChartHandle>,
    },
    Note(String),
}

impl ChartSection {
    pub fn handle(&self) -> Option<ChartHandle> {
        match self {
            ChartSection::Chart { handle, .. } => *handle,
            ChartSection::Note(_) => None,
        }
    }

    pub fn spec(&self) -> Option<&ChartSpec> {
        match self {
            ChartSection::Chart { spec, .. } => Some(spec),
            ChartSection::Note(_) => None,
        }
    }
}

/// The rendered unit for one item: header, variance table and trend chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub header: CardHeader,
    pub table: VarianceTable,
    pub chart: ChartSection,

    /// Lowercased `code designation brand main_category`
    pub search_text: String,

    /// Hidden cards are filtered out by the search and take no layout space
    pub hidden: bool,
}

impl Card {
    pub fn code(&self) -> &str {
        &self.header.code
    }

    pub fn is_visible(&self) -> bool {
        !self.hidden
    }
}
