use serde::{Deserialize, Serialize};

/// Derive a date key from a snapshot/difference label.
///
/// Labels look like `"24-01-2025 10:30"`; the key is everything before the
/// first space. An empty label yields an empty key.
pub fn date_from_label(label: &str) -> &str {
    label.split(' ').next().unwrap_or_default()
}

/// One historical stock-quantity observation for an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Display label as sent by the service (e.g., `"24-01-2025 10:30"` or `"Opening"`)
    pub label: String,

    /// Date key used to match differences against this snapshot
    pub date: String,

    /// Stock on hand at this point; missing or non-numeric values are 0
    pub stock: f64,

    /// Unit price at this point; `None` when missing or non-numeric
    pub price: Option<f64>,
}

impl Snapshot {
    /// Build a snapshot, deriving the date key from the label when none is given.
    pub fn new(label: impl Into<String>, date: Option<&str>, stock: f64, price: Option<f64>) -> Self {
        let label = label.into();
        let date = match date.map(str::trim).filter(|d| !d.is_empty()) {
            Some(d) => d.to_string(),
            None => date_from_label(&label).to_string(),
        };
        Self {
            label,
            date,
            stock,
            price,
        }
    }

    /// Text used for table headers and chart x-axis labels.
    pub fn axis_label(&self) -> &str {
        if self.date.is_empty() {
            &self.label
        } else {
            &self.date
        }
    }
}

/// A server-computed delta between two consecutive snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Difference {
    /// Date key matched against `Snapshot::date`
    pub date: String,

    /// Original period label (e.g., `"Opening → 24-01-2025 10:30"`), if sent
    pub period: Option<String>,

    /// Signed change in stock
    pub difference: f64,
}

impl Difference {
    /// Build a difference keyed by `date`, or by the date derived from `period`.
    pub fn new(date: Option<&str>, period: Option<&str>, difference: f64) -> Self {
        let date = match date.map(str::trim).filter(|d| !d.is_empty()) {
            Some(d) => d.to_string(),
            None => period.map(date_from_label).unwrap_or_default().to_string(),
        };
        Self {
            date,
            period: period.map(str::to_string),
            difference,
        }
    }
}

/// Aggregate movement across all of an item's differences.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    /// Sum of non-negative differences
    pub positive: f64,

    /// Sum of negative differences (always ≤ 0)
    pub negative: f64,
}

impl Totals {
    pub fn from_differences(differences: &[Difference]) -> Self {
        differences.iter().fold(Self::default(), |mut acc, d| {
            if d.difference >= 0.0 {
                acc.positive += d.difference;
            } else {
                acc.negative += d.difference;
            }
            acc
        })
    }

    /// Total stock that left, as a magnitude.
    pub fn total_out(&self) -> f64 {
        self.negative.abs()
    }

    /// Total stock that came in.
    pub fn total_in(&self) -> f64 {
        self.positive
    }
}

/// A catalog item with its stock history for the requested period.
///
/// Created fresh for every response and never merged with earlier results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub code: String,
    pub designation: Option<String>,
    pub brand: Option<String>,
    pub main_category: Option<String>,
    pub price: Option<f64>,
    pub last_updated: Option<String>,

    /// Chronological snapshots: first is the opening balance, last is current
    pub history: Vec<Snapshot>,

    pub differences: Vec<Difference>,

    /// Always derived from `differences`
    pub totals: Totals,
}

impl Item {
    /// Create an item with just a code and no history.
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            designation: None,
            brand: None,
            main_category: None,
            price: None,
            last_updated: None,
            history: Vec::new(),
            differences: Vec::new(),
            totals: Totals::default(),
        }
    }

    pub fn with_designation(mut self, designation: impl Into<String>) -> Self {
        self.designation = Some(designation.into());
        self
    }

    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    pub fn with_main_category(mut self, main_category: impl Into<String>) -> Self {
        self.main_category = Some(main_category.into());
        self
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_last_updated(mut self, last_updated: impl Into<String>) -> Self {
        self.last_updated = Some(last_updated.into());
        self
    }

    pub fn with_history(mut self, history: Vec<Snapshot>) -> Self {
        self.history = history;
        self
    }

    /// Set the differences and recompute totals from them.
    pub fn with_differences(mut self, differences: Vec<Difference>) -> Self {
        self.totals = Totals::from_differences(&differences);
        self.differences = differences;
        self
    }

    /// Items without differences are valid payload but never rendered.
    pub fn has_differences(&self) -> bool {
        !self.differences.is_empty()
    }

    /// Stock of the last snapshot, or 0 for an empty history.
    pub fn current_balance(&self) -> f64 {
        self.history.last().map(|s| s.stock).unwrap_or(0.0)
    }

    /// Lowercased `code designation brand main_category`, used by the card search.
    pub fn search_text(&self) -> String {
        [
            self.code.as_str(),
            self.designation.as_deref().unwrap_or(""),
            self.brand.as_deref().unwrap_or(""),
            self.main_category.as_deref().unwrap_or(""),
        ]
        .join(" ")
        .to_lowercase()
    }
}
