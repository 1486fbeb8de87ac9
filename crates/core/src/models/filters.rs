use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The free-text filter fields. Each accepts a set of tokens matched with
/// `LIKE %token%` on the service side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextField {
    Code,
    Designation,
    MainCategory,
    Brand,
}

impl TextField {
    pub const ALL: [TextField; 4] = [
        TextField::Code,
        TextField::Designation,
        TextField::MainCategory,
        TextField::Brand,
    ];

    /// Wire name of the field in the request payload.
    pub fn as_str(&self) -> &'static str {
        match self {
            TextField::Code => "code",
            TextField::Designation => "designation",
            TextField::MainCategory => "main_category",
            TextField::Brand => "brand",
        }
    }
}

impl std::fmt::Display for TextField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw user input for a text filter: either a delimited string or a list
/// that was already split by the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterInput {
    Text(String),
    List(Vec<String>),
}

impl From<&str> for FilterInput {
    fn from(value: &str) -> Self {
        FilterInput::Text(value.to_string())
    }
}

impl From<String> for FilterInput {
    fn from(value: String) -> Self {
        FilterInput::Text(value)
    }
}

impl From<Vec<String>> for FilterInput {
    fn from(values: Vec<String>) -> Self {
        FilterInput::List(values)
    }
}

impl From<Vec<&str>> for FilterInput {
    fn from(values: Vec<&str>) -> Self {
        FilterInput::List(values.into_iter().map(str::to_string).collect())
    }
}

/// Validated filters, read once per fetch. Doubles as the request payload
/// sent to the stock-history service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filters {
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub code: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub designation: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub main_category: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub brand: Vec<String>,
}

impl Filters {
    /// Filters covering a date range with no text restrictions.
    pub fn new(from_date: NaiveDate, to_date: NaiveDate) -> Self {
        Self {
            from_date,
            to_date,
            code: Vec::new(),
            designation: Vec::new(),
            main_category: Vec::new(),
            brand: Vec::new(),
        }
    }

    pub fn field(&self, field: TextField) -> &[String] {
        match field {
            TextField::Code => &self.code,
            TextField::Designation => &self.designation,
            TextField::MainCategory => &self.main_category,
            TextField::Brand => &self.brand,
        }
    }

    pub fn field_mut(&mut self, field: TextField) -> &mut Vec<String> {
        match field {
            TextField::Code => &mut self.code,
            TextField::Designation => &mut self.designation,
            TextField::MainCategory => &mut self.main_category,
            TextField::Brand => &mut self.brand,
        }
    }
}
