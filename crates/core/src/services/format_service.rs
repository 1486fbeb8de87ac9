/// Text shown in cells that have no value.
pub const PLACEHOLDER: &str = "—";

/// Decimal places used for every quantity on the dashboard.
pub const DEFAULT_PRECISION: usize = 3;

const PLUS_SIGN: &str = "+";
const MINUS_SIGN: &str = "\u{2212}";

/// Formatting service injected by the hosting application.
///
/// Locale rules (grouping, decimal marks, currency placement) belong to the
/// implementation; the dashboard only decides *which* value to show and
/// whether it carries a sign.
pub trait NumberFormatter: Send + Sync {
    fn format_number(&self, value: f64, precision: usize) -> String;

    fn format_currency(&self, value: f64) -> String;
}

/// Used when no formatting service is injected: fixed decimals, no grouping.
#[derive(Debug, Clone, Default)]
pub struct FallbackFormatter {
    currency_symbol: Option<String>,
}

impl FallbackFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_currency_symbol(symbol: impl Into<String>) -> Self {
        let symbol = symbol.into();
        Self {
            currency_symbol: (!symbol.trim().is_empty()).then_some(symbol),
        }
    }
}

impl NumberFormatter for FallbackFormatter {
    fn format_number(&self, value: f64, precision: usize) -> String {
        format!("{:.precision$}", sanitize(value))
    }

    fn format_currency(&self, value: f64) -> String {
        let number = self.format_number(value, DEFAULT_PRECISION);
        match &self.currency_symbol {
            Some(symbol) => format!("{symbol} {number}"),
            None => number,
        }
    }
}

/// Non-finite values render as 0, and -0.0 as 0.0 so it never shows a sign.
fn sanitize(value: f64) -> f64 {
    if !value.is_finite() || value == 0.0 {
        0.0
    } else {
        value
    }
}

/// How a quantity is turned into cell text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberStyle {
    /// Prefix `+`/`−` (zero gets no sign)
    pub show_sign: bool,
    /// Render the magnitude instead of the signed value
    pub absolute: bool,
}

impl NumberStyle {
    /// Direction as an explicit sign, magnitude as the number: `− 20.000`.
    pub const SIGNED: NumberStyle = NumberStyle {
        show_sign: true,
        absolute: true,
    };

    /// The raw signed value: `-20.000`.
    pub const PLAIN: NumberStyle = NumberStyle {
        show_sign: false,
        absolute: false,
    };
}

/// Render a quantity with the dashboard precision in the given style.
pub fn render_quantity(formatter: &dyn NumberFormatter, value: f64, style: NumberStyle) -> String {
    let number = sanitize(value);
    let display = if style.absolute { number.abs() } else { number };
    let formatted = formatter.format_number(display, DEFAULT_PRECISION);

    let sign = if !style.show_sign {
        ""
    } else if number > 0.0 {
        PLUS_SIGN
    } else if number < 0.0 {
        MINUS_SIGN
    } else {
        ""
    };

    if sign.is_empty() {
        formatted
    } else {
        format!("{sign} {formatted}")
    }
}
