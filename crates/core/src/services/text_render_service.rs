use crate::models::card::{Card, ChartSection, VarianceTable};
use crate::models::state::{RenderState, StatusBanner};

/// Plain-text rendering target, for terminals and logs.
///
/// Hidden cards are skipped entirely.
pub struct TextCardRenderer;

impl TextCardRenderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render_banner(&self, banner: &StatusBanner) -> String {
        let tag = match banner.state {
            RenderState::Info => "info",
            RenderState::Loading => "loading",
            RenderState::Error => "error",
        };
        format!("[{tag}] {}", banner.message)
    }

    pub fn render_cards(&self, cards: &[Card]) -> String {
        cards
            .iter()
            .filter(|c| c.is_visible())
            .map(|c| self.render_card(c))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn render_card(&self, card: &Card) -> String {
        let mut out = String::new();
        let title = if card.header.title_muted {
            format!("({})", card.header.title)
        } else {
            card.header.title.clone()
        };
        out.push_str(&format!("[{}] {}\n", card.header.code, title));
        for line in &card.header.meta {
            out.push_str(&format!("  {}: {}\n", line.label, line.value));
        }

        match &card.table.empty_note {
            Some(note) => out.push_str(&format!("  {note}\n")),
            None => out.push_str(&render_table(&card.table)),
        }

        match &card.chart {
            ChartSection::Chart { spec, .. } => {
                let range = spec
                    .value_range()
                    .map(|(lo, hi)| format!(" (min {lo}, max {hi})"))
                    .unwrap_or_default();
                out.push_str(&format!(
                    "  {}: {} points{range}\n",
                    spec.title,
                    spec.point_count()
                ));
            }
            ChartSection::Note(note) => out.push_str(&format!("  {note}\n")),
        }
        out
    }
}

impl Default for TextCardRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn render_table(table: &VarianceTable) -> String {
    let mut grid: Vec<Vec<&str>> = vec![table.columns.iter().map(String::as_str).collect()];
    for row in &table.rows {
        let mut line = vec![row.label.as_str()];
        line.extend(row.texts());
        grid.push(line);
    }

    let column_count = grid.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = (0..column_count)
        .map(|i| {
            grid.iter()
                .filter_map(|line| line.get(i))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    for line in &grid {
        let cells: Vec<String> = line
            .iter()
            .zip(&widths)
            .enumerate()
            .map(|(i, (cell, width))| {
                let pad = width.saturating_sub(cell.chars().count());
                if i == 0 {
                    format!("{cell}{}", " ".repeat(pad))
                } else {
                    format!("{}{cell}", " ".repeat(pad))
                }
            })
            .collect();
        out.push_str("  ");
        out.push_str(cells.join(" | ").trim_end());
        out.push('\n');
    }
    out
}
