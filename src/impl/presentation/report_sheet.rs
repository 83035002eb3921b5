use fractic_server_error::ServerError;
use iso_currency::Currency;

use crate::{errors::ReportExportFailed, presentation::utils::format_number};

/// Widest a text column may grow before its cells get wrapped.
const MAX_TEXT_COLUMN_WIDTH: usize = 36;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Cell {
    Text(String),
    Amount(f64),
    Count(usize),
    Blank,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Row {
    /// Spans the whole sheet.
    Title(String),
    /// Spans the whole sheet.
    Section(String),
    Header(Vec<String>),
    Cells(Vec<Cell>),
    Blank,
}

/// Presentation-agnostic grid that the exporter fills and then renders as
/// CSV or as an aligned text sheet.
#[derive(Debug, Default)]
pub(crate) struct ReportSheet {
    rows: Vec<Row>,
}

impl Cell {
    pub(crate) fn text(s: impl Into<String>) -> Self {
        let s = s.into();
        if s.is_empty() {
            Cell::Blank
        } else {
            Cell::Text(s)
        }
    }

    /// Amount, or blank when zero (matches how empty fees are shown).
    pub(crate) fn amount_or_blank(amount: f64) -> Self {
        if amount > 0.0 {
            Cell::Amount(amount)
        } else {
            Cell::Blank
        }
    }

    fn render_raw(&self) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Amount(a) => format!("{:.2}", a),
            Cell::Count(c) => c.to_string(),
            Cell::Blank => String::new(),
        }
    }

    fn render_pretty(&self, currency: Currency) -> String {
        match self {
            Cell::Amount(a) => format_number(*a, currency),
            other => other.render_raw(),
        }
    }

    fn right_aligned(&self) -> bool {
        matches!(self, Cell::Amount(_) | Cell::Count(_))
    }
}

impl ReportSheet {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, row: Row) {
        self.rows.push(row);
    }

    #[cfg(test)]
    pub(crate) fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// `destination` only labels errors.
    pub(crate) fn to_csv(&self, destination: &str) -> Result<String, ServerError> {
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_writer(Vec::new());
        for row in &self.rows {
            let fields: Vec<String> = match row {
                Row::Title(s) | Row::Section(s) => vec![s.clone()],
                Row::Header(h) => h.clone(),
                Row::Cells(cells) => cells.iter().map(Cell::render_raw).collect(),
                Row::Blank => vec![String::new()],
            };
            writer
                .write_record(&fields)
                .map_err(|e| ReportExportFailed::with_debug(destination, &e))?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| ReportExportFailed::with_debug(destination, e.error()))?;
        String::from_utf8(bytes).map_err(|e| ReportExportFailed::with_debug(destination, &e))
    }

    /// Column widths derived from the rendered content, capped so that long
    /// names wrap instead of stretching the sheet.
    pub(crate) fn column_widths(&self, currency: Currency) -> Vec<usize> {
        let mut widths: Vec<usize> = Vec::new();
        let mut widen = |i: usize, len: usize| {
            if widths.len() <= i {
                widths.resize(i + 1, 0);
            }
            widths[i] = widths[i].max(len.min(MAX_TEXT_COLUMN_WIDTH));
        };
        for row in &self.rows {
            match row {
                Row::Header(h) => h
                    .iter()
                    .enumerate()
                    .for_each(|(i, s)| widen(i, s.chars().count())),
                Row::Cells(cells) => cells
                    .iter()
                    .enumerate()
                    .for_each(|(i, c)| widen(i, c.render_pretty(currency).chars().count())),
                Row::Title(_) | Row::Section(_) | Row::Blank => {}
            }
        }
        widths
    }

    pub(crate) fn to_text(&self, currency: Currency) -> String {
        let widths = self.column_widths(currency);
        let total_width = widths.iter().sum::<usize>() + 3 * widths.len().saturating_sub(1);
        let mut out = String::new();
        for row in &self.rows {
            match row {
                Row::Title(s) => {
                    out.push_str(&s.to_uppercase());
                    out.push('\n');
                    out.push_str(&"=".repeat(total_width.max(s.chars().count())));
                    out.push('\n');
                }
                Row::Section(s) => {
                    out.push_str(&format!("-- {} ", s));
                    let used = s.chars().count() + 4;
                    out.push_str(&"-".repeat(total_width.saturating_sub(used)));
                    out.push('\n');
                }
                Row::Header(h) => {
                    let cells: Vec<(String, bool)> = h.iter().map(|s| (s.clone(), false)).collect();
                    Self::push_wrapped_line(&mut out, &cells, &widths);
                    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
                    out.push_str(rule.join("-+-").trim_end());
                    out.push('\n');
                }
                Row::Cells(cells) => {
                    let cells: Vec<(String, bool)> = cells
                        .iter()
                        .map(|c| (c.render_pretty(currency), c.right_aligned()))
                        .collect();
                    Self::push_wrapped_line(&mut out, &cells, &widths);
                }
                Row::Blank => out.push('\n'),
            }
        }
        out
    }

    fn push_wrapped_line(out: &mut String, cells: &[(String, bool)], widths: &[usize]) {
        let wrapped: Vec<Vec<String>> = cells
            .iter()
            .enumerate()
            .map(|(i, (s, _))| {
                let width = widths.get(i).copied().unwrap_or(MAX_TEXT_COLUMN_WIDTH).max(1);
                if s.chars().count() <= width {
                    vec![s.clone()]
                } else {
                    textwrap::wrap(s, width)
                        .into_iter()
                        .map(|l| l.into_owned())
                        .collect()
                }
            })
            .collect();
        let height = wrapped.iter().map(Vec::len).max().unwrap_or(1);
        for line in 0..height {
            let parts: Vec<String> = wrapped
                .iter()
                .enumerate()
                .map(|(i, lines)| {
                    let width = widths.get(i).copied().unwrap_or(0);
                    let s = lines.get(line).map(String::as_str).unwrap_or("");
                    if cells[i].1 {
                        format!("{:>width$}", s)
                    } else {
                        format!("{:<width$}", s)
                    }
                })
                .collect();
            out.push_str(parts.join(" | ").trim_end());
            out.push('\n');
        }
    }
}
