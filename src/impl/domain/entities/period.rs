use chrono::{Datelike as _, Duration, NaiveDate};
use fractic_server_error::ServerError;

use crate::errors::{InvalidDateRange, InvalidMonth};

const MONTH_NAMES: [&str; 12] = [
    "Enero",
    "Febrero",
    "Marzo",
    "Abril",
    "Mayo",
    "Junio",
    "Julio",
    "Agosto",
    "Septiembre",
    "Octubre",
    "Noviembre",
    "Diciembre",
];

/// Analysis window. Both ends are inclusive, and `start <= end` always holds.
#[derive(Debug, PartialEq, Eq, Clone, serde_derive::Serialize)]
pub struct Period {
    label: String,
    display: String,
    start: NaiveDate,
    end: NaiveDate,
}

impl Period {
    pub fn range(start: NaiveDate, end: NaiveDate) -> Result<Self, ServerError> {
        if start > end {
            return Err(InvalidDateRange::new(&start, &end));
        }
        let label = format!("{} - {}", start.format("%d/%m/%Y"), end.format("%d/%m/%Y"));
        Ok(Self {
            display: label.clone(),
            label,
            start,
            end,
        })
    }

    pub fn month(year: i32, month: u32) -> Result<Self, ServerError> {
        let start =
            NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| InvalidMonth::new(month, year))?;
        let next_month_start = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        }
        .ok_or_else(|| InvalidMonth::new(month, year))?;
        Ok(Self {
            label: format!("{:02}/{}", month, year),
            display: format!("{} {}", MONTH_NAMES[month as usize - 1], year),
            start,
            end: next_month_start - Duration::days(1),
        })
    }

    /// Written to settled records when the period is closed.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Human-readable description, used in report titles.
    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    // Presets relative to a given day.

    pub fn current_month(today: NaiveDate) -> Result<Self, ServerError> {
        Self::month(today.year(), today.month())
    }

    pub fn previous_month(today: NaiveDate) -> Result<Self, ServerError> {
        if today.month() == 1 {
            Self::month(today.year() - 1, 12)
        } else {
            Self::month(today.year(), today.month() - 1)
        }
    }

    pub fn last_30_days(today: NaiveDate) -> Result<Self, ServerError> {
        Self::range(today - Duration::days(30), today)
    }

    pub fn current_year(today: NaiveDate) -> Result<Self, ServerError> {
        let start = NaiveDate::from_ymd_opt(today.year(), 1, 1)
            .ok_or_else(|| InvalidMonth::new(1, today.year()))?;
        let end = NaiveDate::from_ymd_opt(today.year(), 12, 31)
            .ok_or_else(|| InvalidMonth::new(12, today.year()))?;
        Self::range(start, end)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// File name (without extension) suggested for exporting this period's
    /// report, e.g. `Analisis_Tasas_Marzo_2024`.
    pub fn suggested_export_name(&self) -> String {
        let sanitized: String = self
            .display
            .chars()
            .map(|c| match c {
                ' ' => '_',
                '/' => '-',
                'á' => 'a',
                'é' => 'e',
                'í' => 'i',
                'ó' => 'o',
                'ú' => 'u',
                c => c,
            })
            .collect();
        format!("Analisis_Tasas_{}", sanitized)
    }
}
