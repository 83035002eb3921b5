use std::path::{Path, PathBuf};

use fractic_server_error::ServerError;
use iso_currency::Currency;

use crate::{
    domain::repositories::work_record_store::{FIELD_PAYMENT_DATE, FIELD_PAYMENT_STATUS},
    entities::{AnalysisResult, VisaCategory, WorkRecord},
    errors::ReportExportFailed,
    presentation::{
        report_sheet::{Cell, ReportSheet, Row},
        utils::format_pct,
    },
};

const FIELD_WORK_DATE: &str = "fecha";
const FIELD_PROFESSIONAL: &str = "nombre_profesional";
const FIELD_CLIENT: &str = "nombre_comitente";
const FIELD_GOP_NUMBER: &str = "nro_sistema_gop";

enum ReportFormat {
    Csv,
    Json,
    Text,
}

impl ReportFormat {
    fn for_destination(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("csv") => ReportFormat::Csv,
            Some("json") => ReportFormat::Json,
            _ => ReportFormat::Text,
        }
    }
}

pub(crate) struct ReportExporter {
    currency: Currency,
}

impl ReportExporter {
    pub(crate) fn new(currency: Currency) -> Self {
        Self { currency }
    }

    /// Writes the report to `destination`, in a format picked from its
    /// extension, and returns the written path.
    pub(crate) async fn export<P>(
        &self,
        result: &AnalysisResult,
        destination: P,
    ) -> Result<PathBuf, ServerError>
    where
        P: AsRef<Path> + Send,
    {
        let path = destination.as_ref();
        let path_str = path.to_string_lossy();
        let contents = self.render(result, path)?;
        tokio::fs::write(path, contents)
            .await
            .map_err(|e| ReportExportFailed::with_debug(&path_str, &e))?;
        log::info!(
            "Exported analysis report for '{}' to '{}'.",
            result.period.label(),
            path_str
        );
        Ok(path.to_path_buf())
    }

    pub(crate) fn render(&self, result: &AnalysisResult, path: &Path) -> Result<String, ServerError> {
        let path_str = path.to_string_lossy();
        match ReportFormat::for_destination(path) {
            ReportFormat::Csv => self.build_sheet(result).to_csv(&path_str),
            ReportFormat::Json => serde_json::to_string_pretty(result)
                .map_err(|e| ReportExportFailed::with_debug(&path_str, &e)),
            ReportFormat::Text => Ok(self.build_sheet(result).to_text(self.currency)),
        }
    }

    pub(crate) fn build_sheet(&self, result: &AnalysisResult) -> ReportSheet {
        let mut sheet = ReportSheet::new();

        sheet.push(Row::Title(format!(
            "ANÁLISIS DE TASAS DE VISADO - {}",
            result.period.display().to_uppercase()
        )));
        sheet.push(Row::Blank);

        sheet.push(Row::Section("Resumen".to_string()));
        for (label, count) in [
            ("Total de obras", result.total_records()),
            ("Obras pagadas en el período", result.paid_count()),
            ("Obras pendientes de pago", result.pending_count()),
            ("Obras pagadas sin fecha válida", result.dropped_records.len()),
        ] {
            sheet.push(Row::Cells(vec![Cell::text(label), Cell::Count(count)]));
        }
        sheet.push(Row::Blank);

        sheet.push(Row::Section("Tasas pagadas por tipo de visado".to_string()));
        sheet.push(Row::Header(headers(&["Tipo de visado", "Ingeniero", "Total"])));
        for (category, total) in result.category_totals_paid.iter() {
            sheet.push(Row::Cells(vec![
                Cell::text(category.label()),
                Cell::text(result.owner_of(category).unwrap_or_default()),
                Cell::Amount(total.paid),
            ]));
        }
        sheet.push(Row::Blank);

        sheet.push(Row::Section("Honorarios por ingeniero".to_string()));
        sheet.push(Row::Header(vec![
            "Ingeniero".to_string(),
            "Total bruto".to_string(),
            format!("Consejo ({})", format_pct(result.split.consejo_pct())),
            format!("Ingeniero ({})", format_pct(result.split.engineer_pct())),
            "Tipos de visado".to_string(),
        ]));
        for (name, total) in &result.engineer_totals {
            let categories = total
                .categories
                .iter()
                .map(VisaCategory::label)
                .collect::<Vec<_>>()
                .join(", ");
            sheet.push(Row::Cells(vec![
                Cell::text(name.as_str()),
                Cell::Amount(total.gross),
                Cell::Amount(total.consejo_share),
                Cell::Amount(total.engineer_share),
                Cell::text(categories),
            ]));
        }
        sheet.push(Row::Cells(vec![
            Cell::text("TOTAL GENERAL"),
            Cell::Amount(result.total_general()),
            Cell::Amount(result.total_consejo()),
            Cell::Amount(result.total_ingenieros()),
            Cell::Blank,
        ]));
        sheet.push(Row::Blank);

        sheet.push(Row::Section(format!(
            "Obras pagadas en el período ({})",
            result.paid_count()
        )));
        push_detail_table(&mut sheet, &result.paid_records);
        sheet.push(Row::Blank);

        sheet.push(Row::Section(format!(
            "Obras pendientes de pago ({})",
            result.pending_count()
        )));
        push_detail_table(&mut sheet, &result.pending_records);

        sheet
    }
}

fn headers(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn push_detail_table(sheet: &mut ReportSheet, records: &[WorkRecord]) {
    let mut header = headers(&["Fecha", "Profesional", "Comitente"]);
    header.extend(VisaCategory::ALL.iter().map(|c| c.label().to_string()));
    header.extend(headers(&["Total Visados", "Estado Pago", "Fecha Salida", "GOP"]));
    sheet.push(Row::Header(header));

    for record in records {
        let mut cells = vec![
            Cell::text(record.field(FIELD_WORK_DATE)),
            Cell::text(record.field(FIELD_PROFESSIONAL)),
            Cell::text(record.field(FIELD_CLIENT)),
        ];
        cells.extend(
            VisaCategory::ALL
                .iter()
                .map(|c| Cell::amount_or_blank(record.fee(*c).unwrap_or_default())),
        );
        cells.extend([
            Cell::amount_or_blank(record.fee_total()),
            Cell::text(record.field(FIELD_PAYMENT_STATUS)),
            Cell::text(record.field(FIELD_PAYMENT_DATE)),
            Cell::text(record.field(FIELD_GOP_NUMBER)),
        ]);
        sheet.push(Row::Cells(cells));
    }
}
