use async_trait::async_trait;
use fractic_server_error::ServerError;

use crate::{
    data::models::obra_row_model::ObraRowModel,
    entities::{RecordId, WorkRecord},
    errors::{InvalidCsv, ReadError, RecordNotFound, WriteError},
};

/// In-memory copy of the "Obras en general" sheet. Cells are kept as raw
/// strings so that rewriting the sheet preserves every column untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct ObrasSheet {
    pub(crate) headers: Vec<String>,
    pub(crate) rows: Vec<Vec<String>>,
}

impl ObrasSheet {
    fn row_index(id: RecordId) -> Option<usize> {
        (id.0 as usize).checked_sub(1)
    }

    pub(crate) fn records(&self) -> Vec<WorkRecord> {
        self.rows
            .iter()
            .enumerate()
            .map(|(i, cells)| ObraRowModel::new(RecordId(i as u64 + 1), &self.headers, cells).into())
            .collect()
    }

    pub(crate) fn record(&self, id: RecordId) -> Option<WorkRecord> {
        let cells = self.rows.get(Self::row_index(id)?)?;
        Some(ObraRowModel::new(id, &self.headers, cells).into())
    }

    pub(crate) fn has_field(&self, field: &str) -> bool {
        self.headers.iter().any(|h| h == field)
    }

    /// Sets one cell, appending the column first if the sheet doesn't have it.
    pub(crate) fn set_field(
        &mut self,
        id: RecordId,
        field: &str,
        value: &str,
    ) -> Result<(), ServerError> {
        let row_index = Self::row_index(id)
            .filter(|i| *i < self.rows.len())
            .ok_or_else(|| RecordNotFound::new(id.0))?;
        let column = match self.headers.iter().position(|h| h == field) {
            Some(c) => c,
            None => {
                self.headers.push(field.to_string());
                self.headers.len() - 1
            }
        };
        let row = &mut self.rows[row_index];
        if row.len() <= column {
            row.resize(column + 1, String::new());
        }
        row[column] = value.to_string();
        Ok(())
    }
}

#[async_trait]
pub(crate) trait ObrasCsvDatasource: Send + Sync {
    fn from_string(&self, s: &str) -> Result<ObrasSheet, ServerError>;

    fn to_string(&self, sheet: &ObrasSheet) -> Result<String, ServerError>;

    async fn from_file<P>(&self, path: P) -> Result<ObrasSheet, ServerError>
    where
        P: AsRef<std::path::Path> + Send;

    async fn to_file<P>(&self, sheet: &ObrasSheet, path: P) -> Result<(), ServerError>
    where
        P: AsRef<std::path::Path> + Send;
}

pub(crate) struct ObrasCsvDatasourceImpl;

impl ObrasCsvDatasourceImpl {
    pub(crate) fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ObrasCsvDatasource for ObrasCsvDatasourceImpl {
    fn from_string(&self, s: &str) -> Result<ObrasSheet, ServerError> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(s.as_bytes());
        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| InvalidCsv::with_debug(&e))?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();
        let rows = reader
            .records()
            .map(|r| {
                r.map_err(|e| InvalidCsv::with_debug(&e))
                    .map(|r| r.iter().map(str::to_string).collect::<Vec<_>>())
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ObrasSheet { headers, rows })
    }

    fn to_string(&self, sheet: &ObrasSheet) -> Result<String, ServerError> {
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_writer(Vec::new());
        writer
            .write_record(&sheet.headers)
            .map_err(|e| InvalidCsv::with_debug(&e))?;
        for row in &sheet.rows {
            writer
                .write_record(row)
                .map_err(|e| InvalidCsv::with_debug(&e))?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| InvalidCsv::with_debug(e.error()))?;
        String::from_utf8(bytes).map_err(|e| InvalidCsv::with_debug(&e))
    }

    async fn from_file<P>(&self, path: P) -> Result<ObrasSheet, ServerError>
    where
        P: AsRef<std::path::Path> + Send,
    {
        self.from_string(
            &tokio::fs::read_to_string(path)
                .await
                .map_err(|e| ReadError::with_debug(&e))?,
        )
    }

    async fn to_file<P>(&self, sheet: &ObrasSheet, path: P) -> Result<(), ServerError>
    where
        P: AsRef<std::path::Path> + Send,
    {
        tokio::fs::write(path, self.to_string(sheet)?)
            .await
            .map_err(|e| WriteError::with_debug(&e))
    }
}
