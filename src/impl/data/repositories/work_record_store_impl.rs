use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use fractic_server_error::ServerError;
use tokio::sync::Mutex;

use crate::{
    data::datasources::obras_csv_datasource::{
        ObrasCsvDatasource as _, ObrasCsvDatasourceImpl, ObrasSheet,
    },
    domain::repositories::work_record_store::{
        WorkRecordStore, FIELD_PAYMENT_DATE, FIELD_PAYMENT_STATUS, FIELD_SETTLED_MARKER,
    },
    entities::{RecordId, VisaCategory, WorkRecord},
    errors::{RecordNotFound, UnknownRecordField},
};

/// Work record store backed by the records sheet in CSV form.
///
/// When file-backed, every read re-loads the file and every update is a full
/// load / mutate / save cycle, so the store never serves a stale sheet. All
/// access goes through a single lock, which makes this the only writer.
pub struct SheetWorkRecordStore {
    datasource: ObrasCsvDatasourceImpl,
    sheet: Mutex<ObrasSheet>,
    path: Option<PathBuf>,
}

impl SheetWorkRecordStore {
    /// In-memory store; updates are kept in memory only.
    pub fn from_string(csv: &str) -> Result<Self, ServerError> {
        let datasource = ObrasCsvDatasourceImpl::new();
        let sheet = datasource.from_string(csv)?;
        Ok(Self {
            datasource,
            sheet: Mutex::new(sheet),
            path: None,
        })
    }

    pub async fn from_file<P>(path: P) -> Result<Self, ServerError>
    where
        P: AsRef<Path> + Send,
    {
        let datasource = ObrasCsvDatasourceImpl::new();
        let sheet = datasource.from_file(path.as_ref()).await?;
        Ok(Self {
            datasource,
            sheet: Mutex::new(sheet),
            path: Some(path.as_ref().to_path_buf()),
        })
    }

    /// Current sheet contents in CSV form.
    pub async fn to_csv_string(&self) -> Result<String, ServerError> {
        let mut sheet = self.sheet.lock().await;
        self.refresh(&mut sheet).await?;
        self.datasource.to_string(&sheet)
    }

    async fn refresh(&self, sheet: &mut ObrasSheet) -> Result<(), ServerError> {
        if let Some(path) = &self.path {
            *sheet = self.datasource.from_file(path).await?;
        }
        Ok(())
    }

    fn is_writable_field(sheet: &ObrasSheet, field: &str) -> bool {
        sheet.has_field(field)
            || [FIELD_PAYMENT_STATUS, FIELD_PAYMENT_DATE, FIELD_SETTLED_MARKER].contains(&field)
            || VisaCategory::ALL.iter().any(|c| c.field_name() == field)
    }
}

#[async_trait]
impl WorkRecordStore for SheetWorkRecordStore {
    async fn list_all_fee_bearing_records(&self) -> Result<Vec<WorkRecord>, ServerError> {
        let mut sheet = self.sheet.lock().await;
        self.refresh(&mut sheet).await?;
        Ok(sheet
            .records()
            .into_iter()
            .filter(WorkRecord::is_fee_bearing)
            .collect())
    }

    async fn get_record(&self, id: RecordId) -> Result<Option<WorkRecord>, ServerError> {
        let mut sheet = self.sheet.lock().await;
        self.refresh(&mut sheet).await?;
        Ok(sheet.record(id))
    }

    async fn update_fields(
        &self,
        id: RecordId,
        fields: &HashMap<String, String>,
    ) -> Result<(), ServerError> {
        let mut sheet = self.sheet.lock().await;
        self.refresh(&mut sheet).await?;

        if sheet.record(id).is_none() {
            return Err(RecordNotFound::new(id.0));
        }
        if let Some(unknown) = fields
            .keys()
            .find(|f| !Self::is_writable_field(&sheet, f))
        {
            return Err(UnknownRecordField::new(unknown));
        }

        // Mutate a copy so a failed save leaves the cached sheet untouched.
        let mut updated = sheet.clone();
        for (field, value) in fields {
            updated.set_field(id, field, value)?;
        }
        if let Some(path) = &self.path {
            self.datasource.to_file(&updated, path).await?;
        }
        *sheet = updated;
        log::debug!("Updated record {} ({} field(s)).", id, fields.len());
        Ok(())
    }
}
