use std::path::{Path, PathBuf};

use fractic_server_error::ServerError;
use iso_currency::Currency;

use crate::{
    data::{
        datasources::config_ron_datasource::{ConfigRonDatasource as _, ConfigRonDatasourceImpl},
        repositories::work_record_store_impl::SheetWorkRecordStore,
    },
    domain::{
        repositories::work_record_store::WorkRecordStore,
        usecases::analyze_usecase::{AnalyzeUsecase as _, AnalyzeUsecaseImpl},
    },
    entities::{AnalysisOutcome, AnalysisResult, Partition, Period, TasasConfig},
    presentation::report_exporter::ReportExporter,
};

/// Entry point for analyzing visa fees over a period of the records sheet.
///
/// Typical flow is one or more `preview` calls followed by a single
/// `close_period`, after which previews of overlapping periods no longer see
/// the settled records.
pub struct TasasVisadoUtil<S: WorkRecordStore = SheetWorkRecordStore> {
    analyze_usecase: AnalyzeUsecaseImpl<S>,
    exporter: ReportExporter,
}

impl TasasVisadoUtil<SheetWorkRecordStore> {
    pub async fn from_file<P>(records_csv: P, config: TasasConfig) -> Result<Self, ServerError>
    where
        P: AsRef<Path> + Send,
    {
        Ok(Self::with_store(
            SheetWorkRecordStore::from_file(records_csv).await?,
            config,
        ))
    }

    /// In-memory records sheet; `close_period` markers are not persisted.
    pub fn from_string(records_csv: &str, config: TasasConfig) -> Result<Self, ServerError> {
        Ok(Self::with_store(
            SheetWorkRecordStore::from_string(records_csv)?,
            config,
        ))
    }
}

impl<S: WorkRecordStore> TasasVisadoUtil<S> {
    pub fn with_store(store: S, config: TasasConfig) -> Self {
        Self {
            analyze_usecase: AnalyzeUsecaseImpl::new(store, config.routing, config.split),
            exporter: ReportExporter::new(Currency::ARS),
        }
    }

    pub fn store(&self) -> &S {
        self.analyze_usecase.store()
    }

    pub async fn partition(
        &self,
        period: &Period,
        include_settled: bool,
    ) -> Result<Partition, ServerError> {
        self.analyze_usecase.partition(period, include_settled).await
    }

    pub async fn preview(&self, period: &Period) -> Result<AnalysisOutcome, ServerError> {
        self.analyze_usecase.preview(period).await
    }

    pub async fn close_period(&self, period: &Period) -> Result<AnalysisOutcome, ServerError> {
        self.analyze_usecase.close(period).await
    }

    /// Format is chosen from the extension: `.csv`, `.json`, or an aligned
    /// text sheet for anything else.
    pub async fn export_report<P>(
        &self,
        result: &AnalysisResult,
        destination: P,
    ) -> Result<PathBuf, ServerError>
    where
        P: AsRef<Path> + Send,
    {
        self.exporter.export(result, destination).await
    }
}

pub fn config_from_string(ron: &str) -> Result<TasasConfig, ServerError> {
    ConfigRonDatasourceImpl::new().from_string(ron)
}

pub async fn config_from_file<P>(path: P) -> Result<TasasConfig, ServerError>
where
    P: AsRef<Path> + Send,
{
    ConfigRonDatasourceImpl::new().from_file(path).await
}
