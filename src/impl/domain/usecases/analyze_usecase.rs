use async_trait::async_trait;
use fractic_server_error::ServerError;
use tokio::sync::Mutex;

use crate::{
    domain::{
        logic::{
            engineer_attributor::EngineerAttributor, fee_aggregator::FeeAggregator,
            fee_partitioner::FeePartitioner, period_closer::PeriodCloser,
        },
        repositories::work_record_store::WorkRecordStore,
    },
    entities::{
        AnalysisOutcome, AnalysisResult, EngineerRouting, NothingToAnalyze, Partition, Period,
        SplitRule,
    },
};

#[async_trait]
pub trait AnalyzeUsecase: Send + Sync {
    async fn partition(
        &self,
        period: &Period,
        include_settled: bool,
    ) -> Result<Partition, ServerError>;

    /// Read-only analysis; can be re-run any number of times.
    async fn preview(&self, period: &Period) -> Result<AnalysisOutcome, ServerError>;

    /// Regenerates the analysis and marks its paid records as settled under
    /// the period's label.
    async fn close(&self, period: &Period) -> Result<AnalysisOutcome, ServerError>;
}

pub(crate) struct AnalyzeUsecaseImpl<S: WorkRecordStore> {
    store: S,
    routing: EngineerRouting,
    split: SplitRule,
    /// Held by a close from reading the records until the last marker is
    /// written.
    close_guard: Mutex<()>,
}

#[async_trait]
impl<S: WorkRecordStore> AnalyzeUsecase for AnalyzeUsecaseImpl<S> {
    async fn partition(
        &self,
        period: &Period,
        include_settled: bool,
    ) -> Result<Partition, ServerError> {
        let partitioner = FeePartitioner::new(period.start(), period.end(), include_settled)?;
        let records = self.store.list_all_fee_bearing_records().await?;
        Ok(partitioner.process(records))
    }

    async fn preview(&self, period: &Period) -> Result<AnalysisOutcome, ServerError> {
        self.generate(period, false).await
    }

    async fn close(&self, period: &Period) -> Result<AnalysisOutcome, ServerError> {
        self.generate(period, true).await
    }
}

impl<S: WorkRecordStore> AnalyzeUsecaseImpl<S> {
    pub(crate) fn new(store: S, routing: EngineerRouting, split: SplitRule) -> Self {
        Self {
            store,
            routing,
            split,
            close_guard: Mutex::new(()),
        }
    }

    pub(crate) fn store(&self) -> &S {
        &self.store
    }

    async fn generate(
        &self,
        period: &Period,
        mark_as_settled: bool,
    ) -> Result<AnalysisOutcome, ServerError> {
        // Validated before touching the store.
        let partitioner = FeePartitioner::new(period.start(), period.end(), false)?;

        let _close_guard = if mark_as_settled {
            Some(self.close_guard.lock().await)
        } else {
            None
        };
        let records = self.store.list_all_fee_bearing_records().await?;
        if records.is_empty() {
            log::info!("No fee-bearing records found.");
            return Ok(AnalysisOutcome::NothingToAnalyze(
                NothingToAnalyze::NoFeeBearingRecords,
            ));
        }

        let Partition {
            paid,
            pending,
            dropped,
        } = partitioner.process(records);
        if paid.is_empty() && pending.is_empty() {
            log::info!("Nothing to analyze for period '{}'.", period.label());
            return Ok(AnalysisOutcome::NothingToAnalyze(
                NothingToAnalyze::NothingInPeriod {
                    period_label: period.display().to_string(),
                },
            ));
        }

        let category_totals_paid = FeeAggregator::new(&paid, true).process();
        let all_records = [paid.as_slice(), pending.as_slice()].concat();
        let category_totals_all = FeeAggregator::new(&all_records, false).process();
        let engineer_totals =
            EngineerAttributor::new(&self.routing, &self.split).process(&category_totals_paid);

        let close_report = if mark_as_settled {
            Some(PeriodCloser::new(&self.store).close(&paid, period.label()).await)
        } else {
            None
        };

        let result = AnalysisResult {
            period: period.clone(),
            paid_records: paid,
            pending_records: pending,
            dropped_records: dropped,
            category_totals_paid,
            category_totals_all,
            engineer_totals,
            split: self.split,
            close_report,
        };
        log::info!(
            "Analysis for '{}': {} paid, {} pending, {} dropped; total {:.2}.",
            period.label(),
            result.paid_count(),
            result.pending_count(),
            result.dropped_records.len(),
            result.total_general()
        );
        Ok(AnalysisOutcome::Analysis(result))
    }
}
