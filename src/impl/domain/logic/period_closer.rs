use std::collections::HashMap;

use futures::stream::{self, StreamExt as _};

use crate::{
    domain::repositories::work_record_store::{WorkRecordStore, FIELD_SETTLED_MARKER},
    entities::{CloseReport, WorkRecord},
};

/// Writes the settlement marker to every record paid out in a period.
///
/// Writes are best-effort and sequential: a failed record is reported and the
/// rest are still written. Nothing is rolled back.
pub(crate) struct PeriodCloser<'a, S: WorkRecordStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: WorkRecordStore + ?Sized> PeriodCloser<'a, S> {
    pub(crate) fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub(crate) async fn close(
        &self,
        paid_records: &[WorkRecord],
        period_label: &str,
    ) -> CloseReport {
        let store = self.store;
        let fields = HashMap::from([(FIELD_SETTLED_MARKER.to_string(), period_label.to_string())]);
        let outcomes: Vec<_> = stream::iter(paid_records)
            .then(|record| {
                let fields = &fields;
                async move { (record.id, store.update_fields(record.id, fields).await) }
            })
            .collect()
            .await;

        let mut report = CloseReport {
            period_label: period_label.to_string(),
            marked: Vec::new(),
            failed: Vec::new(),
        };
        for (id, outcome) in outcomes {
            match outcome {
                Ok(()) => report.marked.push(id),
                Err(e) => {
                    log::warn!("Could not mark record {} as settled: {}", id, e);
                    report.failed.push((id, e.to_string()));
                }
            }
        }
        log::info!(
            "Closed period '{}': {} record(s) marked, {} failed.",
            period_label,
            report.marked.len(),
            report.failed.len()
        );
        report
    }
}
