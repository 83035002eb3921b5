use chrono::NaiveDate;
use fractic_server_error::ServerError;

use crate::{
    entities::{DropReason, DroppedRecord, Partition, PaymentDate, PaymentStatus, WorkRecord},
    errors::InvalidDateRange,
};

/// Splits fee-bearing records into those paid inside an inclusive date range
/// and those still pending payment.
pub(crate) struct FeePartitioner {
    range_start: NaiveDate,
    range_end: NaiveDate,
    include_settled: bool,
}

impl FeePartitioner {
    pub(crate) fn new(
        range_start: NaiveDate,
        range_end: NaiveDate,
        include_settled: bool,
    ) -> Result<Self, ServerError> {
        if range_start > range_end {
            return Err(InvalidDateRange::new(&range_start, &range_end));
        }
        Ok(Self {
            range_start,
            range_end,
            include_settled,
        })
    }

    pub(crate) fn process(&self, records: Vec<WorkRecord>) -> Partition {
        records
            .into_iter()
            .filter(WorkRecord::is_fee_bearing)
            .filter(|r| {
                let keep = self.include_settled || !r.is_settled();
                if !keep {
                    log::debug!(
                        "Record {} skipped: already settled in '{}'.",
                        r.id,
                        r.settled_marker.as_deref().unwrap_or_default()
                    );
                }
                keep
            })
            .fold(Partition::default(), |mut partition, r| {
                match self.place(&r) {
                    Placement::Paid => partition.paid.push(r),
                    Placement::Pending => partition.pending.push(r),
                    Placement::OutOfRange => {}
                    Placement::Dropped(reason) => {
                        log::warn!("Record {} is paid but {}; skipped.", r.id, reason);
                        partition.dropped.push(DroppedRecord { id: r.id, reason });
                    }
                }
                partition
            })
    }

    fn place(&self, r: &WorkRecord) -> Placement {
        match (&r.payment_status, &r.payment_date) {
            // Unpaid work has no natural period: always surfaced.
            (PaymentStatus::Unpaid, _) => Placement::Pending,
            (PaymentStatus::Paid, PaymentDate::Date(d)) => {
                if self.range_start <= *d && *d <= self.range_end {
                    Placement::Paid
                } else {
                    Placement::OutOfRange
                }
            }
            (PaymentStatus::Paid, PaymentDate::Missing) => {
                Placement::Dropped(DropReason::MissingPaymentDate)
            }
            (PaymentStatus::Paid, PaymentDate::Unparseable(raw)) => {
                Placement::Dropped(DropReason::UnparseablePaymentDate(raw.clone()))
            }
        }
    }
}

enum Placement {
    Paid,
    Pending,
    OutOfRange,
    Dropped(DropReason),
}
