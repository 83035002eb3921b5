use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::entities::{
    FeeAmount, PaymentDate, PaymentStatus, RecordId, VisaCategory, WorkRecord,
};

pub(crate) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub(crate) fn record(id: u64, fees: &[(VisaCategory, f64)]) -> WorkRecord {
    WorkRecord {
        id: RecordId(id),
        fee_amounts: fees
            .iter()
            .map(|(c, a)| (*c, FeeAmount::Amount(*a)))
            .collect(),
        payment_status: PaymentStatus::Unpaid,
        payment_date: PaymentDate::Missing,
        settled_marker: None,
        fields: BTreeMap::new(),
    }
}

pub(crate) fn paid_on(mut r: WorkRecord, day: NaiveDate) -> WorkRecord {
    r.payment_status = PaymentStatus::Paid;
    r.payment_date = PaymentDate::Date(day);
    r
}

pub(crate) fn settled(mut r: WorkRecord, label: &str) -> WorkRecord {
    r.settled_marker = Some(label.to_string());
    r
}
