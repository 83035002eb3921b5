use std::{collections::BTreeMap, str::FromStr as _};

use crate::{
    data::models::{
        dmy_date_model::DmyDateModel, fee_amount_model::FeeAmountModel,
        payment_status_model::PaymentStatusModel,
    },
    domain::repositories::work_record_store::{
        FIELD_PAYMENT_DATE, FIELD_PAYMENT_STATUS, FIELD_SETTLED_MARKER,
    },
    entities::{FeeAmount, PaymentDate, PaymentStatus, RecordId, VisaCategory, WorkRecord},
};

/// One data row of the records sheet, keyed by header.
#[derive(Debug)]
pub(crate) struct ObraRowModel {
    pub(crate) id: RecordId,
    pub(crate) fields: BTreeMap<String, String>,
}

impl ObraRowModel {
    pub(crate) fn new(id: RecordId, headers: &[String], cells: &[String]) -> Self {
        let fields = headers
            .iter()
            .enumerate()
            .map(|(i, h)| {
                (
                    h.clone(),
                    cells.get(i).map(|c| c.trim().to_string()).unwrap_or_default(),
                )
            })
            .collect();
        Self { id, fields }
    }

    fn non_blank(&self, field: &str) -> Option<&str> {
        self.fields
            .get(field)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}

impl Into<WorkRecord> for ObraRowModel {
    fn into(self) -> WorkRecord {
        let fee_amounts = VisaCategory::ALL
            .iter()
            .filter_map(|category| {
                let raw = self.non_blank(category.field_name())?;
                let amount = match FeeAmountModel::from_str(raw) {
                    Ok(amount) => FeeAmount::Amount(amount.into()),
                    Err(_) => {
                        log::warn!(
                            "Record {}: non-numeric {} value '{}' will not be counted.",
                            self.id,
                            category.field_name(),
                            raw
                        );
                        FeeAmount::Unparseable(raw.to_string())
                    }
                };
                Some((*category, amount))
            })
            .collect();
        let payment_status: PaymentStatus =
            PaymentStatusModel(self.non_blank(FIELD_PAYMENT_STATUS).unwrap_or("")).into();
        let payment_date = match self.non_blank(FIELD_PAYMENT_DATE) {
            None => PaymentDate::Missing,
            Some(raw) => match DmyDateModel::from_str(raw) {
                Ok(d) => PaymentDate::Date(d.into()),
                Err(_) => PaymentDate::Unparseable(raw.to_string()),
            },
        };
        let settled_marker = self.non_blank(FIELD_SETTLED_MARKER).map(str::to_string);

        WorkRecord {
            id: self.id,
            fee_amounts,
            payment_status,
            payment_date,
            settled_marker,
            fields: self.fields,
        }
    }
}
