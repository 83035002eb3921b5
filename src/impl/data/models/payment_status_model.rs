use crate::{domain::repositories::work_record_store::PAID_STATUS, entities::PaymentStatus};

#[derive(Debug)]
pub(crate) struct PaymentStatusModel<'a>(pub &'a str);

impl<'a> Into<PaymentStatus> for PaymentStatusModel<'a> {
    fn into(self) -> PaymentStatus {
        if self.0.trim() == PAID_STATUS {
            PaymentStatus::Paid
        } else {
            PaymentStatus::Unpaid
        }
    }
}
