use std::collections::HashMap;

use async_trait::async_trait;
use fractic_server_error::ServerError;

use crate::entities::{RecordId, WorkRecord};

pub const FIELD_PAYMENT_STATUS: &str = "estado_pago_visado";
pub const FIELD_PAYMENT_DATE: &str = "fecha_salida";
pub const FIELD_SETTLED_MARKER: &str = "analizada_en_periodo";

/// Value of the payment status field that means "paid". Anything else is
/// unpaid.
pub const PAID_STATUS: &str = "Pagado";

/// Backing store for work records ("obras").
///
/// Implementations must serialize their own mutations: `update_fields` calls
/// never interleave with each other.
#[async_trait]
pub trait WorkRecordStore: Send + Sync {
    /// Every record with at least one non-blank visa fee.
    async fn list_all_fee_bearing_records(&self) -> Result<Vec<WorkRecord>, ServerError>;

    async fn get_record(&self, id: RecordId) -> Result<Option<WorkRecord>, ServerError>;

    /// Overwrites the given fields of one record. Either all fields are
    /// written or none are.
    async fn update_fields(
        &self,
        id: RecordId,
        fields: &HashMap<String, String>,
    ) -> Result<(), ServerError>;
}
