use std::{collections::BTreeMap, fmt};

use chrono::NaiveDate;

/// Position-derived identifier of a work record ("obra"). Row 1 is the first
/// row after the sheet header.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, serde_derive::Serialize)]
pub struct RecordId(pub u64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Clone,
    Copy,
    serde_derive::Serialize,
    serde_derive::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum VisaCategory {
    Gas,
    Salubridad,
    Electrica,
    Electromecanica,
}

impl VisaCategory {
    pub const ALL: [VisaCategory; 4] = [
        VisaCategory::Gas,
        VisaCategory::Salubridad,
        VisaCategory::Electrica,
        VisaCategory::Electromecanica,
    ];

    /// Name of the record field holding the fee amount for this category.
    pub fn field_name(&self) -> &'static str {
        match self {
            VisaCategory::Gas => "visado_gas",
            VisaCategory::Salubridad => "visado_salubridad",
            VisaCategory::Electrica => "visado_electrica",
            VisaCategory::Electromecanica => "visado_electromecanica",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            VisaCategory::Gas => "Gas",
            VisaCategory::Salubridad => "Salubridad",
            VisaCategory::Electrica => "Eléctrica",
            VisaCategory::Electromecanica => "Electromecánica",
        }
    }
}

impl fmt::Display for VisaCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, serde_derive::Serialize)]
pub enum PaymentStatus {
    Paid,
    Unpaid,
}

#[derive(Debug, PartialEq, Clone, serde_derive::Serialize)]
pub enum FeeAmount {
    Amount(f64),
    /// Non-blank but not numeric. Still makes the record fee-bearing, but
    /// contributes nothing to any total.
    Unparseable(String),
}

impl FeeAmount {
    pub fn value(&self) -> Option<f64> {
        match self {
            FeeAmount::Amount(a) => Some(*a),
            FeeAmount::Unparseable(_) => None,
        }
    }
}

#[derive(Debug, PartialEq, Clone, serde_derive::Serialize)]
pub enum PaymentDate {
    Missing,
    Unparseable(String),
    Date(NaiveDate),
}

#[derive(Debug, Clone, serde_derive::Serialize)]
pub struct WorkRecord {
    pub id: RecordId,
    /// Only categories with a non-blank cell are present.
    pub fee_amounts: BTreeMap<VisaCategory, FeeAmount>,
    pub payment_status: PaymentStatus,
    pub payment_date: PaymentDate,
    /// Label of the period this record was already paid out in, if any.
    pub settled_marker: Option<String>,
    /// Every raw cell of the row, keyed by field name. Used for display only.
    pub fields: BTreeMap<String, String>,
}

// --

impl WorkRecord {
    pub fn is_fee_bearing(&self) -> bool {
        !self.fee_amounts.is_empty()
    }

    pub fn is_paid(&self) -> bool {
        self.payment_status == PaymentStatus::Paid
    }

    pub fn is_settled(&self) -> bool {
        self.settled_marker.is_some()
    }

    pub fn fee(&self, category: VisaCategory) -> Option<f64> {
        self.fee_amounts.get(&category).and_then(FeeAmount::value)
    }

    /// Sum of every numeric fee amount on the record.
    pub fn fee_total(&self) -> f64 {
        self.fee_amounts.values().filter_map(FeeAmount::value).sum()
    }

    /// Raw passthrough field, or an empty string if absent.
    pub fn field(&self, name: &str) -> &str {
        self.fields.get(name).map(String::as_str).unwrap_or("")
    }
}
