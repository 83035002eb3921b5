use std::{collections::BTreeMap, fmt};

use super::{
    engineer_routing::SplitRule,
    period::Period,
    work_record::{RecordId, VisaCategory, WorkRecord},
};

#[derive(Debug, PartialEq, Clone, Copy, Default, serde_derive::Serialize)]
pub struct CategoryTotal {
    pub total: f64,
    pub paid: f64,
    pub unpaid: f64,
}

/// Per-category fee sums. All four categories are always present.
#[derive(Debug, PartialEq, Clone, serde_derive::Serialize)]
pub struct CategoryTotals(pub(crate) BTreeMap<VisaCategory, CategoryTotal>);

#[derive(Debug, PartialEq, Clone, serde_derive::Serialize)]
pub struct EngineerTotal {
    pub gross: f64,
    pub consejo_share: f64,
    pub engineer_share: f64,
    pub categories: Vec<VisaCategory>,
}

#[derive(Debug, PartialEq, Clone, serde_derive::Serialize)]
pub enum DropReason {
    MissingPaymentDate,
    UnparseablePaymentDate(String),
}

/// A paid record left out of the analysis because its payment date can't be
/// placed in any period.
#[derive(Debug, PartialEq, Clone, serde_derive::Serialize)]
pub struct DroppedRecord {
    pub id: RecordId,
    pub reason: DropReason,
}

#[derive(Debug, Clone, Default, serde_derive::Serialize)]
pub struct Partition {
    /// Paid inside the range and not settled before.
    pub paid: Vec<WorkRecord>,
    /// Every unpaid record, regardless of range.
    pub pending: Vec<WorkRecord>,
    pub dropped: Vec<DroppedRecord>,
}

#[derive(Debug, PartialEq, Clone, serde_derive::Serialize)]
pub struct CloseReport {
    pub period_label: String,
    pub marked: Vec<RecordId>,
    pub failed: Vec<(RecordId, String)>,
}

#[derive(Debug, Clone, serde_derive::Serialize)]
pub struct AnalysisResult {
    pub period: Period,
    pub paid_records: Vec<WorkRecord>,
    pub pending_records: Vec<WorkRecord>,
    pub dropped_records: Vec<DroppedRecord>,
    pub category_totals_paid: CategoryTotals,
    pub category_totals_all: CategoryTotals,
    pub engineer_totals: BTreeMap<String, EngineerTotal>,
    pub split: SplitRule,
    /// Present only when the analysis closed the period.
    pub close_report: Option<CloseReport>,
}

#[derive(Debug, PartialEq, Clone, serde_derive::Serialize)]
pub enum NothingToAnalyze {
    NoFeeBearingRecords,
    NothingInPeriod { period_label: String },
}

#[derive(Debug, Clone, serde_derive::Serialize)]
pub enum AnalysisOutcome {
    Analysis(AnalysisResult),
    NothingToAnalyze(NothingToAnalyze),
}

// --

impl CategoryTotals {
    pub fn get(&self, category: VisaCategory) -> CategoryTotal {
        self.0.get(&category).copied().unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (VisaCategory, CategoryTotal)> + '_ {
        self.0.iter().map(|(c, t)| (*c, *t))
    }
}

impl Default for CategoryTotals {
    fn default() -> Self {
        Self(
            VisaCategory::ALL
                .iter()
                .map(|c| (*c, CategoryTotal::default()))
                .collect(),
        )
    }
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropReason::MissingPaymentDate => f.write_str("has no payment date"),
            DropReason::UnparseablePaymentDate(raw) => {
                write!(f, "its payment date '{}' can't be parsed", raw)
            }
        }
    }
}

impl CloseReport {
    pub fn count_marked(&self) -> usize {
        self.marked.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

impl AnalysisResult {
    pub fn total_records(&self) -> usize {
        self.paid_records.len() + self.pending_records.len()
    }

    pub fn paid_count(&self) -> usize {
        self.paid_records.len()
    }

    pub fn pending_count(&self) -> usize {
        self.pending_records.len()
    }

    pub fn total_general(&self) -> f64 {
        self.engineer_totals.values().map(|e| e.gross).sum()
    }

    pub fn total_consejo(&self) -> f64 {
        self.engineer_totals.values().map(|e| e.consejo_share).sum()
    }

    pub fn total_ingenieros(&self) -> f64 {
        self.engineer_totals.values().map(|e| e.engineer_share).sum()
    }

    /// Name of the engineer owning `category` in this analysis.
    pub fn owner_of(&self, category: VisaCategory) -> Option<&str> {
        self.engineer_totals
            .iter()
            .find(|(_, t)| t.categories.contains(&category))
            .map(|(name, _)| name.as_str())
    }
}

impl NothingToAnalyze {
    pub fn message(&self) -> String {
        match self {
            NothingToAnalyze::NoFeeBearingRecords => {
                "No se encontraron obras con tasas de visado.".to_string()
            }
            NothingToAnalyze::NothingInPeriod { period_label } => format!(
                "No se encontraron obras pagadas en {} que no hayan sido analizadas previamente, ni obras pendientes de pago.",
                period_label
            ),
        }
    }
}

impl AnalysisOutcome {
    pub fn analysis(&self) -> Option<&AnalysisResult> {
        match self {
            AnalysisOutcome::Analysis(a) => Some(a),
            AnalysisOutcome::NothingToAnalyze(_) => None,
        }
    }

    pub fn into_analysis(self) -> Option<AnalysisResult> {
        match self {
            AnalysisOutcome::Analysis(a) => Some(a),
            AnalysisOutcome::NothingToAnalyze(_) => None,
        }
    }
}
