use std::{
    collections::{HashMap, HashSet},
    sync::Mutex,
};

use async_trait::async_trait;
use chrono::NaiveDate;
use fractic_server_error::ServerError;
use tasas_visado::{
    entities::{
        AnalysisOutcome, EngineerRouting, NothingToAnalyze, Period, RecordId, SplitRule,
        TasasConfig, VisaCategory, WorkRecord,
    },
    errors::RecordNotFound,
    store::{SheetWorkRecordStore, WorkRecordStore, FIELD_SETTLED_MARKER},
    util::{config_from_string, TasasVisadoUtil},
};

const HEADER: &str = "fecha,nombre_profesional,nombre_comitente,visado_gas,visado_salubridad,visado_electrica,visado_electromecanica,estado_pago_visado,fecha_salida";

fn sheet(rows: &[&str]) -> String {
    let mut s = HEADER.to_string();
    for row in rows {
        s.push('\n');
        s.push_str(row);
    }
    s.push('\n');
    s
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn march() -> Period {
    Period::range(date(2024, 3, 1), date(2024, 3, 31)).unwrap()
}

fn util(rows: &[&str]) -> TasasVisadoUtil {
    TasasVisadoUtil::from_string(&sheet(rows), TasasConfig::default()).unwrap()
}

fn ids(records: &[WorkRecord]) -> Vec<RecordId> {
    records.iter().map(|r| r.id).collect()
}

#[tokio::test]
async fn paid_gas_record_in_range() {
    let util = util(&["01/03/2024,PEREZ,ACME,1000,,,,Pagado,15/03/2024"]);

    let partition = util.partition(&march(), false).await.unwrap();
    assert_eq!(ids(&partition.paid), vec![RecordId(1)]);
    assert!(partition.pending.is_empty());

    let result = util.preview(&march()).await.unwrap().into_analysis().unwrap();
    assert_eq!(result.category_totals_paid.get(VisaCategory::Gas).paid, 1000.0);
    let owner = EngineerRouting::default()
        .owner_of(VisaCategory::Gas)
        .unwrap()
        .to_string();
    let engineer = &result.engineer_totals[&owner];
    assert_eq!(engineer.gross, 1000.0);
    assert_eq!(engineer.consejo_share, 300.0);
    assert_eq!(engineer.engineer_share, 700.0);
}

#[tokio::test]
async fn paid_outside_range_is_neither_paid_nor_pending() {
    let util = util(&["01/03/2024,PEREZ,ACME,1000,,,,Pagado,15/04/2024"]);

    let partition = util.partition(&march(), false).await.unwrap();
    assert!(partition.paid.is_empty());
    assert!(partition.pending.is_empty());
    assert!(matches!(
        util.preview(&march()).await.unwrap(),
        AnalysisOutcome::NothingToAnalyze(NothingToAnalyze::NothingInPeriod { .. })
    ));
}

#[tokio::test]
async fn unpaid_record_is_pending_in_every_range() {
    let util = util(&["01/03/2024,DIAZ,,,,500,,No pagado,"]);
    for period in [
        march(),
        Period::range(date(1900, 1, 1), date(1900, 1, 2)).unwrap(),
        Period::range(date(2999, 12, 1), date(2999, 12, 31)).unwrap(),
    ] {
        let partition = util.partition(&period, false).await.unwrap();
        assert!(partition.paid.is_empty());
        assert_eq!(ids(&partition.pending), vec![RecordId(1)]);
    }
}

#[tokio::test]
async fn closed_record_never_reappears_as_paid() {
    let util = util(&[
        "01/03/2024,PEREZ,ACME,1000,,,,Pagado,15/03/2024",
        "02/03/2024,GOMEZ,,,,2000,,Pagado,31/03/2024",
    ]);
    util.close_period(&march()).await.unwrap();

    for period in [
        march(),
        Period::month(2024, 3).unwrap(),
        Period::range(date(2024, 1, 1), date(2024, 12, 31)).unwrap(),
    ] {
        let partition = util.partition(&period, false).await.unwrap();
        assert!(partition.paid.is_empty());
    }
    let settled = util.partition(&march(), true).await.unwrap();
    assert_eq!(ids(&settled.paid), vec![RecordId(1), RecordId(2)]);
}

#[tokio::test]
async fn grand_totals_across_engineers() {
    let util = util(&[
        "01/03/2024,PEREZ,ACME,1000,,,,Pagado,15/03/2024",
        "02/03/2024,GOMEZ,,,,2000,,Pagado,20/03/2024",
    ]);
    let result = util.preview(&march()).await.unwrap().into_analysis().unwrap();
    assert_eq!(result.total_general(), 3000.0);
    assert_eq!(result.total_consejo(), 900.0);
    assert_eq!(result.total_ingenieros(), 2100.0);
}

#[tokio::test]
async fn partition_sets_are_disjoint() {
    let util = util(&[
        "01/03/2024,A,,100,,,,Pagado,01/03/2024",
        "01/03/2024,B,,,200,,,No pagado,01/03/2024",
        "01/03/2024,C,,,,300,,Pagado,",
        "01/03/2024,D,,,,,400,Pagado,no es fecha",
        "01/03/2024,E,,$ 1.500,,,,Pagado,31/03/2024",
    ]);
    let partition = util.partition(&march(), false).await.unwrap();
    let paid: HashSet<RecordId> = ids(&partition.paid).into_iter().collect();
    let pending: HashSet<RecordId> = ids(&partition.pending).into_iter().collect();
    assert!(paid.is_disjoint(&pending));
    assert_eq!(paid, HashSet::from([RecordId(1), RecordId(5)]));
    assert_eq!(pending, HashSet::from([RecordId(2)]));
    let dropped: Vec<RecordId> = partition.dropped.iter().map(|d| d.id).collect();
    assert_eq!(dropped, vec![RecordId(3), RecordId(4)]);
}

#[tokio::test]
async fn split_is_exact_to_the_cent() {
    let util = util(&[
        "01/03/2024,A,,333.33,,,,Pagado,01/03/2024",
        "01/03/2024,B,,,,0.07,,Pagado,02/03/2024",
    ]);
    let result = util.preview(&march()).await.unwrap().into_analysis().unwrap();
    for total in result.engineer_totals.values() {
        assert!((total.consejo_share + total.engineer_share - total.gross).abs() < 0.01);
    }
}

#[tokio::test]
async fn categories_are_covered_once() {
    let util = util(&["01/03/2024,A,,100,,,,Pagado,01/03/2024"]);
    let result = util.preview(&march()).await.unwrap().into_analysis().unwrap();
    let mut owned: Vec<VisaCategory> = result
        .engineer_totals
        .values()
        .flat_map(|t| t.categories.clone())
        .collect();
    owned.sort();
    assert_eq!(owned, VisaCategory::ALL.to_vec());
}

#[tokio::test]
async fn closing_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("obras.csv");
    tokio::fs::write(
        &path,
        sheet(&[
            "01/03/2024,PEREZ,ACME,1000,,,,Pagado,15/03/2024",
            "02/03/2024,DIAZ,,,,500,,No pagado,",
        ]),
    )
    .await
    .unwrap();
    let util = TasasVisadoUtil::from_file(&path, TasasConfig::default())
        .await
        .unwrap();

    let first = util.close_period(&march()).await.unwrap().into_analysis().unwrap();
    assert_eq!(first.close_report.unwrap().count_marked(), 1);
    let after_once = tokio::fs::read_to_string(&path).await.unwrap();

    // The second close sees nothing paid left, only the pending record.
    let second = util.close_period(&march()).await.unwrap().into_analysis().unwrap();
    assert_eq!(second.close_report.unwrap().count_marked(), 0);
    assert_eq!(tokio::fs::read_to_string(&path).await.unwrap(), after_once);

    let record = util.store().get_record(RecordId(1)).await.unwrap().unwrap();
    assert_eq!(
        record.settled_marker.as_deref(),
        Some("01/03/2024 - 31/03/2024")
    );
    assert!(util.partition(&march(), false).await.unwrap().paid.is_empty());
}

#[test]
fn periods_are_only_built_valid() {
    assert!(Period::range(date(2024, 3, 31), date(2024, 3, 1)).is_err());
    assert!(Period::month(2024, 13).is_err());
    let p = Period::range(date(2024, 3, 1), date(2024, 3, 1)).unwrap();
    assert!(p.start() <= p.end());
    assert_eq!(p.label(), "01/03/2024 - 01/03/2024");
}

#[tokio::test]
async fn overlapping_closes_count_a_record_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("obras.csv");
    tokio::fs::write(
        &path,
        sheet(&["01/03/2024,PEREZ,ACME,1000,,,,Pagado,15/03/2024"]),
    )
    .await
    .unwrap();
    let util = TasasVisadoUtil::from_file(&path, TasasConfig::default())
        .await
        .unwrap();

    let month = Period::month(2024, 3).unwrap();
    let quarter = Period::range(date(2024, 1, 1), date(2024, 3, 31)).unwrap();
    let (a, b) = tokio::join!(util.close_period(&month), util.close_period(&quarter));
    let outcomes = [a.unwrap(), b.unwrap()];

    let paid_counts: usize = outcomes
        .iter()
        .filter_map(AnalysisOutcome::analysis)
        .map(|r| r.paid_count())
        .sum();
    let paid_out: f64 = outcomes
        .iter()
        .filter_map(AnalysisOutcome::analysis)
        .map(|r| r.total_general())
        .sum();
    assert_eq!(paid_counts, 1);
    assert_eq!(paid_out, 1000.0);

    let marker = util
        .store()
        .get_record(RecordId(1))
        .await
        .unwrap()
        .unwrap()
        .settled_marker
        .unwrap();
    let winner = outcomes
        .iter()
        .filter_map(AnalysisOutcome::analysis)
        .find(|r| r.paid_count() == 1)
        .unwrap();
    assert_eq!(marker, winner.period.label());
}

#[tokio::test]
async fn empty_store_has_nothing_to_analyze() {
    let util = util(&["01/03/2024,SIN TASAS,,,,,,Pagado,15/03/2024"]);
    let outcome = util.preview(&march()).await.unwrap();
    match outcome {
        AnalysisOutcome::NothingToAnalyze(reason) => {
            assert_eq!(reason, NothingToAnalyze::NoFeeBearingRecords);
            assert!(!reason.message().is_empty());
        }
        AnalysisOutcome::Analysis(_) => panic!("expected nothing to analyze"),
    }
}

#[tokio::test]
async fn failed_writes_are_reported_per_record() {
    let store = FlakyStore::new(
        SheetWorkRecordStore::from_string(&sheet(&[
            "01/03/2024,A,,100,,,,Pagado,01/03/2024",
            "01/03/2024,B,,200,,,,Pagado,02/03/2024",
            "01/03/2024,C,,300,,,,Pagado,03/03/2024",
        ]))
        .unwrap(),
        RecordId(2),
    );
    let util = TasasVisadoUtil::with_store(store, TasasConfig::default());
    let report = util
        .close_period(&march())
        .await
        .unwrap()
        .into_analysis()
        .unwrap()
        .close_report
        .unwrap();
    assert_eq!(report.marked, vec![RecordId(1), RecordId(3)]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, RecordId(2));
    assert!(!report.is_complete());

    // The failed record is still available for the next close.
    let retry = util.partition(&march(), false).await.unwrap();
    assert_eq!(ids(&retry.paid), vec![RecordId(2)]);
    assert_eq!(util.store().attempts(), 3);
}

#[tokio::test]
async fn custom_routing_and_split() {
    let config = config_from_string(
        r#"(
            engineers: [
                (name: "UNICO", categories: [gas, salubridad, electrica, electromecanica]),
            ],
            split: Some((consejo_pct: 0.25, engineer_pct: 0.75)),
        )"#,
    )
    .unwrap();
    assert_eq!(config.split, SplitRule::new(0.25, 0.75).unwrap());
    let util = TasasVisadoUtil::from_string(
        &sheet(&[
            "01/03/2024,A,,100,,,,Pagado,01/03/2024",
            "01/03/2024,B,,,,300,,Pagado,02/03/2024",
        ]),
        config,
    )
    .unwrap();
    let result = util.preview(&march()).await.unwrap().into_analysis().unwrap();
    let unico = &result.engineer_totals["UNICO"];
    assert_eq!(unico.gross, 400.0);
    assert_eq!(unico.consejo_share, 100.0);
    assert_eq!(unico.engineer_share, 300.0);
}

#[tokio::test]
async fn exported_report_is_written() {
    let util = util(&[
        "01/03/2024,PEREZ,ACME,1000,,,,Pagado,15/03/2024",
        "02/03/2024,DIAZ,,,,500,,No pagado,",
    ]);
    let period = Period::month(2024, 3).unwrap();
    let result = util.preview(&period).await.unwrap().into_analysis().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let destination = dir
        .path()
        .join(format!("{}.csv", period.suggested_export_name()));
    let written = util.export_report(&result, &destination).await.unwrap();
    assert_eq!(written, destination);
    let csv = tokio::fs::read_to_string(&written).await.unwrap();
    assert!(csv.contains("PEREZ"));
    assert!(csv.contains("DIAZ"));
}

// --

/// Delegates to a sheet store but refuses writes to one record.
struct FlakyStore {
    inner: SheetWorkRecordStore,
    refused: RecordId,
    attempts: Mutex<usize>,
}

impl FlakyStore {
    fn new(inner: SheetWorkRecordStore, refused: RecordId) -> Self {
        Self {
            inner,
            refused,
            attempts: Mutex::new(0),
        }
    }

    fn attempts(&self) -> usize {
        *self.attempts.lock().unwrap()
    }
}

#[async_trait]
impl WorkRecordStore for FlakyStore {
    async fn list_all_fee_bearing_records(&self) -> Result<Vec<WorkRecord>, ServerError> {
        self.inner.list_all_fee_bearing_records().await
    }

    async fn get_record(&self, id: RecordId) -> Result<Option<WorkRecord>, ServerError> {
        self.inner.get_record(id).await
    }

    async fn update_fields(
        &self,
        id: RecordId,
        fields: &HashMap<String, String>,
    ) -> Result<(), ServerError> {
        *self.attempts.lock().unwrap() += 1;
        assert!(fields.contains_key(FIELD_SETTLED_MARKER));
        if id == self.refused {
            return Err(RecordNotFound::new(id.0));
        }
        self.inner.update_fields(id, fields).await
    }
}
