use chrono::NaiveDate;
use churn_copilot::signals::{SignalDataset, SignalLoadError, SignalStore};
use std::io::Write;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 30).expect("valid date")
}

#[test]
fn store_loads_dataset_from_disk_once() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(
        file,
        "Date,Customer_ID,Region,CPI\n\
2025-01-06,C000001,metro_north,40\n\
2025-01-13 00:00:00,C000001,metro_north,82\n\
2025-01-13,C000002,rural_south,55"
    )
    .expect("write fixture");

    let store = SignalStore::new(file.path());
    let first = store.snapshot().expect("dataset loads");
    let second = store.snapshot().expect("dataset cached");

    assert!(std::sync::Arc::ptr_eq(&first, &second));
    assert_eq!(first.len(), 3);
    assert_eq!(first.latest_week(), NaiveDate::from_ymd_opt(2025, 1, 13));
    assert_eq!(first.latest_week_rows(None).len(), 2);
}

#[test]
fn out_of_range_pressure_rejects_the_file() {
    let csv = "customer_id,region,date,cpi\nC000001,metro_north,2025-01-13,101\n";
    match SignalDataset::from_reader(csv.as_bytes(), today()) {
        Err(SignalLoadError::InvalidRange { line, column, .. }) => {
            assert_eq!(line, 2);
            assert_eq!(column, "cpi");
        }
        other => panic!("expected invalid range, got {other:?}"),
    }
}

#[test]
fn negative_ad_intensity_is_rejected() {
    let csv = "customer_id,weekly_ad_intensity_index\nC000001,-0.5\n";
    assert!(matches!(
        SignalDataset::from_reader(csv.as_bytes(), today()),
        Err(SignalLoadError::InvalidRange {
            column: "weekly_ad_intensity_index",
            ..
        })
    ));
}

#[test]
fn header_only_file_is_an_empty_dataset() {
    let dataset = SignalDataset::from_reader("customer_id,region,date,cpi\n".as_bytes(), today())
        .expect("header-only parses");
    assert!(dataset.is_empty());
    assert!(dataset.latest_week_rows(None).is_empty());
}
