use chrono::{NaiveDate, TimeZone, Utc};
use churn_copilot::action_log::{
    append_accepted_action, AcceptedAction, ActionLog, CsvActionLog, LOG_HEADER,
};
use churn_copilot::insights::compute_ranked_risk;
use churn_copilot::signals::SignalDataset;

fn ranked_actions() -> Vec<AcceptedAction> {
    let csv = "date,customer_id,region,cpi\n\
2025-01-13,C000001,metro_north,82\n\
2025-01-13,C000002,metro_north,40\n";
    let today = NaiveDate::from_ymd_opt(2025, 6, 30).expect("valid date");
    let dataset = SignalDataset::from_reader(csv.as_bytes(), today).expect("dataset parses");

    compute_ranked_risk(dataset.latest_week_rows(None), None, 10, false)
        .iter()
        .map(AcceptedAction::from)
        .collect()
}

#[test]
fn accepted_actions_are_appended_in_order() {
    let dir = tempfile::tempdir().expect("tempdir");
    let log = CsvActionLog::new(dir.path().join("data").join("action_log.csv"));
    let timestamp = Utc
        .with_ymd_and_hms(2025, 1, 14, 8, 0, 0)
        .single()
        .expect("valid timestamp");

    for entry in ranked_actions() {
        log.append_at(&entry, timestamp).expect("append succeeds");
    }

    let mut reader = csv::Reader::from_path(log.path()).expect("log opens");
    let headers = reader.headers().expect("header row").clone();
    assert_eq!(headers.iter().collect::<Vec<_>>(), LOG_HEADER.to_vec());

    let records: Vec<csv::StringRecord> = reader
        .records()
        .collect::<Result<_, _>>()
        .expect("records parse");
    assert_eq!(records.len(), 2);

    let first = &records[0];
    assert_eq!(&first[0], "2025-01-14T08:00:00");
    assert_eq!(&first[1], "C000001");
    assert_eq!(&first[3], "55.8");
    assert_eq!(&first[4], "data_boost");
    assert_eq!(&first[6], "True");
    assert_eq!(&first[7], "");
    assert_eq!(&first[8], "");

    assert_eq!(&records[1][1], "C000002");
}

#[test]
fn reopening_the_log_keeps_prior_entries() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("action_log.csv");
    let entries = ranked_actions();

    append_accepted_action(&CsvActionLog::new(&path), &entries[0]).expect("first append");
    append_accepted_action(&CsvActionLog::new(&path), &entries[1]).expect("second append");

    let contents = std::fs::read_to_string(&path).expect("log readable");
    let lines: Vec<_> = contents.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("ts,"));
    assert!(lines[1].contains("C000001"));
    assert!(lines[2].contains("C000002"));
}

#[test]
fn trait_object_log_accepts_entries() {
    let dir = tempfile::tempdir().expect("tempdir");
    let log: Box<dyn ActionLog> = Box::new(CsvActionLog::new(dir.path().join("log.csv")));

    let entries = ranked_actions();
    append_accepted_action(log.as_ref(), &entries[0]).expect("append succeeds");
}
