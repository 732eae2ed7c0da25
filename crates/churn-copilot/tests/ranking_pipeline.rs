use chrono::NaiveDate;
use churn_copilot::guardrails::{
    add_disclaimers, check_and_optionally_repair_message, check_message,
};
use churn_copilot::insights::compute_ranked_risk;
use churn_copilot::scoring::{
    churn_risk_score, final_risk, route_action, severity_score, OutreachAction, RiskInputs,
};
use churn_copilot::signals::SignalDataset;

const REGIONS: [&str; 7] = [
    "metro_north",
    "metro_south",
    "urban_east",
    "urban_west",
    "suburb_east",
    "rural_north",
    "rural_south",
];

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 30).expect("valid date")
}

fn customer_ids() -> impl Iterator<Item = String> {
    (1..=500).map(|n| format!("C{n:06}"))
}

#[test]
fn generator_export_flows_through_to_ranked_actions() {
    let csv = "date,customer_id,region,contract_days_remaining,price_sensitivity_flag,peer_port_count_30d,weekly_ad_intensity_index\n\
2025-01-06,C000001,metro_north,90,False,0,1.0\n\
2025-01-13,C000001,metro_north,30,True,2,6.0\n\
2025-01-13,C000002,metro_north,200,False,0,0.5\n";
    let dataset = SignalDataset::from_reader(csv.as_bytes(), today()).expect("dataset parses");

    let ranked = compute_ranked_risk(dataset.latest_week_rows(None), None, 20, true);

    assert_eq!(ranked.len(), 2);
    let top = &ranked[0];
    assert_eq!(top.customer_id, "C000001");
    assert_eq!(top.competitive_pressure_index, 64);
    assert_eq!(top.severity, 40);
    assert_eq!(top.churn_risk_score, 0.14);
    assert!((top.final_score - 46.8).abs() < 1e-9);
    assert_eq!(top.action, OutreachAction::PlanReview);
    assert!(top.compliance.pass);
    assert!(ranked[0].final_score >= ranked[1].final_score);
}

#[test]
fn pressure_eighty_two_customer_gets_data_boost() {
    let csv = "date,customer_id,region,cpi\n2025-01-13,C000001,metro_north,82\n";
    let dataset = SignalDataset::from_reader(csv.as_bytes(), today()).expect("dataset parses");

    let ranked = compute_ranked_risk(dataset.latest_week_rows(None), None, 20, true);

    let row = &ranked[0];
    assert_eq!(row.severity, 40);
    assert_eq!(row.churn_risk_score, 0.14);
    assert!((row.final_score - 55.8).abs() < 1e-9);
    assert_eq!(row.action, OutreachAction::DataBoost);
    assert_eq!(row.estimated_action_cost_usd, 3);
    assert!(row.compliance.pass);
    assert!(row.compliance.violations.is_empty());
}

#[test]
fn generated_scores_are_deterministic_and_bounded() {
    for id in customer_ids() {
        let churn = churn_risk_score(&id);
        assert_eq!(churn, churn_risk_score(&id));
        assert!((0.0..=0.95).contains(&churn), "{id}: churn {churn}");

        for region in REGIONS {
            let severity = severity_score(&id, region);
            assert_eq!(severity, severity_score(&id, region));
            assert!(severity <= 100);

            for pressure in [0u8, 50, 100] {
                let score = final_risk(pressure, severity, churn);
                assert!((0.0..=100.0).contains(&score), "{id}/{region}: {score}");
                assert!(RiskInputs::new(pressure, severity, churn).is_ok());
            }
        }
    }
}

#[test]
fn router_priority_follows_playbook_order() {
    assert_eq!(route_action(85, 50, 0.1).action, OutreachAction::DataBoost);
    assert_eq!(
        route_action(50, 75, 0.1).action,
        OutreachAction::PriorityCallback
    );
    assert_eq!(route_action(50, 85, 0.1).action, OutreachAction::TechVisit);
    assert_eq!(route_action(40, 30, 0.3).action, OutreachAction::PlanReview);
    // competitive rule wins over the churn-risk service rule
    assert_eq!(route_action(90, 10, 0.9).action, OutreachAction::DataBoost);
}

#[test]
fn guardrail_repair_is_idempotent() {
    let samples = [
        "",
        "Hello",
        "Hello!",
        "We can help.   ",
        "Credits are a one-time credit, subject to account review.",
        "We will always beat their price",
    ];
    for text in samples {
        let once = add_disclaimers(text);
        assert_eq!(add_disclaimers(&once), once, "sample {text:?}");
    }
}

#[test]
fn banned_claims_fail_regardless_of_disclaimers() {
    let repaired = add_disclaimers("We will always keep your rate low");
    let result = check_message(&repaired);
    assert!(!result.pass);
    assert!(result.violations.contains(&"absolute_promise".to_string()));
    assert!(result.missing_disclaimers.is_empty());

    let (_, result) = check_and_optionally_repair_message("Guaranteed 100% speed", true);
    assert_eq!(
        result.violations,
        vec!["guarantee".to_string(), "speed_claim".to_string()]
    );
}

#[test]
fn ranking_is_non_increasing_over_a_full_week() {
    let mut csv = String::from("date,customer_id,region,cpi\n");
    for (index, id) in customer_ids().enumerate() {
        let region = REGIONS[index % REGIONS.len()];
        csv.push_str(&format!("2025-01-13,{id},{region},{}\n", (index * 37) % 101));
    }
    let dataset = SignalDataset::from_reader(csv.as_bytes(), today()).expect("dataset parses");

    let ranked = compute_ranked_risk(dataset.latest_week_rows(None), None, 50, true);

    assert_eq!(ranked.len(), 50);
    assert!(ranked
        .windows(2)
        .all(|pair| pair[0].final_score >= pair[1].final_score));
    assert!(ranked
        .iter()
        .all(|row| row.compliance.violations.is_empty()));
}
