use std::io::Write;
use std::path::Path;

use super::ranking::RiskAssessment;

pub const EXPORT_HEADER: [&str; 11] = [
    "customer_id",
    "region",
    "cpi",
    "severity",
    "crs",
    "final_score",
    "action",
    "reason",
    "proposed_text",
    "pass",
    "estimated_action_cost_usd",
];

/// Write a ranked list as CSV, one row per assessment in the given order.
pub fn write_ranked_csv<W: Write>(
    writer: W,
    assessments: &[RiskAssessment],
) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(EXPORT_HEADER)?;

    for row in assessments {
        writer.write_record([
            row.customer_id.clone(),
            row.region.clone(),
            row.competitive_pressure_index.to_string(),
            row.severity.to_string(),
            row.churn_risk_score.to_string(),
            row.final_score.to_string(),
            row.action.label().to_string(),
            row.reason.clone(),
            row.proposed_text.clone(),
            row.compliance.pass.to_string(),
            row.estimated_action_cost_usd.to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

pub fn export_ranked_csv<P: AsRef<Path>>(
    path: P,
    assessments: &[RiskAssessment],
) -> Result<(), csv::Error> {
    let file = std::fs::File::create(path)?;
    write_ranked_csv(file, assessments)
}
