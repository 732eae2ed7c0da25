use chrono::{Local, NaiveDate};
use churn_copilot::config::AppConfig;
use churn_copilot::error::AppError;
use churn_copilot::guardrails::check_and_optionally_repair_message;
use churn_copilot::insights::{compute_ranked_risk, export_ranked_csv, RiskAssessment};
use churn_copilot::signals::SignalDataset;
use churn_copilot::telemetry;
use clap::Args;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Args, Debug, Default, Clone)]
pub(crate) struct RankingArgs {
    /// Weekly signal CSV (defaults to APP_SIGNALS_PATH)
    #[arg(long)]
    pub(crate) signals: Option<PathBuf>,
    /// Number of customers to keep (defaults to APP_DEFAULT_LIMIT)
    #[arg(long)]
    pub(crate) limit: Option<usize>,
    /// Only rank customers in this region
    #[arg(long)]
    pub(crate) region: Option<String>,
    /// Rank a specific week (YYYY-MM-DD) instead of the latest one
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) week: Option<NaiveDate>,
    /// Report missing disclaimers instead of appending them
    #[arg(long)]
    pub(crate) no_auto_fix: bool,
}

#[derive(Args, Debug)]
pub(crate) struct TopRiskArgs {
    #[command(flatten)]
    pub(crate) ranking: RankingArgs,
    /// Print JSON instead of a table
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ExportArgs {
    #[command(flatten)]
    pub(crate) ranking: RankingArgs,
    /// Destination CSV file
    #[arg(long, short)]
    pub(crate) output: PathBuf,
}

#[derive(Args, Debug)]
pub(crate) struct CheckTextArgs {
    /// Outreach copy to check
    pub(crate) text: String,
    /// Report missing disclaimers instead of appending them
    #[arg(long)]
    pub(crate) no_auto_fix: bool,
}

pub(crate) fn run_top_risk(args: TopRiskArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    let ranked = rank_from_args(&args.ranking, &config)?;

    if args.json {
        let rendered = serde_json::to_string_pretty(&ranked).map_err(std::io::Error::from)?;
        println!("{rendered}");
    } else {
        print!("{}", format_ranked_table(&ranked));
    }
    Ok(())
}

pub(crate) fn run_export(args: ExportArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    let ranked = rank_from_args(&args.ranking, &config)?;
    export_ranked_csv(&args.output, &ranked)?;

    info!(path = %args.output.display(), rows = ranked.len(), "ranked list exported");
    println!("Exported {} rows to {}", ranked.len(), args.output.display());
    Ok(())
}

pub(crate) fn run_check_text(args: CheckTextArgs) -> Result<(), AppError> {
    let (text, result) = check_and_optionally_repair_message(&args.text, !args.no_auto_fix);

    println!("{text}");
    println!("pass: {}", result.pass);
    if !result.violations.is_empty() {
        println!("violations: {}", result.violations.join(", "));
    }
    if !result.missing_disclaimers.is_empty() {
        println!("missing disclaimers: {}", result.missing_disclaimers.join(", "));
    }
    Ok(())
}

fn rank_from_args(
    args: &RankingArgs,
    config: &AppConfig,
) -> Result<Vec<RiskAssessment>, AppError> {
    let path = args
        .signals
        .as_deref()
        .unwrap_or(config.data.signals_path.as_path());
    rank_signals(
        path,
        args.week,
        args.region.as_deref(),
        args.limit.unwrap_or(config.ranking.default_limit),
        !args.no_auto_fix,
    )
}

pub(crate) fn rank_signals(
    path: &Path,
    week: Option<NaiveDate>,
    region: Option<&str>,
    limit: usize,
    auto_fix: bool,
) -> Result<Vec<RiskAssessment>, AppError> {
    let dataset = SignalDataset::from_path(path, Local::now().date_naive())?;
    let rows = match week {
        Some(week) => dataset.week_rows(week, region),
        None => dataset.latest_week_rows(region),
    };
    Ok(compute_ranked_risk(rows, None, limit, auto_fix))
}

pub(crate) fn format_ranked_table(ranked: &[RiskAssessment]) -> String {
    let mut output = String::new();
    if ranked.is_empty() {
        output.push_str("No customers matched.\n");
        return output;
    }

    let _ = writeln!(
        output,
        "{:<10} {:<12} {:>4} {:>4} {:>5} {:>7}  {:<18} {:>5}  {}",
        "customer", "region", "cpi", "sev", "crs", "score", "action", "cost", "compliance"
    );
    for row in ranked {
        let compliance = if row.compliance.pass {
            "ok".to_string()
        } else {
            let mut issues = row.compliance.violations.clone();
            issues.extend(
                row.compliance
                    .missing_disclaimers
                    .iter()
                    .map(|snippet| format!("missing: {snippet}")),
            );
            issues.join("; ")
        };
        let _ = writeln!(
            output,
            "{:<10} {:<12} {:>4} {:>4} {:>5.2} {:>7.2}  {:<18} {:>5}  {}",
            row.customer_id,
            row.region,
            row.competitive_pressure_index,
            row.severity,
            row.churn_risk_score,
            row.final_score,
            row.action.label(),
            format!("${}", row.estimated_action_cost_usd),
            compliance
        );
    }
    output
}
