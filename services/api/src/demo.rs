use crate::infra::InMemoryPerformanceStore;
use chrono::{Local, NaiveDate, Utc};
use clap::Args;
use perf_eval::config::AppConfig;
use perf_eval::error::AppError;
use perf_eval::evaluations::{
    seed, KpiScore, KpiSheetEntry, KpiSheetImporter, PerformanceService, PlanProgressUpdate,
    ScoringEngine,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Employee whose KPI sheet is assigned and evaluated
    #[arg(long, default_value = "Alice Smith")]
    pub(crate) employee: String,
    /// KPI sheet CSV (Title,Type,Target,Achieved,Metric). Defaults to a built-in daily sheet.
    #[arg(long)]
    pub(crate) kpi_csv: Option<PathBuf>,
    /// Plan date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub(crate) struct PlanReportArgs {
    /// KPI sheet CSV (Title,Type,Target,Achieved,Metric)
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Print the report as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_plan_report(args: PlanReportArgs) -> Result<(), AppError> {
    let PlanReportArgs { csv, json } = args;

    let config = AppConfig::load()?;
    let engine = ScoringEngine::new(config.scoring);
    let entries = KpiSheetImporter::from_path(&csv)?;

    let live_score = engine.aggregate_score(&entries);
    let projection = engine.auto_rubric(live_score, &seed::criteria());

    if json {
        let rows: Vec<serde_json::Value> = entries
            .iter()
            .map(|entry| {
                serde_json::json!({
                    "title": entry.title,
                    "target_value": entry.target_value,
                    "achieved_value": entry.achieved_value,
                    "metric": entry.metric,
                    "score": engine.score_kpi(entry),
                })
            })
            .collect();
        let report = serde_json::json!({
            "source": csv.display().to_string(),
            "plans": rows,
            "live_score": live_score,
            "projected_total_score": projection.total_score,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("KPI sheet report ({})", csv.display());
    render_kpi_rows(&engine, &entries);
    println!(
        "\nLive score {:.1}% | projected auto-evaluation {:.1}%",
        live_score, projection.total_score
    );

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        employee,
        kpi_csv,
        today,
    } = args;

    let config = AppConfig::load()?;
    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let store = Arc::new(InMemoryPerformanceStore::with_reference_data(true));
    let service = PerformanceService::new(store, config.scoring);

    println!("Performance evaluation demo");
    let employee = service.login(&employee)?;
    println!(
        "Signed in as {} ({}, {} department)",
        employee.name,
        employee.role.label(),
        employee.department
    );

    let entries = match kpi_csv {
        Some(path) => KpiSheetImporter::from_path(path)?,
        None => KpiSheetImporter::from_reader(seed::SAMPLE_KPI_SHEET.as_bytes())?,
    };

    for entry in &entries {
        let plan = service.assign_plan(entry.to_new_plan(employee.id, today, today))?;
        service.update_progress(
            plan.id,
            PlanProgressUpdate {
                achieved_value: entry.achieved_value,
                status: None,
            },
        )?;
    }

    println!("\n{} KPI plan(s) for {}", entries.len(), today);
    render_kpi_rows(service.engine(), &entries);

    let result = service.auto_evaluate(Some(employee.id), Utc::now())?;
    println!(
        "\nAuto evaluation #{}: plan completion {:.1}% -> rubric total {:.1}%",
        result.id, result.avg_plan_completion, result.total_score
    );

    let overview = service.overview(today)?;
    println!("\nCompany overview");
    println!("{}", serde_json::to_string_pretty(&overview)?);

    Ok(())
}

fn render_kpi_rows(engine: &ScoringEngine, entries: &[KpiSheetEntry]) {
    for entry in entries {
        let score = engine.score_kpi(entry);
        println!(
            "- {}: {} / {}{} -> {} [{}]",
            entry.title,
            entry.achieved_value,
            entry.target_value,
            entry.metric,
            format_efficiency(&score),
            score.status.label()
        );
    }
}

fn format_efficiency(score: &KpiScore) -> String {
    match (score.efficiency, score.scoring_efficiency) {
        (Some(raw), Some(counted)) if raw > counted => {
            format!("{raw:.1}% (counted as {counted:.1}%)")
        }
        (Some(raw), _) => format!("{raw:.1}%"),
        (None, _) => "n/a".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use perf_eval::evaluations::KpiStatus;

    #[test]
    fn efficiency_shows_cap_when_it_applies() {
        let engine = ScoringEngine::default();
        let entries =
            KpiSheetImporter::from_reader(seed::SAMPLE_KPI_SHEET.as_bytes()).expect("sheet parses");

        let scrap_rate = engine.score_kpi(&entries[2]);
        assert_eq!(format_efficiency(&scrap_rate), "123.0% (counted as 120.0%)");

        let safety = engine.score_kpi(&entries[4]);
        assert_eq!(format_efficiency(&safety), "99.0%");
        assert_eq!(safety.status, KpiStatus::Alert);
    }

    #[test]
    fn undefined_efficiency_prints_placeholder() {
        let score = KpiScore {
            efficiency: None,
            scoring_efficiency: None,
            status: KpiStatus::Alert,
        };
        assert_eq!(format_efficiency(&score), "n/a");
    }
}
