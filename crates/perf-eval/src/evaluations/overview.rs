use std::collections::{HashMap, HashSet};

use chrono::{Months, NaiveDate};
use serde::Serialize;

use super::domain::{Employee, EmployeeId, Evaluation, WorkPlan};
use super::scoring::ScoringEngine;

/// Company-wide dashboard figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyOverview {
    pub total_employees: usize,
    pub total_evaluations: usize,
    /// Mean capped efficiency across every plan in the company.
    pub average_performance: f64,
    /// Employees past their first year who have never been evaluated.
    pub needs_evaluation: usize,
    pub department_averages: Vec<DepartmentAverage>,
    pub score_distribution: Vec<ScoreBucket>,
    pub leaderboard: Vec<LeaderboardEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepartmentAverage {
    pub department: String,
    pub average: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Excellent,
    Good,
    Average,
    Poor,
}

impl ScoreBand {
    pub const ALL: [ScoreBand; 4] = [
        ScoreBand::Excellent,
        ScoreBand::Good,
        ScoreBand::Average,
        ScoreBand::Poor,
    ];

    pub fn classify(total_score: f64) -> Self {
        if total_score >= 90.0 {
            ScoreBand::Excellent
        } else if total_score >= 70.0 {
            ScoreBand::Good
        } else if total_score >= 50.0 {
            ScoreBand::Average
        } else {
            ScoreBand::Poor
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            ScoreBand::Excellent => "Excellent (90-100)",
            ScoreBand::Good => "Good (70-89)",
            ScoreBand::Average => "Average (50-69)",
            ScoreBand::Poor => "Poor (<50)",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreBucket {
    pub band: ScoreBand,
    pub label: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParticipationStatus {
    Active,
    #[serde(rename = "No Plans")]
    NoPlans,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardEntry {
    pub employee_id: EmployeeId,
    pub name: String,
    pub department: String,
    pub avatar_url: Option<String>,
    pub score: i64,
    pub status: ParticipationStatus,
}

impl CompanyOverview {
    pub fn compute(
        engine: &ScoringEngine,
        employees: &[Employee],
        evaluations: &[Evaluation],
        plans: &[WorkPlan],
        today: NaiveDate,
    ) -> Self {
        Self {
            total_employees: employees.len(),
            total_evaluations: evaluations.len(),
            average_performance: engine.aggregate_score(plans),
            needs_evaluation: needs_evaluation(employees, evaluations, today),
            department_averages: department_averages(employees, evaluations),
            score_distribution: score_distribution(evaluations),
            leaderboard: leaderboard(engine, employees, plans),
        }
    }
}

fn needs_evaluation(employees: &[Employee], evaluations: &[Evaluation], today: NaiveDate) -> usize {
    let Some(one_year_ago) = today.checked_sub_months(Months::new(12)) else {
        return 0;
    };
    let evaluated: HashSet<EmployeeId> = evaluations.iter().map(|e| e.employee_id).collect();

    employees
        .iter()
        .filter(|employee| employee.join_date < one_year_ago && !evaluated.contains(&employee.id))
        .count()
}

fn department_averages(employees: &[Employee], evaluations: &[Evaluation]) -> Vec<DepartmentAverage> {
    let department_of: HashMap<EmployeeId, &str> = employees
        .iter()
        .map(|employee| (employee.id, employee.department.as_str()))
        .collect();

    let mut departments: Vec<&str> = Vec::new();
    for employee in employees {
        if !departments.contains(&employee.department.as_str()) {
            departments.push(employee.department.as_str());
        }
    }

    let mut averages: Vec<DepartmentAverage> = departments
        .into_iter()
        .map(|department| {
            let scores: Vec<f64> = evaluations
                .iter()
                .filter(|evaluation| department_of.get(&evaluation.employee_id) == Some(&department))
                .map(|evaluation| evaluation.total_score)
                .collect();
            let average = if scores.is_empty() {
                0
            } else {
                (scores.iter().sum::<f64>() / scores.len() as f64).round() as i64
            };
            DepartmentAverage {
                department: department.to_string(),
                average,
            }
        })
        .collect();

    averages.sort_by(|a, b| b.average.cmp(&a.average));
    averages
}

fn score_distribution(evaluations: &[Evaluation]) -> Vec<ScoreBucket> {
    ScoreBand::ALL
        .into_iter()
        .map(|band| ScoreBucket {
            band,
            label: band.label(),
            count: evaluations
                .iter()
                .filter(|evaluation| ScoreBand::classify(evaluation.total_score) == band)
                .count(),
        })
        .filter(|bucket| bucket.count > 0)
        .collect()
}

fn leaderboard(
    engine: &ScoringEngine,
    employees: &[Employee],
    plans: &[WorkPlan],
) -> Vec<LeaderboardEntry> {
    let mut entries: Vec<LeaderboardEntry> = employees
        .iter()
        .map(|employee| {
            let own: Vec<&WorkPlan> = plans
                .iter()
                .filter(|plan| plan.employee_id == employee.id)
                .collect();
            let status = if own.is_empty() {
                ParticipationStatus::NoPlans
            } else {
                ParticipationStatus::Active
            };

            LeaderboardEntry {
                employee_id: employee.id,
                name: employee.name.clone(),
                department: employee.department.clone(),
                avatar_url: employee.avatar_url.clone(),
                score: engine.aggregate_score(&own).round() as i64,
                status,
            }
        })
        .collect();

    entries.sort_by(|a, b| b.score.cmp(&a.score));
    entries
}
