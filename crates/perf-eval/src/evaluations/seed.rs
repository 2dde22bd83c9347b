//! Reference data loaded into a fresh store.

use chrono::NaiveDate;

use super::domain::{Criterion, CriterionId, Employee, EmployeeId, EmployeeRole};
use super::scoring::RUBRIC_MAX_SCORE;

const CRITERIA: [&str; 10] = [
    "Quality of Work",
    "Productivity",
    "Communication",
    "Teamwork",
    "Problem Solving",
    "Initiative",
    "Reliability",
    "Adaptability",
    "Technical Skills",
    "Leadership",
];

/// KPI titles offered when assigning a plan.
pub const KPI_CATALOG: [&str; 10] = [
    "Production Achievement",
    "Machine Availability",
    "Scrap Rate",
    "Line Balance Efficiency",
    "Planned Maintenance Completion",
    "Emergency Breakdown Ratio",
    "Safety Compliance",
    "Housekeeping (5S) Score",
    "Utility Availability",
    "Environmental Compliance",
];

/// Daily production KPI sheet used by the demo and in tests.
pub const SAMPLE_KPI_SHEET: &str = "\
Title,Type,Target,Achieved,Metric
Production Achievement,Daily,95,91.03,%
Machine Availability,Daily,90,96.9,%
Scrap Rate,Daily,2,2.46,%
Line Balance Efficiency,Daily,85,62.14,%
Safety Compliance,Daily,100,99,%
";

/// The ten-line rubric, every criterion out of 5 with weight 1.
pub fn criteria() -> Vec<Criterion> {
    CRITERIA
        .iter()
        .zip(1..)
        .map(|(name, id)| Criterion {
            id: CriterionId(id),
            name: (*name).to_string(),
            max_score: RUBRIC_MAX_SCORE,
            weight: 1,
        })
        .collect()
}

/// Demo roster.
pub fn roster() -> Vec<Employee> {
    let rows: [(&str, &str, &str, (i32, u32, u32), EmployeeRole, &str); 5] = [
        ("Alice Smith", "Engineering", "Bob Jones", (2023, 1, 15), EmployeeRole::Employee, "alice"),
        ("Bob Jones", "Engineering", "Charlie Brown", (2022, 5, 20), EmployeeRole::Manager, "bob"),
        ("Charlie Brown", "HR", "David White", (2021, 11, 1), EmployeeRole::Manager, "charlie"),
        ("David White", "Marketing", "Eve Black", (2020, 3, 10), EmployeeRole::Employee, "david"),
        ("Eve Black", "Sales", "Frank Green", (2019, 7, 25), EmployeeRole::Employee, "eve"),
    ];

    rows.into_iter()
        .zip(1..)
        .filter_map(|((name, department, manager, (y, m, d), role, handle), id)| {
            Some(Employee {
                id: EmployeeId(id),
                name: name.to_string(),
                department: department.to_string(),
                manager: manager.to_string(),
                join_date: NaiveDate::from_ymd_opt(y, m, d)?,
                role,
                avatar_url: Some(format!("https://i.pravatar.cc/150?u={handle}")),
            })
        })
        .collect()
}
