//! Employee timesheet report: one row per employee and day with the first
//! start time, the last end time and the total duration worked.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

use crate::model::TimesheetLine;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DayRow {
    pub employee: String,
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub end: NaiveTime,
    /// Sum of line durations; breaks between lines are not counted.
    pub total_hours: f64,
    pub entries: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeTotal {
    pub employee: String,
    pub days: usize,
    pub total_hours: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimesheetReport {
    /// Sorted by employee, then date.
    pub rows: Vec<DayRow>,
    pub employees: Vec<EmployeeTotal>,
    pub total_hours: f64,
}

pub fn build_report(lines: &[TimesheetLine]) -> TimesheetReport {
    let mut days: BTreeMap<(String, NaiveDate), DayRow> = BTreeMap::new();

    for line in lines {
        let hours = line.duration_hours();
        days.entry((line.employee.clone(), line.date))
            .and_modify(|row| {
                row.start = row.start.min(line.start);
                row.end = row.end.max(line.end);
                row.total_hours += hours;
                row.entries += 1;
            })
            .or_insert_with(|| DayRow {
                employee: line.employee.clone(),
                date: line.date,
                start: line.start,
                end: line.end,
                total_hours: hours,
                entries: 1,
            });
    }

    let rows: Vec<DayRow> = days.into_values().collect();

    let mut employees: Vec<EmployeeTotal> = Vec::new();
    for row in &rows {
        match employees.last_mut() {
            Some(last) if last.employee == row.employee => {
                last.days += 1;
                last.total_hours += row.total_hours;
            }
            _ => employees.push(EmployeeTotal {
                employee: row.employee.clone(),
                days: 1,
                total_hours: row.total_hours,
            }),
        }
    }

    let total_hours = employees.iter().map(|e| e.total_hours).sum();
    TimesheetReport {
        rows,
        employees,
        total_hours,
    }
}
