use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// TimesheetLine — time one employee spent on a given day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimesheetLine {
    pub id: String,

    pub employee: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,

    pub date: NaiveDate,

    pub start: NaiveTime,

    /// Strictly after `start`; lines do not cross midnight.
    pub end: NaiveTime,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_at: Option<String>,
}

impl TimesheetLine {
    /// Worked time in hours.
    pub fn duration_hours(&self) -> f64 {
        (self.end - self.start).num_seconds() as f64 / 3600.0
    }
}

/// Body of a create call.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTimesheetLine {
    pub employee: String,
    #[serde(default)]
    pub project: Option<String>,
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub end: NaiveTime,
    #[serde(default)]
    pub description: Option<String>,
}

/// Filter of the report and of line listings. All bounds are inclusive.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportQuery {
    #[serde(default)]
    pub employee: Option<String>,
    #[serde(default)]
    pub date_from: Option<NaiveDate>,
    #[serde(default)]
    pub date_to: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_in_hours() {
        let line = TimesheetLine {
            id: "t1".into(),
            employee: "alice".into(),
            project: None,
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            start: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end: NaiveTime::from_hms_opt(12, 30, 0).unwrap(),
            description: None,
            create_at: None,
        };
        assert_eq!(line.duration_hours(), 3.5);
    }

    #[test]
    fn duration_keeps_seconds() {
        let line = TimesheetLine {
            id: "t2".into(),
            employee: "alice".into(),
            project: None,
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            start: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end: NaiveTime::from_hms_opt(9, 0, 45).unwrap(),
            description: None,
            create_at: None,
        };
        assert!((line.duration_hours() - 0.0125).abs() < 1e-12);
    }

    #[test]
    fn new_line_from_json() {
        let body: NewTimesheetLine = serde_json::from_str(
            r#"{"employee": "bob", "date": "2024-03-01", "start": "08:15:00", "end": "17:00:00"}"#,
        )
        .unwrap();
        assert_eq!(body.start, NaiveTime::from_hms_opt(8, 15, 0).unwrap());
        assert!(body.project.is_none());
    }
}
