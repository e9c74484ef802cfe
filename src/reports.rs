//! CSV report rendering for scenario and test-case downloads.

use anyhow::Result;
use chrono::{DateTime, Utc};

use crate::models::{Project, Scenario};

const NOT_RUN: &str = "not run";

/// One row per scenario, in list order.
pub fn scenario_report(project: &Project) -> Result<Vec<u8>> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(["Scenario ID", "Name", "Status", "Test Cases"])?;
    for s in &project.scenario_list {
        let status = s.is_success.map(|st| st.as_str()).unwrap_or(NOT_RUN);
        let cases = s.testcase_list.len().to_string();
        wtr.write_record([s.id.as_str(), s.name.as_str(), status, cases.as_str()])?;
    }
    wtr.into_inner().map_err(|e| e.into_error().into())
}

/// One row per test case of `scenario`.
pub fn testcase_report(scenario: &Scenario) -> Result<Vec<u8>> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record([
        "TestCase ID",
        "Description",
        "Expected Result",
        "Status",
        "Executed Time",
    ])?;
    for tc in &scenario.testcase_list {
        wtr.write_record([
            tc.tc_id.as_str(),
            tc.description.as_str(),
            tc.expected_result.as_str(),
            tc.is_success.map(|st| st.as_str()).unwrap_or(NOT_RUN),
            tc.executed_time.as_deref().unwrap_or(""),
        ])?;
    }
    wtr.into_inner().map_err(|e| e.into_error().into())
}

pub fn report_filename(kind: &str, at: DateTime<Utc>) -> String {
    format!("test-{}-report-{}.csv", kind, at.format("%Y%m%dT%H%M%SZ"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RunOutcome, RunStatus, TestCase};

    fn scenario() -> Scenario {
        let mut ran = TestCase {
            tc_id: "tc-1".into(),
            precondition: None,
            description: "Check login, with comma".into(),
            expected_result: "ok".into(),
            status: Some(2),
            test_data_list: vec![],
            is_success: None,
            executed_time: None,
        };
        ran.record_run(RunOutcome {
            status: RunStatus::Success,
            duration_ms: 40,
        });
        let unrun = TestCase {
            tc_id: "tc-2".into(),
            is_success: None,
            executed_time: None,
            ..ran.clone()
        };
        Scenario {
            id: "scenario-1".into(),
            name: "Flow 7".into(),
            description: String::new(),
            validation: String::new(),
            graph: String::new(),
            testcase_list: vec![ran, unrun],
            is_success: Some(RunStatus::Pending),
        }
    }

    #[test]
    fn test_scenario_report_rows() {
        let mut project = Project::new("alpha", "tok");
        project.scenario_list.push(scenario());
        let out = String::from_utf8(scenario_report(&project).unwrap()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "Scenario ID,Name,Status,Test Cases");
        assert_eq!(lines[1], "scenario-1,Flow 7,pending,2");
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_testcase_report_quotes_and_unrun() {
        let out = String::from_utf8(testcase_report(&scenario()).unwrap()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[1], "tc-1,\"Check login, with comma\",ok,success,40ms");
        assert_eq!(lines[2], "tc-2,\"Check login, with comma\",ok,not run,");
    }

    #[test]
    fn test_report_filename() {
        let at = DateTime::parse_from_rfc3339("2026-01-02T03:04:05Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(
            report_filename("scenario", at),
            "test-scenario-report-20260102T030405Z.csv"
        );
    }
}
