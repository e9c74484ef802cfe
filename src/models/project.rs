use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::scenario::Scenario;
use super::testcase::TestCase;

/// A project and everything under it. One project per external project name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: i64,
    /// External project name the client logs in with.
    pub project_id: String,
    pub created_at: DateTime<Utc>,
    /// Current session token; `None` after logout.
    pub avalon: Option<String>,
    #[serde(default)]
    pub scenario_list: Vec<Scenario>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec_files: Option<BTreeMap<String, SpecFile>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl Project {
    pub fn new(project_id: impl Into<String>, avalon: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: now.timestamp_millis(),
            project_id: project_id.into(),
            created_at: now,
            avalon: Some(avalon.into()),
            scenario_list: Vec::new(),
            spec_files: None,
            last_updated: None,
        }
    }

    pub fn scenario(&self, id: &str) -> Option<&Scenario> {
        self.scenario_list.iter().find(|s| s.id == id)
    }

    pub fn scenario_mut(&mut self, id: &str) -> Option<&mut Scenario> {
        self.scenario_list.iter_mut().find(|s| s.id == id)
    }

    /// Test-case ids are searched across every scenario, in order.
    pub fn test_case(&self, tc_id: &str) -> Option<&TestCase> {
        self.scenario_list
            .iter()
            .find_map(|s| s.find_test_case(tc_id))
    }

    pub fn test_case_mut(&mut self, tc_id: &str) -> Option<&mut TestCase> {
        self.scenario_list
            .iter_mut()
            .flat_map(|s| s.testcase_list.iter_mut())
            .find(|tc| tc.tc_id == tc_id)
    }

    /// Returns `true` if a scenario was removed.
    pub fn remove_scenario(&mut self, id: &str) -> bool {
        let before = self.scenario_list.len();
        self.scenario_list.retain(|s| s.id != id);
        before != self.scenario_list.len()
    }

    /// Returns `true` if a test case was removed.
    pub fn remove_test_case(&mut self, tc_id: &str) -> bool {
        for scenario in &mut self.scenario_list {
            let before = scenario.testcase_list.len();
            scenario.testcase_list.retain(|tc| tc.tc_id != tc_id);
            if before != scenario.testcase_list.len() {
                return true;
            }
        }
        false
    }
}

/// Metadata of an uploaded specification document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecFile {
    pub filename: String,
    pub originalname: String,
    pub path: String,
    pub size: u64,
    pub mimetype: String,
}
