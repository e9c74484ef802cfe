use serde::{Deserialize, Serialize};

use super::run::{rollup, RunStatus};
use super::testcase::TestCase;
use crate::pagination::Keyed;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub id: String,
    pub name: String,
    pub description: String,
    pub validation: String,
    /// Mermaid flow diagram source.
    #[serde(default)]
    pub graph: String,
    #[serde(default)]
    pub testcase_list: Vec<TestCase>,
    /// Rolled-up status of the last run; absent if never run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_success: Option<RunStatus>,
}

impl Scenario {
    pub fn has_run(&self) -> bool {
        self.is_success.is_some()
    }

    /// Recompute the scenario status from its test cases.
    pub fn refresh_status(&mut self) -> RunStatus {
        let status = rollup(self.testcase_list.iter().map(TestCase::run_status));
        self.is_success = Some(status);
        status
    }

    pub fn find_test_case(&self, tc_id: &str) -> Option<&TestCase> {
        self.testcase_list.iter().find(|tc| tc.tc_id == tc_id)
    }
}

impl Keyed for Scenario {
    fn key(&self) -> &str {
        &self.id
    }
}

/// Short `{id, name}` form used by listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioSummary {
    pub id: String,
    pub name: String,
}

impl From<&Scenario> for ScenarioSummary {
    fn from(s: &Scenario) -> Self {
        Self {
            id: s.id.clone(),
            name: s.name.clone(),
        }
    }
}

/// Single-scenario detail, without its test cases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioDetail {
    pub id: String,
    pub name: String,
    pub graph: String,
    pub description: String,
    pub validation: String,
}

impl From<&Scenario> for ScenarioDetail {
    fn from(s: &Scenario) -> Self {
        Self {
            id: s.id.clone(),
            name: s.name.clone(),
            graph: s.graph.clone(),
            description: s.description.clone(),
            validation: s.validation.clone(),
        }
    }
}
