use serde::{Deserialize, Serialize};

use super::run::{RunOutcome, RunStatus};
use crate::pagination::Keyed;

/// One parameter of a test case (request field, header, path segment...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TestDataField {
    pub param_id: i64,
    pub category: String,
    #[serde(rename = "koName")]
    pub display_name: String,
    pub name: String,
    /// path / query / body / header
    pub context: String,
    #[serde(rename = "type")]
    pub data_type: String,
    pub length: i64,
    pub format: String,
    pub default_value: String,
    pub required: bool,
    pub parent: String,
    #[serde(rename = "desc")]
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl TestDataField {
    /// Copy of this field with its value stripped, as served in API templates.
    pub fn template(&self) -> Self {
        Self {
            value: None,
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    pub tc_id: String,
    pub precondition: Option<String>,
    pub description: String,
    pub expected_result: String,
    pub status: Option<i64>,
    #[serde(default)]
    pub test_data_list: Vec<TestDataField>,
    /// Absent until the owning scenario has been targeted by a run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_success: Option<RunStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executed_time: Option<String>,
}

impl TestCase {
    pub fn record_run(&mut self, outcome: RunOutcome) {
        self.is_success = Some(outcome.status);
        self.executed_time = Some(outcome.executed_time());
    }

    /// Status used for rollup; a case that never ran counts as pending.
    pub fn run_status(&self) -> RunStatus {
        self.is_success.unwrap_or(RunStatus::Pending)
    }

    /// Overwrite the values of existing test-data fields whose `paramId`
    /// matches an entry in `incoming`. Fields are never added or removed.
    pub fn merge_values(&mut self, incoming: &[TestDataField]) {
        for field in &mut self.test_data_list {
            if let Some(update) = incoming.iter().find(|f| f.param_id == field.param_id) {
                field.value = update.value.clone();
            }
        }
    }
}

impl Keyed for TestCase {
    fn key(&self) -> &str {
        &self.tc_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(param_id: i64, value: &str) -> TestDataField {
        TestDataField {
            param_id,
            name: format!("p{}", param_id),
            value: Some(value.to_string()),
            ..Default::default()
        }
    }

    fn case() -> TestCase {
        TestCase {
            tc_id: "testcase-1".into(),
            precondition: None,
            description: "d".into(),
            expected_result: "e".into(),
            status: Some(2),
            test_data_list: vec![field(1, "a"), field(2, "b")],
            is_success: None,
            executed_time: None,
        }
    }

    #[test]
    fn test_merge_values_only_touches_matching_params() {
        let mut tc = case();
        tc.merge_values(&[field(2, "changed"), field(9, "ignored")]);
        assert_eq!(tc.test_data_list[0].value.as_deref(), Some("a"));
        assert_eq!(tc.test_data_list[1].value.as_deref(), Some("changed"));
        assert_eq!(tc.test_data_list.len(), 2);
    }

    #[test]
    fn test_never_run_case_omits_result_fields() {
        let json = serde_json::to_value(case()).unwrap();
        assert!(json.get("isSuccess").is_none());
        assert!(json.get("executedTime").is_none());
        assert_eq!(json["tcId"], "testcase-1");
        assert_eq!(json["testDataList"][0]["paramId"], 1);
    }

    #[test]
    fn test_record_run_sets_result_fields() {
        let mut tc = case();
        assert_eq!(tc.run_status(), RunStatus::Pending);
        tc.record_run(RunOutcome {
            status: RunStatus::Failure,
            duration_ms: 12,
        });
        assert_eq!(tc.run_status(), RunStatus::Failure);
        assert_eq!(tc.executed_time.as_deref(), Some("12ms"));
    }

    #[test]
    fn test_template_strips_value() {
        let f = field(3, "secret");
        let json = serde_json::to_value(f.template()).unwrap();
        assert!(json.get("value").is_none());
        assert_eq!(json["koName"], "");
    }

    #[test]
    fn test_partial_field_deserializes_with_defaults() {
        let f: TestDataField = serde_json::from_str(r#"{"paramId": 4, "value": "x"}"#).unwrap();
        assert_eq!(f.param_id, 4);
        assert_eq!(f.value.as_deref(), Some("x"));
        assert!(!f.required);
    }
}
