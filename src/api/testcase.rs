use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ApiJson, ApiResponse};
use crate::errors::AppError;
use crate::fixtures::ApiEndpoint;
use crate::middleware::session::Session;
use crate::models::{generate_id, TestCase, TestDataField};
use crate::pagination::PageParams;
use crate::AppState;

/// Test cases generated per scenario by `POST /tc`.
pub const TEST_CASE_BATCH: usize = 3;
/// Fields in a generated test-data template.
pub const TEMPLATE_FIELDS: usize = 3;

// ── Request / Response DTOs ──────────────────────────────────

/// Body shared by test-case create and update.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCaseRequest {
    pub precondition: Option<String>,
    pub description: Option<String>,
    pub expected_result: Option<String>,
    pub status: Option<i64>,
    /// Either a JSON array or a string holding one.
    pub test_data_list: Option<Value>,
}

impl TestCaseRequest {
    fn test_data(&self) -> Result<Vec<TestDataField>, AppError> {
        parse_test_data(self.test_data_list.as_ref())
    }

    fn into_test_case(self) -> Result<TestCase, AppError> {
        let test_data_list = self.test_data()?;
        Ok(TestCase {
            tc_id: generate_id("testcase"),
            precondition: self.precondition,
            description: self.description.unwrap_or_default(),
            expected_result: self.expected_result.unwrap_or_default(),
            status: self.status,
            test_data_list,
            is_success: None,
            executed_time: None,
        })
    }
}

/// Accept `testDataList` as an array or as a JSON-encoded string.
pub fn parse_test_data(raw: Option<&Value>) -> Result<Vec<TestDataField>, AppError> {
    let parsed = match raw {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::String(s)) => serde_json::from_str(s),
        Some(v) => serde_json::from_value(v.clone()),
    };
    parsed.map_err(|e| {
        tracing::warn!("invalid testDataList: {}", e);
        AppError::validation("testDataList must be an array of test data")
    })
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCaseIds {
    pub tc_list: Vec<String>,
    pub tc_total: usize,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedTestCase {
    pub tc_id: String,
}

/// A test case as shown for editing; run results are left out.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCaseDetail {
    pub tc_id: String,
    pub precondition: Option<String>,
    pub description: String,
    pub expected_result: String,
    pub status: Option<i64>,
    pub test_data_list: Vec<TestDataField>,
}

impl From<&TestCase> for TestCaseDetail {
    fn from(tc: &TestCase) -> Self {
        Self {
            tc_id: tc.tc_id.clone(),
            precondition: tc.precondition.clone(),
            description: tc.description.clone(),
            expected_result: tc.expected_result.clone(),
            status: tc.status,
            test_data_list: tc.test_data_list.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiList {
    pub api_list: Vec<ApiEndpoint>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestDataTemplate {
    pub test_data_list: Vec<TestDataField>,
}

// ── Handlers ─────────────────────────────────────────────────

/// POST /api/v1/tc: regenerate test cases for every scenario
pub async fn generate_test_cases(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let scenarios = state.store.update(session.token(), |project| {
        for scenario in &mut project.scenario_list {
            scenario.testcase_list = (0..TEST_CASE_BATCH)
                .map(|_| state.fixtures.test_case())
                .collect();
            // Old results no longer describe these cases.
            scenario.is_success = None;
        }
        Ok(project.scenario_list.len())
    })?;
    tracing::info!(scenarios, "test cases generated");

    Ok(ApiResponse::with_message((), "Test cases created successfully"))
}

/// GET /api/v1/tc/scenario/:scenario_id: test-case ids of one scenario
pub async fn list_scenario_test_cases(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(scenario_id): Path<String>,
    Query(params): Query<PageParams>,
) -> Result<Json<ApiResponse<TestCaseIds>>, AppError> {
    let ids = state.store.read(session.token(), |project| {
        let scenario = project
            .scenario(&scenario_id)
            .ok_or(AppError::ScenarioNotFound)?;
        Ok(TestCaseIds {
            tc_list: params
                .apply(&scenario.testcase_list)
                .iter()
                .map(|tc| tc.tc_id.clone())
                .collect(),
            tc_total: scenario.testcase_list.len(),
        })
    })?;

    Ok(ApiResponse::ok(ids))
}

/// POST /api/v1/tc/scenario/:scenario_id
pub async fn create_scenario_test_case(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(scenario_id): Path<String>,
    ApiJson(payload): ApiJson<TestCaseRequest>,
) -> Result<Json<ApiResponse<CreatedTestCase>>, AppError> {
    let tc_id = insert_test_case(&state, &session, &scenario_id, payload)?;
    Ok(ApiResponse::ok(CreatedTestCase { tc_id }))
}

/// GET /api/v1/tc/:tc_id
pub async fn get_test_case(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(tc_id): Path<String>,
) -> Result<Json<ApiResponse<TestCaseDetail>>, AppError> {
    let detail = state.store.read(session.token(), |project| {
        project
            .test_case(&tc_id)
            .map(TestCaseDetail::from)
            .ok_or(AppError::TestCaseNotFound)
    })?;

    Ok(ApiResponse::ok(detail))
}

/// PUT /api/v1/tc/:tc_id: overwrite the provided fields, merge test-data values
pub async fn update_test_case(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(tc_id): Path<String>,
    ApiJson(payload): ApiJson<TestCaseRequest>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let incoming = payload.test_data()?;

    state.store.update(session.token(), |project| {
        let tc = project
            .test_case_mut(&tc_id)
            .ok_or(AppError::TestCaseNotFound)?;
        if payload.precondition.is_some() {
            tc.precondition = payload.precondition;
        }
        if let Some(description) = payload.description {
            tc.description = description;
        }
        if let Some(expected) = payload.expected_result {
            tc.expected_result = expected;
        }
        if payload.status.is_some() {
            tc.status = payload.status;
        }
        tc.merge_values(&incoming);
        Ok(())
    })?;

    Ok(ApiResponse::with_message((), "Test case updated successfully"))
}

/// DELETE /api/v1/tc/:tc_id: idempotent
pub async fn delete_test_case(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(tc_id): Path<String>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let removed = state
        .store
        .update(session.token(), |project| Ok(project.remove_test_case(&tc_id)))?;
    tracing::debug!(tc_id = %tc_id, removed, "delete_test_case");

    Ok(ApiResponse::with_message((), "Test case deleted successfully"))
}

/// GET /api/v1/tc/api/:scenario_id: APIs exercised by a scenario
pub async fn list_apis(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(scenario_id): Path<String>,
) -> Result<Json<ApiResponse<ApiList>>, AppError> {
    let api_list = state.store.read(session.token(), |project| {
        project
            .scenario(&scenario_id)
            .map(|s| state.fixtures.api_list(s))
            .ok_or(AppError::ScenarioNotFound)
    })?;

    Ok(ApiResponse::ok(ApiList { api_list }))
}

/// GET /api/v1/tc/api/:scenario_id/:api_id: value-less test-data template
pub async fn api_test_data_template(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path((scenario_id, api_id)): Path<(String, String)>,
) -> Result<Json<ApiResponse<TestDataTemplate>>, AppError> {
    let test_data_list = state.store.read(session.token(), |project| {
        let scenario = project
            .scenario(&scenario_id)
            .ok_or(AppError::ScenarioNotFound)?;
        let fields = match scenario.testcase_list.first() {
            Some(tc) => tc.test_data_list.iter().map(TestDataField::template).collect(),
            None => (0..TEMPLATE_FIELDS)
                .map(|_| state.fixtures.test_data_field().template())
                .collect(),
        };
        Ok(fields)
    })?;
    tracing::debug!(scenario_id = %scenario_id, api_id = %api_id, "test data template");

    Ok(ApiResponse::ok(TestDataTemplate { test_data_list }))
}

/// POST /api/v1/tc/api/:scenario_id/:api_id: `data` is the new tcId
pub async fn create_api_test_case(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path((scenario_id, api_id)): Path<(String, String)>,
    ApiJson(payload): ApiJson<TestCaseRequest>,
) -> Result<Json<ApiResponse<String>>, AppError> {
    let tc_id = insert_test_case(&state, &session, &scenario_id, payload)?;
    tracing::debug!(api_id = %api_id, tc_id = %tc_id, "api test case created");
    Ok(ApiResponse::ok(tc_id))
}

fn insert_test_case(
    state: &AppState,
    session: &Session,
    scenario_id: &str,
    payload: TestCaseRequest,
) -> Result<String, AppError> {
    let tc = payload.into_test_case()?;
    let tc_id = tc.tc_id.clone();

    state.store.update(session.token(), |project| {
        let scenario = project
            .scenario_mut(scenario_id)
            .ok_or(AppError::ScenarioNotFound)?;
        scenario.testcase_list.push(tc);
        Ok(())
    })?;

    Ok(tc_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_test_data_accepts_array_and_string() {
        let arr = json!([{"paramId": 1, "name": "id", "value": "7"}]);
        let from_arr = parse_test_data(Some(&arr)).unwrap();
        assert_eq!(from_arr[0].param_id, 1);

        let s = Value::String(arr.to_string());
        let from_str = parse_test_data(Some(&s)).unwrap();
        assert_eq!(from_arr, from_str);
    }

    #[test]
    fn test_parse_test_data_missing_is_empty() {
        assert!(parse_test_data(None).unwrap().is_empty());
        assert!(parse_test_data(Some(&Value::Null)).unwrap().is_empty());
    }

    #[test]
    fn test_parse_test_data_rejects_garbage() {
        let bad = Value::String("not json".into());
        assert!(matches!(
            parse_test_data(Some(&bad)),
            Err(AppError::Validation { .. })
        ));
        assert!(parse_test_data(Some(&json!(42))).is_err());
    }

    #[test]
    fn test_new_test_case_defaults() {
        let tc = TestCaseRequest::default().into_test_case().unwrap();
        assert!(tc.tc_id.starts_with("testcase-"));
        assert_eq!(tc.description, "");
        assert!(tc.precondition.is_none());
        assert!(tc.test_data_list.is_empty());
        assert!(tc.is_success.is_none());
    }
}
