use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ApiJson, ApiResponse};
use crate::errors::AppError;
use crate::middleware::session::Session;
use crate::models::{RunStatus, Scenario};
use crate::pagination::{paginate, PageParams};
use crate::AppState;

// ── Request / Response DTOs ──────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunRequest {
    /// Scenario ids, as a JSON array or a string holding one.
    pub scenario_list: Option<Value>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioResult {
    pub scenario_id: String,
    pub scenario_name: String,
    pub is_success: RunStatus,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioResults {
    pub scenario_list: Vec<ScenarioResult>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCaseResult {
    pub tc_id: String,
    pub description: String,
    pub expected_result: String,
    pub is_success: Option<RunStatus>,
    pub executed_time: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCaseResults {
    pub scenario_id: String,
    pub scenario_name: String,
    pub tc_list: Vec<TestCaseResult>,
}

impl ScenarioResult {
    fn from_scenario(s: &Scenario) -> Option<Self> {
        s.is_success.map(|is_success| Self {
            scenario_id: s.id.clone(),
            scenario_name: s.name.clone(),
            is_success,
        })
    }
}

/// Decode the run target list. Non-string entries are skipped.
pub fn parse_scenario_list(raw: Option<&Value>) -> Result<Vec<String>, AppError> {
    let raw = match raw {
        None | Some(Value::Null) => {
            return Err(AppError::validation("Scenario list is required"))
        }
        Some(v) => v,
    };

    let not_array = || AppError::validation("Scenario list must be a non-empty array");
    let decoded;
    let value = match raw {
        Value::String(s) => {
            decoded = serde_json::from_str::<Value>(s).map_err(|_| not_array())?;
            &decoded
        }
        v => v,
    };

    let ids: Vec<String> = value
        .as_array()
        .ok_or_else(not_array)?
        .iter()
        .filter_map(|v| v.as_str().map(String::from))
        .collect();
    if ids.is_empty() {
        return Err(not_array());
    }
    Ok(ids)
}

// ── Handlers ─────────────────────────────────────────────────

/// POST /api/v1/test/run: simulate a run of every test case in the targeted scenarios
pub async fn run_tests(
    State(state): State<Arc<AppState>>,
    session: Session,
    ApiJson(payload): ApiJson<RunRequest>,
) -> Result<Json<ApiResponse<ScenarioResults>>, AppError> {
    let targets = parse_scenario_list(payload.scenario_list.as_ref()).map_err(|e| {
        tracing::warn!("run_tests: {}", e);
        e
    })?;

    let scenario_list = state.store.update(session.token(), |project| {
        let mut results = Vec::new();
        for scenario in project
            .scenario_list
            .iter_mut()
            .filter(|s| targets.contains(&s.id))
        {
            for tc in &mut scenario.testcase_list {
                let outcome = state.fixtures.run_test_case(tc);
                tc.record_run(outcome);
            }
            let status = scenario.refresh_status();
            tracing::debug!(scenario_id = %scenario.id, status = %status, "scenario run");
            results.extend(ScenarioResult::from_scenario(scenario));
        }
        Ok(results)
    })?;
    tracing::info!(
        requested = targets.len(),
        executed = scenario_list.len(),
        "test run completed"
    );

    Ok(ApiResponse::with_message(
        ScenarioResults { scenario_list },
        "API test execution completed",
    ))
}

/// GET /api/v1/test/result: status of every scenario that has run
pub async fn list_results(
    State(state): State<Arc<AppState>>,
    session: Session,
    Query(params): Query<PageParams>,
) -> Result<Json<ApiResponse<ScenarioResults>>, AppError> {
    let scenario_list = state.store.read(session.token(), |project| {
        let ran: Vec<&Scenario> = project.scenario_list.iter().filter(|s| s.has_run()).collect();
        Ok(paginate(&ran, params.cursor(), params.size())
            .iter()
            .filter_map(|s| ScenarioResult::from_scenario(s))
            .collect())
    })?;

    Ok(ApiResponse::ok(ScenarioResults { scenario_list }))
}

/// GET /api/v1/test/result/:scenario_id: per-test-case results
pub async fn scenario_results(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(scenario_id): Path<String>,
    Query(params): Query<PageParams>,
) -> Result<Json<ApiResponse<TestCaseResults>>, AppError> {
    let results = state.store.read(session.token(), |project| {
        let scenario = project
            .scenario(&scenario_id)
            .ok_or(AppError::ScenarioNotFound)?;
        if !scenario.has_run() {
            return Err(AppError::ResultsNotAvailable);
        }
        Ok(TestCaseResults {
            scenario_id: scenario.id.clone(),
            scenario_name: scenario.name.clone(),
            tc_list: paginate(&scenario.testcase_list, params.cursor(), params.size())
                .iter()
                .map(|tc| TestCaseResult {
                    tc_id: tc.tc_id.clone(),
                    description: tc.description.clone(),
                    expected_result: tc.expected_result.clone(),
                    is_success: tc.is_success,
                    executed_time: tc.executed_time.clone(),
                })
                .collect(),
        })
    })?;

    Ok(ApiResponse::ok(results))
}
