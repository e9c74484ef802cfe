use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use super::{ApiJson, ApiResponse};
use crate::errors::AppError;
use crate::middleware::session::Session;
use crate::models::{generate_id, Scenario, ScenarioDetail, ScenarioSummary};
use crate::pagination::PageParams;
use crate::AppState;

/// Number of scenarios produced by one generation request.
pub const SCENARIO_BATCH: usize = 5;

const REQUIRED_FIELDS: [&str; 3] = ["name", "description", "validation"];

// ── Request / Response DTOs ──────────────────────────────────

#[derive(Deserialize)]
pub struct ScenarioRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub validation: Option<String>,
}

struct ValidScenario {
    name: String,
    description: String,
    validation: String,
}

impl ScenarioRequest {
    /// All three fields must be present and non-blank.
    fn validate(self) -> Result<ValidScenario, AppError> {
        fn present(v: Option<String>) -> Option<String> {
            v.filter(|s| !s.trim().is_empty())
        }
        match (
            present(self.name),
            present(self.description),
            present(self.validation),
        ) {
            (Some(name), Some(description), Some(validation)) => Ok(ValidScenario {
                name,
                description,
                validation,
            }),
            _ => Err(AppError::missing_fields(REQUIRED_FIELDS.to_vec())),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioList {
    pub scenario_list: Vec<ScenarioSummary>,
    pub total: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedScenario {
    pub id: String,
}

// ── Handlers ─────────────────────────────────────────────────

/// POST /api/v1/scenario/create: replace the project's scenarios with a generated batch
pub async fn generate_scenarios(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Json<ApiResponse<ScenarioList>>, AppError> {
    let generated: Vec<Scenario> = (0..SCENARIO_BATCH)
        .map(|_| state.fixtures.scenario())
        .collect();

    let list = ScenarioList {
        scenario_list: generated.iter().map(ScenarioSummary::from).collect(),
        total: generated.len(),
    };

    state.store.update(session.token(), |project| {
        project.scenario_list = generated;
        Ok(())
    })?;
    tracing::info!(count = list.total, "scenarios generated");

    Ok(ApiResponse::ok(list))
}

/// POST /api/v1/scenario: append one scenario
pub async fn create_scenario(
    State(state): State<Arc<AppState>>,
    session: Session,
    ApiJson(payload): ApiJson<ScenarioRequest>,
) -> Result<Json<ApiResponse<CreatedScenario>>, AppError> {
    let valid = payload.validate().map_err(|e| {
        tracing::warn!("create_scenario: missing required fields");
        e
    })?;

    let scenario = Scenario {
        id: generate_id("scenario"),
        name: valid.name,
        description: valid.description,
        validation: valid.validation,
        graph: String::new(),
        testcase_list: Vec::new(),
        is_success: None,
    };
    let id = scenario.id.clone();

    state.store.update(session.token(), |project| {
        project.scenario_list.push(scenario);
        Ok(())
    })?;

    Ok(ApiResponse::ok(CreatedScenario { id }))
}

/// PUT /api/v1/scenario/:scenario_id: edit name, description and validation
pub async fn update_scenario(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(scenario_id): Path<String>,
    ApiJson(payload): ApiJson<ScenarioRequest>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let valid = payload.validate()?;

    state.store.update(session.token(), |project| {
        let scenario = project
            .scenario_mut(&scenario_id)
            .ok_or(AppError::ScenarioNotFound)?;
        scenario.name = valid.name;
        scenario.description = valid.description;
        scenario.validation = valid.validation;
        Ok(())
    })?;

    Ok(ApiResponse::with_message((), "Scenario updated successfully"))
}

/// DELETE /api/v1/scenario/:scenario_id: idempotent
pub async fn delete_scenario(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(scenario_id): Path<String>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let removed = state
        .store
        .update(session.token(), |project| Ok(project.remove_scenario(&scenario_id)))?;
    tracing::debug!(scenario_id = %scenario_id, removed, "delete_scenario");

    Ok(ApiResponse::with_message((), "Scenario deleted successfully"))
}

/// GET /api/v1/scenario/:scenario_id
pub async fn get_scenario(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(scenario_id): Path<String>,
) -> Result<Json<ApiResponse<ScenarioDetail>>, AppError> {
    let detail = state.store.read(session.token(), |project| {
        project
            .scenario(&scenario_id)
            .map(ScenarioDetail::from)
            .ok_or(AppError::ScenarioNotFound)
    })?;

    Ok(ApiResponse::ok(detail))
}

/// GET /api/v1/scenario: paged scenario summaries plus the full count
pub async fn list_scenarios(
    State(state): State<Arc<AppState>>,
    session: Session,
    Query(params): Query<PageParams>,
) -> Result<Json<ApiResponse<ScenarioList>>, AppError> {
    let list = state.store.read(session.token(), |project| {
        Ok(ScenarioList {
            scenario_list: params
                .apply(&project.scenario_list)
                .iter()
                .map(ScenarioSummary::from)
                .collect(),
            total: project.scenario_list.len(),
        })
    })?;

    Ok(ApiResponse::ok(list))
}
