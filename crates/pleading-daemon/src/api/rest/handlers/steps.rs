//! Step navigation and selection handlers

use crate::api::rest::form::FormFields;
use crate::api::rest::state::AppState;
use crate::api::rest::SessionId;
use crate::error::{ApiError, ApiResult};
use crate::workflow::StepOutcome;
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    Extension,
};
use pleading_core::{Step, WorkflowError};
use serde::Deserialize;

pub const HX_REDIRECT: &str = "HX-Redirect";

/// Query parameters for a step request
#[derive(Debug, Default, Deserialize)]
pub struct StepQuery {
    pub icloud_connected: Option<String>,
}

/// Non-numeric steps land on case setup; numbers outside 0..=3 are rejected.
pub fn parse_step(raw: &str) -> ApiResult<Step> {
    match raw.trim().parse::<i64>() {
        Ok(index) => u8::try_from(index)
            .ok()
            .and_then(Step::from_index)
            .ok_or_else(|| {
                ApiError::BadRequest(WorkflowError::InvalidStep(raw.to_string()).to_string())
            }),
        Err(_) => Ok(Step::CaseSetup),
    }
}

/// Render a workflow step
pub async fn get_step(
    State(state): State<AppState>,
    Extension(session): Extension<SessionId>,
    Path(raw_step): Path<String>,
    Query(query): Query<StepQuery>,
) -> ApiResult<Response> {
    let step = parse_step(&raw_step)?;
    let drive_connected = query.icloud_connected.as_deref() == Some("true");

    match state
        .dispatcher
        .render_step(&session.id, step, drive_connected)
        .await
    {
        StepOutcome::Render(view) => Ok(state.render_view(&view)?.into_response()),
        StepOutcome::Redirect(to) => Ok(([(HX_REDIRECT, to)], String::new()).into_response()),
    }
}

/// Persist the document selection and move on to template selection
pub async fn select_documents(
    State(state): State<AppState>,
    Extension(session): Extension<SessionId>,
    body: Bytes,
) -> ApiResult<Response> {
    let form = FormFields::from(body);
    let view = state
        .dispatcher
        .select_documents(
            &session.id,
            form.all("selectedDocs"),
            form.first("caseFolder").map(str::to_string),
        )
        .await;
    Ok(state.render_view(&view)?.into_response())
}

/// Persist the template, process the documents and show the review
pub async fn select_template(
    State(state): State<AppState>,
    Extension(session): Extension<SessionId>,
    body: Bytes,
) -> ApiResult<Response> {
    let form = FormFields::from(body);
    let template = form.first("selectedTemplate").unwrap_or_default();
    let view = state
        .dispatcher
        .select_template(&session.id, template, form.all("selectedDocs"))
        .await;
    Ok(state.render_view(&view)?.into_response())
}
