//! Drive connection and folder handlers

use crate::api::rest::form::FormFields;
use crate::api::rest::state::AppState;
use crate::api::rest::SessionId;
use crate::error::{ApiError, ApiResult};
use crate::render::views;
use crate::workflow::{PageData, DEFAULT_USERNAME};
use axum::{
    body::Bytes,
    extract::{Query, State},
    response::Html,
    Extension,
};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct ParentQuery {
    pub parent: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FolderQuery {
    pub folder: Option<String>,
}

/// Root folders fragment
pub async fn list_drive_folders(State(state): State<AppState>) -> ApiResult<Html<String>> {
    let view = state.dispatcher.root_folders().await;
    state.render_view(&view)
}

/// Case folders fragment for `?parent=`
pub async fn list_case_folders(
    State(state): State<AppState>,
    Query(query): Query<ParentQuery>,
) -> ApiResult<Html<String>> {
    let view = state.dispatcher.case_folders(query.parent.as_deref()).await;
    state.render_view(&view)
}

/// Drive connection modal
pub async fn show_drive_setup(
    State(state): State<AppState>,
    Extension(session): Extension<SessionId>,
) -> ApiResult<Html<String>> {
    let workflow = state.sessions.get(&session.id).await;
    let mut page = PageData::for_step(workflow.current_step(), &workflow);
    page.username = DEFAULT_USERNAME.to_string();
    state.render(views::DRIVE_SETUP_MODAL, &page)
}

/// Connect the drive for this session
pub async fn connect_drive(
    State(state): State<AppState>,
    Extension(session): Extension<SessionId>,
    body: Bytes,
) -> ApiResult<Html<String>> {
    let form = FormFields::from(body);
    let view = state
        .dispatcher
        .connect_drive(
            &session.id,
            form.first("username").unwrap_or_default(),
            form.first("appPassword").unwrap_or_default(),
        )
        .await;
    state.render_view(&view)
}

pub async fn select_parent_folder(
    State(state): State<AppState>,
    Extension(session): Extension<SessionId>,
    body: Bytes,
) -> ApiResult<Html<String>> {
    let form = FormFields::from(body);
    let folder = form
        .first("folderPath")
        .ok_or_else(|| ApiError::BadRequest("Folder path required".to_string()))?;
    let view = state.dispatcher.select_parent_folder(&session.id, folder).await;
    state.render_view(&view)
}

pub async fn select_case_folder(
    State(state): State<AppState>,
    Extension(session): Extension<SessionId>,
    body: Bytes,
) -> ApiResult<Html<String>> {
    let form = FormFields::from(body);
    let folder = form
        .first("caseFolder")
        .ok_or_else(|| ApiError::BadRequest("Case folder required".to_string()))?;
    let view = state.dispatcher.select_case_folder(&session.id, folder).await;
    state.render_view(&view)
}

/// Document list fragment for `?folder=`
pub async fn load_documents(
    State(state): State<AppState>,
    Query(query): Query<FolderQuery>,
) -> ApiResult<Html<String>> {
    let folder = query
        .folder
        .filter(|f| !f.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Folder parameter required".to_string()))?;
    let view = state.dispatcher.documents_in(&folder).await;
    state.render_view(&view)
}
