//! Preview, viewer, editor and save handlers

use crate::api::rest::state::AppState;
use crate::api::rest::SessionId;
use crate::error::{ApiError, ApiResult};
use crate::render::views;
use crate::workflow::{with_query, DocumentPage, PageData};
use axum::{
    body::Bytes,
    extract::{Query, State},
    response::Html,
    Extension, Json,
};
use chrono::Local;
use pleading_core::document::naming;
use pleading_core::{build_preview, SavedDocument};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
pub struct ClientQuery {
    pub client: Option<String>,
}

/// Body of a save request
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRequest {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub client_name: Option<String>,
    #[serde(default)]
    pub document_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SaveResponse {
    pub success: bool,
    #[serde(flatten)]
    pub saved: SavedDocument,
}

/// Structured preview built from the session's selected documents
pub async fn preview_document(
    State(state): State<AppState>,
    Extension(session): Extension<SessionId>,
) -> ApiResult<Html<String>> {
    let workflow = state.sessions.get(&session.id).await;
    let names = workflow.selected_document_names();
    if names.is_empty() {
        tracing::warn!(
            session_id = %session.id,
            "No selected documents, previewing default sources"
        );
    }

    let page = PageData {
        cloud_connected: true,
        preview: Some(build_preview(&names)),
        ..PageData::default()
    };
    state.render(views::DOCUMENT_PREVIEW, &page)
}

async fn document_page(
    state: &AppState,
    session: &SessionId,
    client: Option<String>,
    editing: bool,
) -> ApiResult<DocumentPage> {
    let client = client
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| state.documents.default_client().to_string());
    let names = state
        .sessions
        .get(&session.id)
        .await
        .selected_document_names();

    let document = state.documents.locate_or_generate(&client, &names).await?;
    tracing::debug!(
        client = %client,
        path = %document.path.display(),
        origin = ?document.origin,
        "Materialized document"
    );

    Ok(DocumentPage {
        document_title: format!("Legal Complaint - {}", client),
        document_filename: naming::download_filename(&naming::client_key(&client), Local::now()),
        document_html: document.legal_document().to_string(),
        last_saved: editing.then(|| document.last_saved.clone()),
        preview: editing.then(|| build_preview(&names)),
        source_path: document.path.display().to_string(),
        view_url: with_query("/ui/view-document", "client", &client),
        edit_url: with_query("/ui/edit-document", "client", &client),
        client_name: client,
    })
}

/// Read-only document viewer
pub async fn view_document(
    State(state): State<AppState>,
    Extension(session): Extension<SessionId>,
    Query(query): Query<ClientQuery>,
) -> ApiResult<Html<String>> {
    let page = document_page(&state, &session, query.client, false).await?;
    state.render(views::DOCUMENT_VIEWER, &page)
}

/// Document editor with last-saved time
pub async fn edit_document(
    State(state): State<AppState>,
    Extension(session): Extension<SessionId>,
    Query(query): Query<ClientQuery>,
) -> ApiResult<Html<String>> {
    let page = document_page(&state, &session, query.client, true).await?;
    state.render(views::DOCUMENT_EDITOR, &page)
}

/// Save edited document content
pub async fn save_document(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<Json<SaveResponse>> {
    let request: SaveRequest = serde_json::from_slice(&body)
        .map_err(|e| ApiError::BadRequest(format!("Invalid request format: {}", e)))?;

    let saved = state
        .documents
        .save(
            &request.content,
            request.client_name.as_deref(),
            request.document_type.as_deref(),
        )
        .await?;

    Ok(Json(SaveResponse {
        success: true,
        saved,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_request_uses_camel_case() {
        let request: SaveRequest = serde_json::from_str(
            r#"{"content":"<p>x</p>","clientName":"Jane Doe","documentType":"complaint"}"#,
        )
        .unwrap();
        assert_eq!(request.client_name.as_deref(), Some("Jane Doe"));
        assert_eq!(request.document_type.as_deref(), Some("complaint"));

        let empty: SaveRequest = serde_json::from_str("{}").unwrap();
        assert!(empty.content.is_empty());
    }

    #[test]
    fn test_save_response_is_flat() {
        let response = SaveResponse {
            success: true,
            saved: SavedDocument {
                path: "a".into(),
                latest_path: "b".into(),
                timestamp: "2025-06-05 01:04:20".into(),
            },
        };
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["latest_path"], "b");
    }
}
