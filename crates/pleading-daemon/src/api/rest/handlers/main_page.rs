//! Full page shell

use crate::api::rest::state::AppState;
use crate::api::rest::SessionId;
use crate::error::ApiResult;
use crate::render::views;
use crate::workflow::{PageData, DEFAULT_USERNAME};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Extension,
};

pub const LOGIN_URL: &str = "/login";

/// Render the workflow page at the session's current step; visitors without
/// a session cookie are sent to the login page.
pub async fn show_main_page(
    State(state): State<AppState>,
    Extension(session): Extension<SessionId>,
) -> ApiResult<Response> {
    if !session.from_cookie {
        return Ok((StatusCode::FOUND, [(header::LOCATION, LOGIN_URL)]).into_response());
    }

    let workflow = state.sessions.get(&session.id).await;
    let mut page = PageData::for_step(workflow.current_step(), &workflow);
    page.username = DEFAULT_USERNAME.to_string();

    Ok(state.render(views::INDEX, &page)?.into_response())
}
