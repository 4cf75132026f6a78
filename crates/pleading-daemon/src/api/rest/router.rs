//! API Router configuration

use super::handlers;
use super::middleware::{cors_layer, preflight_no_content, session_context};
use super::state::AppState;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Create the main router
pub fn create_router(state: AppState) -> Router {
    let ui_routes = Router::new()
        // Steps
        .route("/step/:step", get(handlers::get_step))
        // Drive
        .route("/icloud-folders", get(handlers::list_drive_folders))
        .route("/case-folders", get(handlers::list_case_folders))
        .route("/icloud-setup", get(handlers::show_drive_setup))
        .route("/icloud-auth", post(handlers::connect_drive))
        .route("/select-parent-folder", post(handlers::select_parent_folder))
        .route("/select-case-folder", post(handlers::select_case_folder))
        .route("/load-documents", get(handlers::load_documents))
        // Selections
        .route("/select-documents", post(handlers::select_documents))
        .route("/select-template", post(handlers::select_template))
        // Documents
        .route("/preview-document", get(handlers::preview_document))
        .route("/view-document", get(handlers::view_document))
        .route("/edit-document", get(handlers::edit_document))
        .route("/save-document", post(handlers::save_document));

    // Build router with middleware
    let mut router = Router::new()
        .route("/", get(handlers::show_main_page))
        .nest("/ui", ui_routes)
        .layer(middleware::from_fn_with_state(state.clone(), session_context))
        .layer(TraceLayer::new_for_http());

    if state.config.server.enable_cors {
        router = router
            .layer(cors_layer())
            .layer(middleware::from_fn(preflight_no_content));
    }

    router.with_state(state)
}
