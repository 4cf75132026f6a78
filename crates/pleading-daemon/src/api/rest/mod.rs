//! HTMX workflow endpoints
//!
//! Fragment endpoints answer with partial HTML for in-place swaps; only
//! malformed requests and fatal filesystem failures surface as non-200
//! JSON errors.

pub mod form;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use middleware::SessionId;
pub use router::create_router;
pub use state::AppState;
