//! Step workflow: dispatching and page data

mod dispatcher;
mod page;

pub use dispatcher::{with_query, StepDispatcher, StepOutcome, View, CASE_SETUP_URL};
pub use page::{DocumentPage, PageData, StepLink, DEFAULT_USERNAME};
