//! API request handlers

mod documents;
mod drive;
mod main_page;
mod steps;

pub use documents::*;
pub use drive::*;
pub use main_page::*;
pub use steps::*;
