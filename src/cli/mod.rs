pub mod analyze;
pub mod setup;
pub mod summary;
pub mod ui;
