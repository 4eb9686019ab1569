//! Startup success & failure dashboard.
//!
//! The [`data`] layer loads a startup dataset and runs the filter-aggregate
//! pipeline; [`app`] and [`ui`] render its output with egui.

pub mod app;
pub mod color;
pub mod data;
pub mod state;
pub mod ui;
