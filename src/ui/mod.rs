pub mod insights;
pub mod kpi;
pub mod panels;
pub mod plot;
