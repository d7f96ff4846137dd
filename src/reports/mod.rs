//! Read-only colony reports: totals, husbandry to-do lists, birth archive,
//! strain and cage overviews.
pub mod models;
pub mod services;
pub mod views;
