//! Read-only JSON API with offset pagination, for scripts and external
//! analysis tools.
pub mod models;
pub mod services;
#[cfg(test)]
mod tests;
pub mod views;
