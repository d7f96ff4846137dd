pub mod cohorts;
pub mod models;
#[cfg(test)]
mod tests;
pub mod treatments;
pub mod views;
