pub mod conditions;
pub mod issues;
pub mod services;
pub mod treatments;
pub mod views;
