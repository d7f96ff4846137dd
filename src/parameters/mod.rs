//! Experimental parameters shared by studies and treatments: people,
//! suppliers, diets, housing and interventions.
pub mod diets;
pub mod environments;
pub mod implantations;
pub mod pharmaceuticals;
pub mod researchers;
#[cfg(test)]
mod tests;
pub mod transplantations;
pub mod vendors;
pub mod views;
