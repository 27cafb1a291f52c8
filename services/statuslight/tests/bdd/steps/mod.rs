//! BDD step definitions for the status light service

pub mod aggregation_steps;
pub mod indicator_steps;
pub mod parsing_steps;
pub mod polling_steps;
