pub mod export;
pub mod plans;
pub mod report;
pub mod steps;
