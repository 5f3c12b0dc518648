pub mod report;
pub mod series;
