// Domain layer - Readings, window statistics and chart geometry
pub mod chart;
pub mod measurement;
pub mod summary;
