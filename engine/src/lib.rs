// Engine library root
// Indicator, return and drawdown analytics plus the dashboard aggregator built on them.

pub mod analysis;
pub mod config;
pub mod data;
pub mod error;
pub mod indicators;
pub mod logging;
pub mod services;

pub use error::EngineError;
pub use services::DashboardService;
