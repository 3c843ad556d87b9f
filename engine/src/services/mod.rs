// Services layer: assembles reports from price sources
pub mod dashboard_service;

pub use dashboard_service::DashboardService;
