pub mod chart;
pub mod dashboard;
pub mod debug;
pub mod state;
pub mod theme;

pub use dashboard::DashboardWidget;
pub use state::UiState;
