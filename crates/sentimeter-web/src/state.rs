//! Shared handler state.

use std::sync::Arc;

use sentimeter_core::{DashboardConfig, DashboardService};

#[derive(Clone)]
pub struct AppState {
    pub service: DashboardService,
    pub config: Arc<DashboardConfig>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        let service = config.build_service();
        Self::with_service(config, service)
    }

    pub fn with_service(config: DashboardConfig, service: DashboardService) -> Self {
        Self {
            service,
            config: Arc::new(config),
        }
    }
}
