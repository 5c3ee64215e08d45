use std::sync::Arc;

use envelope_domain::services::telemetry::TelemetryGuard;
use envelope_gateway::ValidationGateway;

#[derive(Clone)]
pub struct AppState {
    gateway: Arc<ValidationGateway>,
    telemetry: TelemetryGuard,
}

impl AppState {
    pub fn new(gateway: Arc<ValidationGateway>, telemetry: TelemetryGuard) -> Self {
        Self { gateway, telemetry }
    }

    pub fn gateway(&self) -> &ValidationGateway {
        self.gateway.as_ref()
    }

    pub fn telemetry(&self) -> &TelemetryGuard {
        &self.telemetry
    }
}
