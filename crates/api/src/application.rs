use std::{path::Path, sync::Arc};

#[cfg(unix)]
use std::fs;

use actix_web::{middleware::Logger, web, App, HttpServer};

use envelope_domain::config::{ApiConfig, ConfigError, UspsConfig};
use envelope_domain::services::telemetry::{init_telemetry, TelemetryConfig, TelemetryError};
use envelope_gateway::{MisconfiguredBackend, UspsClient, ValidationBackend, ValidationGateway};
use thiserror::Error;
use tracing::warn;

use crate::{
    handlers::{format_address_handler, metrics_handler, validate_address_handler},
    state::AppState,
};

pub async fn run() -> Result<(), BootstrapError> {
    let config = ApiConfig::load_from_env()?;

    let telemetry_config = TelemetryConfig::from_env("API");
    let telemetry = init_telemetry(&telemetry_config)?;

    // Missing USPS credentials do not block boot: local formatting keeps
    // working and validation requests surface the configuration failure.
    let backend: Arc<dyn ValidationBackend> = match UspsConfig::load_from_env() {
        Ok(usps_config) => Arc::new(UspsClient::new(usps_config)),
        Err(err @ ConfigError::MissingVar { .. }) => {
            warn!(error = %err, "usps credentials not configured; validation disabled");
            Arc::new(MisconfiguredBackend::new(err.to_string()))
        }
        Err(err) => return Err(BootstrapError::Config(err)),
    };
    let gateway = Arc::new(ValidationGateway::with_backend(backend));

    let state = AppState::new(gateway, telemetry);

    let mut server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(Logger::default())
            .route(
                "/api/v1/validate-address",
                web::post().to(validate_address_handler),
            )
            .route(
                "/api/v1/format-address",
                web::post().to(format_address_handler),
            )
            .route("/metrics", web::get().to(metrics_handler))
    });

    #[cfg(unix)]
    {
        if let Some(socket) = config.api_unix_socket() {
            cleanup_socket(socket)?;
            server = server.bind_uds(socket)?;
        } else {
            server = server.bind(config.api_bind_address())?;
        }
    }

    #[cfg(not(unix))]
    {
        if let Some(socket) = config.api_unix_socket() {
            return Err(BootstrapError::Io(std::io::Error::other(format!(
                "unix socket '{socket}' requested but this platform does not support it"
            ))));
        }
        server = server.bind(config.api_bind_address())?;
    }

    server.run().await?;

    Ok(())
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// Stale socket files from a previous unclean shutdown make bind fail, so
// remove them before binding.
#[cfg(unix)]
fn cleanup_socket(path: &str) -> std::io::Result<()> {
    let socket_path = Path::new(path);
    if socket_path.exists() {
        fs::remove_file(socket_path)?;
    }
    Ok(())
}

#[cfg(not(unix))]
fn cleanup_socket(_path: &str) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    #[cfg(unix)]
    #[actix_web::test]
    async fn cleanup_socket_removes_stale_file() {
        use super::cleanup_socket;

        let path = std::env::temp_dir().join(format!(
            "envelope-test-{}-{}.sock",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::SystemTime::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        std::fs::write(&path, b"stub").expect("write socket file");
        cleanup_socket(path.to_str().unwrap()).expect("cleanup succeeds");
        assert!(!path.exists());
    }
}
