//! Shared service helpers such as credential caching and telemetry wiring.

pub mod credential;
pub mod telemetry;

pub use credential::*;
pub use telemetry::*;
