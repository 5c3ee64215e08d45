//! Domain-level building blocks shared by the API and gateway crates:
//! address records, the USPS-style line normalizer, environment-driven
//! configuration, and service helpers (credential cache + telemetry).

pub mod config;
pub mod format;
pub mod model;
pub mod services;

pub use format::{normalize_address, normalize_line};
pub use model::{AddressRecord, FormattedAddress};
