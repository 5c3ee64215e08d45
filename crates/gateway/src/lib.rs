//! Credential-caching gateway in front of the USPS address validation API.
//!
//! The `ValidationBackend` trait is the seam between orchestration and the
//! wire: production uses the reqwest-backed [`UspsClient`], tests substitute
//! a stub so the gateway logic (token caching, fan-out, error
//! classification) is exercised without a network.

pub mod client;
pub mod gateway;
pub mod types;

pub use client::{MisconfiguredBackend, UspsClient, ValidationBackend};
pub use gateway::{GatewayError, GatewayErrorKind, ValidationGateway};
pub use types::{AddressQuery, TokenGrant, UspsValidationResponse, ValidationReport};
