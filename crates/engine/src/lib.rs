//! An OAuth2 authorization-code grant engine.
//!
//! Manages client applications, their rotating client secrets, and the
//! issuance, exchange and revocation of authorization codes and access tokens.
//! Persistence sits behind the [`store`] traits; HTTP transport is left to the
//! embedding service.

pub mod config;
pub mod entity;
pub mod error;
pub mod generate;
pub mod manager;
pub mod model;
pub mod store;
pub mod telemetry;

pub use error::{ErrorKind, OAuthError};
pub use manager::OAuthManager;
