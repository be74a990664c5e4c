//! SeaORM entities backing [`crate::store::db`].

pub mod oauth_app;
pub mod oauth_client_secret;
pub mod oauth_token;
