//! Authentication primitives.
//!
//! Identities come from the external auth provider; this service only
//! validates the bearer tokens it issues.
//!
//! - [`jwt`] -- HS256 access-token validation and signing.

pub mod jwt;
