// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Auth0 JWT authentication and permission checks for the drinks API.
//!
//! ## Auth Flow
//!
//! 1. Frontend authenticates the user with Auth0
//! 2. Frontend sends `Authorization: Bearer <access token>`
//! 3. Server:
//!    - Extracts the bearer token from the header
//!    - Fetches the tenant JWKS via HTTPS and selects the key named by `kid`
//!    - Verifies signature, expiry, issuer (`https://<domain>/`), audience
//!    - Checks the endpoint's permission against the `permissions` claim
//!
//! Any stage failing rejects the request with an [`AuthError`]; the handler
//! never runs.
//!
//! ## Security
//!
//! - Signature verification precedes trusting any claim
//! - Only RSA algorithms from configuration are accepted
//! - JWKS is cached with TTL; an unknown `kid` forces a refresh
//! - No clock skew tolerance by default

pub mod claims;
pub mod error;
pub mod extractor;
pub mod guard;
pub mod jwks;
pub mod middleware;
pub mod permissions;
pub mod verifier;

#[cfg(test)]
pub(crate) mod test_support;

pub use claims::{Audience, ClaimSet};
pub use error::AuthError;
pub use extractor::extract_bearer_token;
pub use guard::AuthGuard;
pub use jwks::JwksManager;
pub use middleware::{require_permission, PermissionGate};
pub use permissions::check_permission;
pub use verifier::TokenVerifier;
