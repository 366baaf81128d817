// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! The auth guard: header extraction, token verification and permission
//! check composed into one gate.

use std::future::Future;

use axum::http::HeaderMap;
use tracing::{debug, warn};

use super::{
    extractor::extract_bearer_token, permissions::check_permission, AuthError, ClaimSet,
    JwksManager, TokenVerifier,
};
use crate::config::AuthConfig;

/// Gate run before every protected operation.
///
/// Holds no per-request state; clones share the JWKS cache and can be used
/// from any number of concurrent requests.
#[derive(Clone)]
pub struct AuthGuard {
    verifier: TokenVerifier,
}

impl AuthGuard {
    /// Guard backed by the identity provider's remote JWKS.
    pub fn new(config: &AuthConfig) -> Result<Self, AuthError> {
        Ok(Self::with_key_source(config, JwksManager::remote(config)?))
    }

    /// Guard backed by an explicit key source.
    pub fn with_key_source(config: &AuthConfig, jwks: JwksManager) -> Self {
        Self {
            verifier: TokenVerifier::new(config, jwks),
        }
    }

    pub fn jwks(&self) -> &JwksManager {
        self.verifier.jwks()
    }

    /// Run the full pipeline and return the verified claims.
    ///
    /// Fails on the first stage that rejects the request.
    pub async fn authorize(
        &self,
        headers: &HeaderMap,
        permission: &str,
    ) -> Result<ClaimSet, AuthError> {
        let result = self.run(headers, permission).await;

        match &result {
            Ok(claims) => debug!(permission, sub = claims.subject(), "request authorized"),
            Err(e) => warn!(
                permission,
                code = e.error_code(),
                status = e.status_code().as_u16(),
                "request rejected"
            ),
        }

        result
    }

    async fn run(&self, headers: &HeaderMap, permission: &str) -> Result<ClaimSet, AuthError> {
        let token = extract_bearer_token(headers)?;
        let claims = self.verifier.verify(token).await?;
        check_permission(permission, &claims)?;
        Ok(claims)
    }

    /// Run `operation` with the verified claims if the request is authorized.
    ///
    /// `operation` is never invoked when any stage fails.
    pub async fn protect<F, Fut, T>(
        &self,
        headers: &HeaderMap,
        permission: &str,
        operation: F,
    ) -> Result<T, AuthError>
    where
        F: FnOnce(ClaimSet) -> Fut,
        Fut: Future<Output = T>,
    {
        let claims = self.authorize(headers, permission).await?;
        Ok(operation(claims).await)
    }
}
