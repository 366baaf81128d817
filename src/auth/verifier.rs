// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWT signature and claim verification.

use std::sync::Arc;

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::{AuthError, ClaimSet, JwksManager};
use crate::config::AuthConfig;

/// Verifies access tokens against the identity provider's key set.
///
/// Issuer, audience and algorithms are pinned at construction.
#[derive(Clone)]
pub struct TokenVerifier {
    jwks: JwksManager,
    validation: Arc<Validation>,
}

impl TokenVerifier {
    pub fn new(config: &AuthConfig, jwks: JwksManager) -> Self {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.algorithms = config.algorithms.clone();
        validation.set_audience(&[&config.audience]);
        validation.set_issuer(&[config.issuer()]);
        validation.set_required_spec_claims(&["exp", "iss", "aud"]);
        validation.leeway = config.leeway;

        Self {
            jwks,
            validation: Arc::new(validation),
        }
    }

    pub fn jwks(&self) -> &JwksManager {
        &self.jwks
    }

    /// Verify `token` and return its claims.
    ///
    /// The key is selected by the header's `kid`; the signature is checked
    /// before any claim is looked at. The payload is decoded untyped first so
    /// that a missing `iss`/`aud` surfaces as a claim failure rather than a
    /// decode failure.
    pub async fn verify(&self, token: &str) -> Result<ClaimSet, AuthError> {
        let header = decode_header(token).map_err(|_| AuthError::TokenUnparseable)?;
        let kid = header
            .kid
            .as_deref()
            .ok_or(AuthError::MalformedHeader("token header has no key id"))?;

        let jwk = self.jwks.find_key(kid).await?;
        debug!(kid, "signing key selected");

        let key = DecodingKey::from_jwk(&jwk).map_err(|_| AuthError::TokenUnparseable)?;

        let token_data = decode::<Value>(token, &key, &self.validation).map_err(|e| {
            debug!(kid, error = %e, "token rejected");
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                ErrorKind::InvalidAudience | ErrorKind::InvalidIssuer => AuthError::InvalidClaims,
                ErrorKind::MissingRequiredClaim(claim) if claim == "iss" || claim == "aud" => {
                    AuthError::InvalidClaims
                }
                _ => AuthError::TokenUnparseable,
            }
        })?;

        let claims = ClaimSet::deserialize(token_data.claims).map_err(|e| {
            debug!(kid, error = %e, "verified payload has unexpected claim types");
            AuthError::TokenUnparseable
        })?;

        debug!(
            kid,
            sub = claims.subject(),
            expires_at = ?claims.expires_at(),
            "token verified"
        );
        Ok(claims)
    }
}
