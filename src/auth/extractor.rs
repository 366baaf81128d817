// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bearer token extraction and Axum extractors for protected handlers.
//!
//! Declare one extractor per required permission and take it as a handler
//! argument; the handler only runs when the request carries a valid token
//! granting that permission:
//!
//! ```rust,ignore
//! permission_guard!(pub PostDrinks; "post:drinks");
//!
//! async fn create_drink(PostDrinks(claims): PostDrinks) -> impl IntoResponse {
//!     // claims is the verified ClaimSet
//! }
//! ```

use axum::http::{header::AUTHORIZATION, request::Parts, HeaderMap};
use tracing::debug;

use super::{permissions::check_permission, AuthError, AuthGuard, ClaimSet};

/// Pull the token out of an `Authorization: Bearer <token>` header.
///
/// The scheme is matched case-insensitively and the token is returned
/// verbatim.
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingHeader)?
        .to_str()
        .map_err(|_| AuthError::MalformedHeader("header is not valid ASCII"))?;

    let mut parts = value.split_whitespace();
    let (scheme, token) = match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) => (scheme, token),
        _ => return Err(AuthError::MalformedHeader("expected 'Bearer <token>'")),
    };

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::MalformedHeader("authorization scheme must be Bearer"));
    }

    Ok(token)
}

/// Authorize a request for `permission`.
///
/// Claims already verified by [`require_permission`](super::middleware::require_permission)
/// are reused from the request extensions; otherwise the full guard runs.
pub async fn authorize_parts(
    parts: &mut Parts,
    guard: &AuthGuard,
    permission: &str,
) -> Result<ClaimSet, AuthError> {
    if let Some(claims) = parts.extensions.get::<ClaimSet>() {
        debug!(permission, "using claims verified by middleware");
        check_permission(permission, claims)?;
        return Ok(claims.clone());
    }

    guard.authorize(&parts.headers, permission).await
}

/// Declare an extractor that requires a permission.
///
/// The state must provide an [`AuthGuard`] through `FromRef`.
#[macro_export]
macro_rules! permission_guard {
    ($(#[$meta:meta])* $vis:vis $name:ident; $permission:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        $vis struct $name(pub $crate::auth::ClaimSet);

        impl $name {
            /// Permission this extractor requires.
            pub const PERMISSION: &'static str = $permission;
        }

        impl<S> ::axum::extract::FromRequestParts<S> for $name
        where
            $crate::auth::AuthGuard: ::axum::extract::FromRef<S>,
            S: Send + Sync,
        {
            type Rejection = $crate::auth::AuthError;

            async fn from_request_parts(
                parts: &mut ::axum::http::request::Parts,
                state: &S,
            ) -> Result<Self, Self::Rejection> {
                let guard = <$crate::auth::AuthGuard as ::axum::extract::FromRef<S>>::from_ref(state);
                $crate::auth::extractor::authorize_parts(parts, &guard, Self::PERMISSION)
                    .await
                    .map(Self)
            }
        }
    };
}
