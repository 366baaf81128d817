// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Authentication and authorization error type.
///
/// Every stage of the auth pipeline fails with one of these. They are
/// request-scoped and terminal for the request that raised them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No authorization header present
    MissingHeader,
    /// Authorization header is not `Bearer <token>`, or the token header has no `kid`
    MalformedHeader(&'static str),
    /// JWKS could not be fetched or parsed
    KeySetUnavailable(String),
    /// No key in the JWKS matches the token's `kid`
    KeyNotFound,
    /// Token `exp` is in the past
    TokenExpired,
    /// Audience or issuer did not match
    InvalidClaims,
    /// Any other decode or signature failure
    TokenUnparseable,
    /// Claims carry no `permissions` array
    PermissionsClaimMissing,
    /// Required permission is not granted
    PermissionDenied,
}

#[derive(Serialize)]
struct AuthErrorBody {
    success: bool,
    error: u16,
    message: String,
    code: &'static str,
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingHeader => "missing_header",
            AuthError::MalformedHeader(_) => "malformed_header",
            AuthError::KeySetUnavailable(_) => "key_set_unavailable",
            AuthError::KeyNotFound => "key_not_found",
            AuthError::TokenExpired => "token_expired",
            AuthError::InvalidClaims => "invalid_claims",
            AuthError::TokenUnparseable => "token_unparseable",
            AuthError::PermissionsClaimMissing => "permissions_claim_missing",
            AuthError::PermissionDenied => "permission_denied",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingHeader
            | AuthError::MalformedHeader(_)
            | AuthError::KeyNotFound
            | AuthError::TokenExpired
            | AuthError::InvalidClaims
            | AuthError::TokenUnparseable => StatusCode::UNAUTHORIZED,
            AuthError::KeySetUnavailable(_) => StatusCode::BAD_REQUEST,
            AuthError::PermissionsClaimMissing | AuthError::PermissionDenied => {
                StatusCode::FORBIDDEN
            }
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingHeader => write!(f, "Authorization header is expected"),
            AuthError::MalformedHeader(reason) => write!(f, "Authorization header is malformed: {reason}"),
            AuthError::KeySetUnavailable(msg) => {
                write!(f, "Unable to retrieve signing keys: {msg}")
            }
            AuthError::KeyNotFound => write!(f, "Unable to find the appropriate key"),
            AuthError::TokenExpired => write!(f, "Token expired"),
            AuthError::InvalidClaims => {
                write!(f, "Incorrect claims, please check the audience and issuer")
            }
            AuthError::TokenUnparseable => write!(f, "Unable to parse authentication token"),
            AuthError::PermissionsClaimMissing => {
                write!(f, "Permissions not included in token")
            }
            AuthError::PermissionDenied => write!(f, "Permission not found"),
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(AuthErrorBody {
            success: false,
            error: status.as_u16(),
            message: self.to_string(),
            code: self.error_code(),
        });
        (status, body).into_response()
    }
}
