// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authorization middleware for Axum.
//!
//! Middleware-based alternative to the per-handler extractors, for guarding a
//! whole router subtree with one permission. Verified claims are stored in
//! the request extensions, where extractors and handlers pick them up.
//!
//! ```rust,ignore
//! let admin = Router::new()
//!     .route("/drinks/{drink_id}", delete(delete_drink))
//!     .route_layer(axum::middleware::from_fn_with_state(
//!         guard.gate("delete:drinks"),
//!         require_permission,
//!     ));
//! ```

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::AuthGuard;

/// Middleware state: a guard and the permission it enforces.
#[derive(Clone)]
pub struct PermissionGate {
    guard: AuthGuard,
    permission: &'static str,
}

impl PermissionGate {
    pub fn permission(&self) -> &'static str {
        self.permission
    }
}

impl AuthGuard {
    /// Middleware state enforcing `permission` with this guard.
    pub fn gate(&self, permission: &'static str) -> PermissionGate {
        PermissionGate {
            guard: self.clone(),
            permission,
        }
    }
}

/// Reject the request unless it carries a token granting the gate's permission.
pub async fn require_permission(
    State(gate): State<PermissionGate>,
    mut request: Request,
    next: Next,
) -> Response {
    match gate.guard.authorize(request.headers(), gate.permission()).await {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}
