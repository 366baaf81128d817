// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Permission checks against verified claims.
//!
//! Permissions are Auth0 RBAC strings such as `post:drinks`, carried in the
//! `permissions` array of the access token. Matching is exact: there are no
//! wildcards and no hierarchy between permissions.

use super::{AuthError, ClaimSet};

/// Check that `claims` grants `required`.
pub fn check_permission(required: &str, claims: &ClaimSet) -> Result<(), AuthError> {
    let permissions = claims
        .permissions
        .as_ref()
        .ok_or(AuthError::PermissionsClaimMissing)?;

    if permissions.iter().any(|granted| granted == required) {
        Ok(())
    } else {
        Err(AuthError::PermissionDenied)
    }
}
