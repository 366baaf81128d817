// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Decoded JWT claims.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// The `aud` claim, which Auth0 emits either as a string or as an array
/// (when the token is also valid for the `/userinfo` endpoint).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Audience {
    Single(String),
    Many(Vec<String>),
}

/// Claims of a verified access token.
///
/// Only produced by [`TokenVerifier`](super::TokenVerifier) after the
/// signature, issuer, audience and expiry checks have passed. Claims the
/// pipeline does not enforce are read leniently: a `permissions` claim that
/// is not an array reads as absent, and NumericDates may be fractional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimSet {
    /// Issuer (`https://<domain>/`)
    pub iss: String,

    /// Audience
    pub aud: Audience,

    /// Expiration timestamp
    #[serde(deserialize_with = "numeric_date")]
    pub exp: i64,

    /// Subject (Auth0 user ID)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Issued at timestamp
    #[serde(
        default,
        deserialize_with = "optional_numeric_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub iat: Option<i64>,

    /// Granted permissions (Auth0 RBAC with "Add Permissions in the Access Token")
    #[serde(
        default,
        deserialize_with = "permissions_array",
        skip_serializing_if = "Option::is_none"
    )]
    pub permissions: Option<Vec<String>>,

    /// Every other claim, kept as-is
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl ClaimSet {
    /// Token expiry as a timestamp, if representable.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// Subject for log lines; `-` when the token has none.
    pub fn subject(&self) -> &str {
        self.sub.as_deref().unwrap_or("-")
    }
}

/// RFC 7519 NumericDate: seconds, possibly with a fractional part.
fn numeric_date<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(f64::deserialize(deserializer)?.trunc() as i64)
}

fn optional_numeric_date<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(Value::as_f64)
        .map(|secs| secs.trunc() as i64))
}

/// Only an array counts as a permissions claim; non-string entries are skipped.
fn permissions_array<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => Ok(Some(
            items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(permission) => Some(permission),
                    _ => None,
                })
                .collect(),
        )),
        _ => Ok(None),
    }
}
