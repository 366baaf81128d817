// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Coffee Shop Server - Drinks Menu API
//!
//! REST API for a coffee shop's drinks menu. Reading the public menu is
//! open; detailed recipes and all changes require an Auth0 access token
//! carrying the matching permission.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - JWT verification and permission checks (Auth0 JWKS)
//! - `config` - Environment configuration
//! - `store` - In-memory drink store

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
pub mod store;
