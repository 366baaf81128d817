// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response types for the drinks API. All types derive
//! `Serialize`/`Deserialize` and `ToSchema` for JSON handling and OpenAPI
//! documentation.
//!
//! ## Representations
//!
//! A drink is exposed in two forms:
//!
//! - **short**: ingredient colors and parts only, for the public menu
//! - **long**: the full recipe including ingredient names, for staff

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// =============================================================================
// Drink Models
// =============================================================================

/// One ingredient of a recipe.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Ingredient {
    /// Ingredient name (e.g. "milk").
    pub name: String,
    /// Display color used to draw the cup.
    pub color: String,
    /// Relative amount.
    pub parts: u32,
}

/// Ingredient without its name, as shown on the public menu.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct IngredientShort {
    pub color: String,
    pub parts: u32,
}

/// A drink on the menu, in its long form.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Drink {
    /// Unique identifier.
    pub id: u64,
    /// Unique title.
    pub title: String,
    /// Ingredients in pour order.
    pub recipe: Vec<Ingredient>,
}

/// A drink in its short form.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct DrinkShort {
    pub id: u64,
    pub title: String,
    pub recipe: Vec<IngredientShort>,
}

impl Drink {
    pub fn short(&self) -> DrinkShort {
        DrinkShort {
            id: self.id,
            title: self.title.clone(),
            recipe: self
                .recipe
                .iter()
                .map(|i| IngredientShort {
                    color: i.color.clone(),
                    parts: i.parts,
                })
                .collect(),
        }
    }
}

/// A drink not yet stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDrink {
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

// =============================================================================
// Requests
// =============================================================================

/// Body of `POST /drinks`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateDrinkRequest {
    pub title: Option<String>,
    pub recipe: Option<Vec<Ingredient>>,
}

/// Body of `PATCH /drinks/{drink_id}`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateDrinkRequest {
    pub title: Option<String>,
    pub recipe: Option<Vec<Ingredient>>,
}

// =============================================================================
// Responses
// =============================================================================

/// Public menu listing.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct DrinkListResponse {
    pub success: bool,
    pub drinks: Vec<DrinkShort>,
}

/// Long-form drinks (detail listing, or the single drink created/updated).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct DrinkDetailResponse {
    pub success: bool,
    pub drinks: Vec<Drink>,
}

/// Response of `DELETE /drinks/{drink_id}`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct DeleteDrinkResponse {
    pub success: bool,
    /// Identifier of the deleted drink.
    pub delete: u64,
}
