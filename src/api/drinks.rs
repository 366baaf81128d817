// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Json,
};
use tracing::{debug, info};

use crate::{
    auth::ClaimSet,
    error::ApiError,
    models::{
        CreateDrinkRequest, DeleteDrinkResponse, DrinkDetailResponse, DrinkListResponse,
        Ingredient, NewDrink, UpdateDrinkRequest,
    },
    permission_guard,
    state::AppState,
};

permission_guard!(
    /// Requires `get:drinks-detail`.
    pub GetDrinksDetail; "get:drinks-detail"
);
permission_guard!(
    /// Requires `post:drinks`.
    pub PostDrinks; "post:drinks"
);
permission_guard!(
    /// Requires `patch:drinks`.
    pub PatchDrinks; "patch:drinks"
);
permission_guard!(
    /// Requires `delete:drinks`.
    pub DeleteDrinks; "delete:drinks"
);

#[utoipa::path(
    get,
    path = "/drinks",
    tag = "Drinks",
    responses((status = 200, body = DrinkListResponse))
)]
pub async fn list_drinks(State(state): State<AppState>) -> Json<DrinkListResponse> {
    let store = state.store.read().await;
    Json(DrinkListResponse {
        success: true,
        drinks: store.list_all().iter().map(|d| d.short()).collect(),
    })
}

#[utoipa::path(
    get,
    path = "/drinks-detail",
    tag = "Drinks",
    responses(
        (status = 200, body = DrinkDetailResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Token lacks get:drinks-detail")
    )
)]
pub async fn list_drinks_detail(
    GetDrinksDetail(claims): GetDrinksDetail,
    State(state): State<AppState>,
) -> Json<DrinkDetailResponse> {
    debug!(sub = claims.subject(), "listing drink details");
    let store = state.store.read().await;
    Json(DrinkDetailResponse {
        success: true,
        drinks: store.list_all(),
    })
}

#[utoipa::path(
    post,
    path = "/drinks",
    request_body = CreateDrinkRequest,
    tag = "Drinks",
    responses(
        (status = 200, body = DrinkDetailResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Token lacks post:drinks"),
        (status = 422, description = "Missing title or recipe, or duplicate title")
    )
)]
pub async fn create_drink(
    PostDrinks(claims): PostDrinks,
    State(state): State<AppState>,
    body: Result<Json<CreateDrinkRequest>, JsonRejection>,
) -> Result<Json<DrinkDetailResponse>, ApiError> {
    let Json(request) = body?;
    let title = require_title(request.title)?
        .ok_or_else(|| ApiError::unprocessable("title is required"))?;
    let recipe = require_recipe(request.recipe)?
        .ok_or_else(|| ApiError::unprocessable("recipe is required"))?;

    let drink = {
        let mut store = state.store.write().await;
        store.insert(NewDrink { title, recipe })?
    };

    log_change("created", drink.id, &claims);
    Ok(Json(DrinkDetailResponse {
        success: true,
        drinks: vec![drink],
    }))
}

#[utoipa::path(
    patch,
    path = "/drinks/{drink_id}",
    params(
        ("drink_id" = u64, Path, description = "Identifier of the drink to update")
    ),
    request_body = UpdateDrinkRequest,
    tag = "Drinks",
    responses(
        (status = 200, body = DrinkDetailResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 400, description = "Drink identifier is not a number"),
        (status = 403, description = "Token lacks patch:drinks"),
        (status = 404, description = "No drink with this identifier"),
        (status = 422, description = "Nothing to update, or duplicate title")
    )
)]
pub async fn update_drink(
    PatchDrinks(claims): PatchDrinks,
    drink_id: Result<Path<u64>, PathRejection>,
    State(state): State<AppState>,
    body: Result<Json<UpdateDrinkRequest>, JsonRejection>,
) -> Result<Json<DrinkDetailResponse>, ApiError> {
    let Path(drink_id) = drink_id?;
    let Json(request) = body?;
    let title = require_title(request.title)?;
    let recipe = require_recipe(request.recipe)?;
    if title.is_none() && recipe.is_none() {
        return Err(ApiError::unprocessable("title or recipe is required"));
    }

    let drink = {
        let mut store = state.store.write().await;
        let mut drink = store
            .find_by_id(drink_id)
            .ok_or_else(|| ApiError::not_found("resource not found"))?;
        if let Some(title) = title {
            drink.title = title;
        }
        if let Some(recipe) = recipe {
            drink.recipe = recipe;
        }
        store.update(drink)?
    };

    log_change("updated", drink.id, &claims);
    Ok(Json(DrinkDetailResponse {
        success: true,
        drinks: vec![drink],
    }))
}

#[utoipa::path(
    delete,
    path = "/drinks/{drink_id}",
    params(
        ("drink_id" = u64, Path, description = "Identifier of the drink to delete")
    ),
    tag = "Drinks",
    responses(
        (status = 200, body = DeleteDrinkResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 400, description = "Drink identifier is not a number"),
        (status = 403, description = "Token lacks delete:drinks"),
        (status = 404, description = "No drink with this identifier")
    )
)]
pub async fn delete_drink(
    DeleteDrinks(claims): DeleteDrinks,
    drink_id: Result<Path<u64>, PathRejection>,
    State(state): State<AppState>,
) -> Result<Json<DeleteDrinkResponse>, ApiError> {
    let Path(drink_id) = drink_id?;
    {
        let mut store = state.store.write().await;
        store.delete(drink_id)?;
    }

    log_change("deleted", drink_id, &claims);
    Ok(Json(DeleteDrinkResponse {
        success: true,
        delete: drink_id,
    }))
}

/// A present title must not be blank.
fn require_title(title: Option<String>) -> Result<Option<String>, ApiError> {
    match title.map(|t| t.trim().to_string()) {
        Some(t) if t.is_empty() => Err(ApiError::unprocessable("title must not be empty")),
        other => Ok(other),
    }
}

/// A present recipe needs at least one ingredient, each with a name and parts.
fn require_recipe(recipe: Option<Vec<Ingredient>>) -> Result<Option<Vec<Ingredient>>, ApiError> {
    match recipe {
        Some(r) if r.is_empty() => Err(ApiError::unprocessable("recipe must not be empty")),
        Some(r) if r.iter().any(|i| i.name.trim().is_empty() || i.parts == 0) => Err(
            ApiError::unprocessable("every ingredient needs a name and at least one part"),
        ),
        other => Ok(other),
    }
}

fn log_change(action: &str, drink_id: u64, claims: &ClaimSet) {
    info!(drink_id, sub = claims.subject(), "drink {action}");
}
