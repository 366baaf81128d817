// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::{HeaderName, HeaderValue, Request},
    routing::{get, patch},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use uuid::Uuid;

use crate::{
    models::{
        CreateDrinkRequest, DeleteDrinkResponse, Drink, DrinkDetailResponse, DrinkListResponse,
        DrinkShort, Ingredient, IngredientShort, UpdateDrinkRequest,
    },
    state::AppState,
};

pub mod drinks;
pub mod health;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Tags each request with a UUID v4 unless the caller already sent one.
#[derive(Clone, Copy, Default)]
struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

pub fn router(state: AppState) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    let routes = Router::new()
        .route(
            "/drinks",
            get(drinks::list_drinks).post(drinks::create_drink),
        )
        .route("/drinks-detail", get(drinks::list_drinks_detail))
        .route(
            "/drinks/{drink_id}",
            patch(drinks::update_drink).delete(drinks::delete_drink),
        )
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(state);

    Router::new()
        .merge(routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        drinks::list_drinks,
        drinks::list_drinks_detail,
        drinks::create_drink,
        drinks::update_drink,
        drinks::delete_drink,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            Drink,
            DrinkShort,
            Ingredient,
            IngredientShort,
            CreateDrinkRequest,
            UpdateDrinkRequest,
            DrinkListResponse,
            DrinkDetailResponse,
            DeleteDrinkResponse,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Drinks", description = "Drinks menu"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
struct ApiDoc;
