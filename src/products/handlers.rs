use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, HeaderName, StatusCode},
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};

use super::dto::{DeleteResponse, ProductInput};
use super::errors::{ApiError, Op};
use super::repo_types::Product;
use crate::{extractors::RequestId, state::AppState};

pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route(
            "/products/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
}

#[instrument(skip(state))]
pub async fn list_products(
    State(state): State<AppState>,
    request_id: RequestId,
) -> Result<Json<Vec<Product>>, ApiError> {
    let products = state
        .products
        .list()
        .await
        .map_err(|e| ApiError::from_service(e, Op::Fetch, &request_id))?;
    Ok(Json(products))
}

#[instrument(skip(state))]
pub async fn get_product(
    State(state): State<AppState>,
    request_id: RequestId,
    Path(raw_id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    let id = parse_id(&raw_id, &request_id)?;
    let product = state
        .products
        .get(id)
        .await
        .map_err(|e| ApiError::from_service(e, Op::Fetch, &request_id))?;
    Ok(Json(product))
}

#[instrument(skip(state, payload))]
pub async fn create_product(
    State(state): State<AppState>,
    request_id: RequestId,
    payload: Result<Json<ProductInput>, JsonRejection>,
) -> Result<(StatusCode, [(HeaderName, String); 1], Json<Product>), ApiError> {
    let input = parse_body(payload, &request_id)?;

    let product = state
        .products
        .create(&input)
        .await
        .map_err(|e| ApiError::from_service(e, Op::Create, &request_id))?;

    info!(product_id = product.id, sku_code = %product.sku_code, "product created");
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/products/{}", product.id))],
        Json(product),
    ))
}

#[instrument(skip(state, payload))]
pub async fn update_product(
    State(state): State<AppState>,
    request_id: RequestId,
    Path(raw_id): Path<String>,
    payload: Result<Json<ProductInput>, JsonRejection>,
) -> Result<Json<Product>, ApiError> {
    let id = parse_id(&raw_id, &request_id)?;
    let input = parse_body(payload, &request_id)?;

    let product = state
        .products
        .update(id, &input)
        .await
        .map_err(|e| ApiError::from_service(e, Op::Update, &request_id))?;
    Ok(Json(product))
}

#[instrument(skip(state))]
pub async fn delete_product(
    State(state): State<AppState>,
    request_id: RequestId,
    Path(raw_id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let id = parse_id(&raw_id, &request_id)?;
    state
        .products
        .delete(id)
        .await
        .map_err(|e| ApiError::from_service(e, Op::Delete, &request_id))?;

    info!(product_id = id, "product deleted");
    Ok(Json(DeleteResponse {
        message: "product deleted",
    }))
}

fn parse_id(raw: &str, request_id: &RequestId) -> Result<i64, ApiError> {
    raw.parse::<i64>().map_err(|_| {
        warn!(id = %raw, "invalid product id");
        ApiError::invalid_id(request_id)
    })
}

/// Unwraps the JSON body and applies the shared validation rules.
fn parse_body(
    payload: Result<Json<ProductInput>, JsonRejection>,
    request_id: &RequestId,
) -> Result<ProductInput, ApiError> {
    let Json(input) = payload.map_err(|e| {
        warn!(error = %e.body_text(), "invalid request body");
        ApiError::invalid_body(request_id)
    })?;
    if let Err(message) = input.validate() {
        warn!(reason = %message, "product validation failed");
        return Err(ApiError::validation(message, request_id));
    }
    Ok(input)
}
