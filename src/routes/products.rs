use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderName, StatusCode, header},
    routing::get,
};

use crate::{
    dto::products::ProductList,
    error::AppResult,
    middleware::{auth::AuthUser, json::ApiJson, path::ApiPath},
    models::Product,
    patch::PatchOperation,
    response::ApiResponse,
    routes::params::ListQuery,
    services::product_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/{id}",
            get(get_product)
                .put(replace_product)
                .patch(patch_product)
                .delete(delete_product),
        )
        .route("/order/{order_id}", get(list_products_for_order))
}

#[utoipa::path(
    get,
    path = "/api/products",
    params(ListQuery),
    responses(
        (status = 200, description = "List products", body = ApiResponse<ProductList>),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 404, description = "No products"),
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn list_products(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let resp = product_service::list_products(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(("id" = i16, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Get product", body = ApiResponse<Product>),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 404, description = "Product not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    _user: AuthUser,
    ApiPath(id): ApiPath<i16>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let resp = product_service::get_product(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/products/order/{order_id}",
    params(("order_id" = i16, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Products on the order's lines", body = ApiResponse<ProductList>),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 404, description = "Order has no lines"),
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn list_products_for_order(
    State(state): State<AppState>,
    _user: AuthUser,
    ApiPath(order_id): ApiPath<i16>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let resp = product_service::list_products_for_order(&state, order_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/products",
    request_body = Product,
    responses(
        (status = 201, description = "Product created", body = ApiResponse<Product>),
        (status = 400, description = "Invalid product"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 409, description = "Product ID already taken"),
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(payload): ApiJson<Product>,
) -> AppResult<(StatusCode, [(HeaderName, String); 1], Json<ApiResponse<Product>>)> {
    let resp = product_service::create_product(&state, payload).await?;
    let location = resp
        .data
        .as_ref()
        .map(|product| format!("/api/products/{}", product.product_id))
        .unwrap_or_default();
    tracing::debug!(subject = %user.subject, %location, "product created");
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/products/{id}",
    params(("id" = i16, Path, description = "Product ID")),
    request_body = Product,
    responses(
        (status = 204, description = "Product replaced"),
        (status = 400, description = "ID mismatch or invalid product"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 404, description = "Product not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn replace_product(
    State(state): State<AppState>,
    _user: AuthUser,
    ApiPath(id): ApiPath<i16>,
    ApiJson(payload): ApiJson<Product>,
) -> AppResult<StatusCode> {
    product_service::replace_product(&state, id, payload).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    patch,
    path = "/api/products/{id}",
    params(("id" = i16, Path, description = "Product ID")),
    request_body = Vec<PatchOperation>,
    responses(
        (status = 204, description = "Product patched"),
        (status = 400, description = "Invalid patch document"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 404, description = "Product not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn patch_product(
    State(state): State<AppState>,
    _user: AuthUser,
    ApiPath(id): ApiPath<i16>,
    ApiJson(operations): ApiJson<Vec<PatchOperation>>,
) -> AppResult<StatusCode> {
    product_service::patch_product(&state, id, operations).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    params(("id" = i16, Path, description = "Product ID")),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 404, description = "Product not found"),
        (status = 409, description = "Product still used by order lines"),
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    _user: AuthUser,
    ApiPath(id): ApiPath<i16>,
) -> AppResult<StatusCode> {
    product_service::delete_product(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
