use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderName, StatusCode, header},
    routing::get,
};

use crate::{
    dto::orders::OrderList,
    error::AppResult,
    middleware::{auth::AuthUser, json::ApiJson, path::ApiPath},
    models::Order,
    patch::PatchOperation,
    response::ApiResponse,
    routes::params::ListQuery,
    services::order_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders).post(create_order))
        .route(
            "/{id}",
            get(get_order)
                .put(replace_order)
                .patch(patch_order)
                .delete(delete_order),
        )
}

#[utoipa::path(
    get,
    path = "/api/orders",
    params(ListQuery),
    responses(
        (status = 200, description = "List orders with their lines", body = ApiResponse<OrderList>),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 404, description = "No orders"),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = order_service::list_orders(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    params(("id" = i16, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Get order with lines", body = ApiResponse<Order>),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 404, description = "Order not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    _user: AuthUser,
    ApiPath(id): ApiPath<i16>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = order_service::get_order(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = Order,
    responses(
        (status = 201, description = "Order created with its lines", body = ApiResponse<Order>),
        (status = 400, description = "Invalid order"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 404, description = "Referenced customer or product not found"),
        (status = 409, description = "Order ID already taken"),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn create_order(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(payload): ApiJson<Order>,
) -> AppResult<(StatusCode, [(HeaderName, String); 1], Json<ApiResponse<Order>>)> {
    let resp = order_service::create_order(&state, payload).await?;
    let location = resp
        .data
        .as_ref()
        .map(|order| format!("/api/orders/{}", order.order_id))
        .unwrap_or_default();
    tracing::debug!(subject = %user.subject, %location, "order created");
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/orders/{id}",
    params(("id" = i16, Path, description = "Order ID")),
    request_body = Order,
    responses(
        (status = 204, description = "Order and lines replaced"),
        (status = 400, description = "ID mismatch or invalid order"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 404, description = "Order, customer or product not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn replace_order(
    State(state): State<AppState>,
    _user: AuthUser,
    ApiPath(id): ApiPath<i16>,
    ApiJson(payload): ApiJson<Order>,
) -> AppResult<StatusCode> {
    order_service::replace_order(&state, id, payload).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    patch,
    path = "/api/orders/{id}",
    params(("id" = i16, Path, description = "Order ID")),
    request_body = Vec<PatchOperation>,
    responses(
        (status = 204, description = "Order patched"),
        (status = 400, description = "Invalid patch document"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 404, description = "Order or customer not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn patch_order(
    State(state): State<AppState>,
    _user: AuthUser,
    ApiPath(id): ApiPath<i16>,
    ApiJson(operations): ApiJson<Vec<PatchOperation>>,
) -> AppResult<StatusCode> {
    order_service::patch_order(&state, id, operations).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/api/orders/{id}",
    params(("id" = i16, Path, description = "Order ID")),
    responses(
        (status = 204, description = "Order and lines deleted"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 404, description = "Order not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn delete_order(
    State(state): State<AppState>,
    _user: AuthUser,
    ApiPath(id): ApiPath<i16>,
) -> AppResult<StatusCode> {
    order_service::delete_order(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
