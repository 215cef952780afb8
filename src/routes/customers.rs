use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderName, StatusCode, header},
    routing::get,
};

use crate::{
    dto::customers::CustomerList,
    error::AppResult,
    middleware::{json::ApiJson, path::ApiPath},
    models::Customer,
    patch::PatchOperation,
    response::ApiResponse,
    routes::params::ListQuery,
    services::customer_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_customers).post(create_customer))
        .route(
            "/{id}",
            get(get_customer)
                .put(replace_customer)
                .patch(patch_customer)
                .delete(delete_customer),
        )
}

#[utoipa::path(
    get,
    path = "/api/customers",
    params(ListQuery),
    responses(
        (status = 200, description = "List customers", body = ApiResponse<CustomerList>),
        (status = 404, description = "No customers"),
    ),
    tag = "Customers"
)]
pub async fn list_customers(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<CustomerList>>> {
    let resp = customer_service::list_customers(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/customers/{id}",
    params(("id" = i16, Path, description = "Customer ID")),
    responses(
        (status = 200, description = "Get customer", body = ApiResponse<Customer>),
        (status = 404, description = "Customer not found"),
    ),
    tag = "Customers"
)]
pub async fn get_customer(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i16>,
) -> AppResult<Json<ApiResponse<Customer>>> {
    let resp = customer_service::get_customer(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/customers",
    request_body = Customer,
    responses(
        (status = 201, description = "Customer created", body = ApiResponse<Customer>),
        (status = 400, description = "Invalid customer"),
        (status = 409, description = "Customer ID already taken"),
    ),
    tag = "Customers"
)]
pub async fn create_customer(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<Customer>,
) -> AppResult<(StatusCode, [(HeaderName, String); 1], Json<ApiResponse<Customer>>)> {
    let resp = customer_service::create_customer(&state, payload).await?;
    let location = resp
        .data
        .as_ref()
        .map(|customer| format!("/api/customers/{}", customer.customer_id))
        .unwrap_or_default();
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/customers/{id}",
    params(("id" = i16, Path, description = "Customer ID")),
    request_body = Customer,
    responses(
        (status = 204, description = "Customer replaced"),
        (status = 400, description = "ID mismatch or invalid customer"),
        (status = 404, description = "Customer not found"),
    ),
    tag = "Customers"
)]
pub async fn replace_customer(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i16>,
    ApiJson(payload): ApiJson<Customer>,
) -> AppResult<StatusCode> {
    customer_service::replace_customer(&state, id, payload).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    patch,
    path = "/api/customers/{id}",
    params(("id" = i16, Path, description = "Customer ID")),
    request_body = Vec<PatchOperation>,
    responses(
        (status = 204, description = "Customer patched"),
        (status = 400, description = "Invalid patch document"),
        (status = 404, description = "Customer not found"),
    ),
    tag = "Customers"
)]
pub async fn patch_customer(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i16>,
    ApiJson(operations): ApiJson<Vec<PatchOperation>>,
) -> AppResult<StatusCode> {
    customer_service::patch_customer(&state, id, operations).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/api/customers/{id}",
    params(("id" = i16, Path, description = "Customer ID")),
    responses(
        (status = 204, description = "Customer deleted"),
        (status = 404, description = "Customer not found"),
        (status = 409, description = "Customer still has orders"),
    ),
    tag = "Customers"
)]
pub async fn delete_customer(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i16>,
) -> AppResult<StatusCode> {
    customer_service::delete_customer(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
