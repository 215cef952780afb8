use sea_orm::{
    ActiveModelTrait, DbErr, EntityTrait, PaginatorTrait, QueryOrder, QuerySelect, Set,
};

use crate::{
    db::OrmConn,
    dto::customers::{CustomerChange, CustomerList},
    entity::customers::{ActiveModel, Column, Entity as Customers, Model as CustomerModel},
    error::{AppError, AppResult},
    models::Customer,
    patch::{PatchOperation, decode_document},
    response::{ApiResponse, Meta},
    routes::params::ListQuery,
    services::{delete_error, settle_insert, settle_update},
    state::AppState,
};

pub async fn list_customers(
    state: &AppState,
    query: ListQuery,
) -> AppResult<ApiResponse<CustomerList>> {
    let finder = Customers::find().order_by_asc(Column::CustomerId);
    let total = finder.clone().count(&state.orm).await? as i64;
    if total == 0 {
        return Err(AppError::NotFound);
    }

    let (finder, meta) = match query.window()? {
        Some((page, limit, offset)) => (
            finder.limit(limit as u64).offset(offset as u64),
            Meta::new(page, limit, total),
        ),
        None => (finder, Meta::total(total)),
    };
    let items = finder
        .all(&state.orm)
        .await?
        .into_iter()
        .map(customer_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Customers",
        CustomerList { items },
        Some(meta),
    ))
}

pub async fn get_customer(state: &AppState, id: i16) -> AppResult<ApiResponse<Customer>> {
    let customer = Customers::find_by_id(id)
        .one(&state.orm)
        .await?
        .map(customer_from_entity)
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Customer", customer, Some(Meta::empty())))
}

pub async fn create_customer(
    state: &AppState,
    payload: Customer,
) -> AppResult<ApiResponse<Customer>> {
    payload.validate()?;
    let id = payload.customer_id;

    let inserted = customer_to_active(payload).insert(&state.orm).await;
    let customer = settle_insert(inserted, || customer_exists(&state.orm, id), "Customer").await?;
    tracing::info!(customer_id = id, "customer created");

    Ok(ApiResponse::success(
        "Customer created",
        customer_from_entity(customer),
        Some(Meta::empty()),
    ))
}

pub async fn replace_customer(state: &AppState, id: i16, payload: Customer) -> AppResult<()> {
    if id != payload.customer_id {
        return Err(AppError::BadRequest("Customer ID mismatch.".into()));
    }
    payload.validate()?;
    if !customer_exists(&state.orm, id).await? {
        return Err(AppError::NotFound);
    }

    let updated = customer_to_active(payload)
        .update(&state.orm)
        .await
        .map_err(AppError::from);
    settle_update(updated, || customer_exists(&state.orm, id), AppError::NotFound).await?;
    tracing::info!(customer_id = id, "customer replaced");
    Ok(())
}

pub async fn patch_customer(
    state: &AppState,
    id: i16,
    operations: Vec<PatchOperation>,
) -> AppResult<()> {
    let existing = Customers::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let changes: Vec<CustomerChange> = decode_document(operations)?;
    let mut customer = customer_from_entity(existing);
    for change in changes {
        change.apply(&mut customer);
    }
    customer.validate()?;

    let updated = customer_to_active(customer)
        .update(&state.orm)
        .await
        .map_err(AppError::from);
    settle_update(updated, || customer_exists(&state.orm, id), AppError::NotFound).await?;
    tracing::info!(customer_id = id, "customer patched");
    Ok(())
}

pub async fn delete_customer(state: &AppState, id: i16) -> AppResult<()> {
    let result = Customers::delete_by_id(id)
        .exec(&state.orm)
        .await
        .map_err(|err| delete_error(err, "Customer"))?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }
    tracing::info!(customer_id = id, "customer deleted");
    Ok(())
}

pub(crate) async fn customer_exists(conn: &OrmConn, id: i16) -> Result<bool, DbErr> {
    Ok(Customers::find_by_id(id).one(conn).await?.is_some())
}

fn customer_from_entity(model: CustomerModel) -> Customer {
    Customer {
        customer_id: model.customer_id,
        customer_title: model.customer_title,
        customer_name: model.customer_name,
        customer_surname: model.customer_surname,
        cell_phone: model.cell_phone,
    }
}

fn customer_to_active(customer: Customer) -> ActiveModel {
    ActiveModel {
        customer_id: Set(customer.customer_id),
        customer_title: Set(customer.customer_title),
        customer_name: Set(customer.customer_name),
        customer_surname: Set(customer.customer_surname),
        cell_phone: Set(customer.cell_phone),
    }
}
