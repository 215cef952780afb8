use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use crate::{
    db::OrmConn,
    dto::products::{ProductChange, ProductList},
    entity::{
        order_details::Column as DetailCol,
        products::{ActiveModel, Column, Entity as Products, Model as ProductModel},
        OrderDetails,
    },
    error::{AppError, AppResult},
    models::Product,
    patch::{PatchOperation, decode_document},
    response::{ApiResponse, Meta},
    routes::params::ListQuery,
    services::{delete_error, settle_insert, settle_update},
    state::AppState,
};

pub async fn list_products(
    state: &AppState,
    query: ListQuery,
) -> AppResult<ApiResponse<ProductList>> {
    let finder = Products::find().order_by_asc(Column::ProductId);
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
        .map(product_from_entity)
        .collect();

    Ok(ApiResponse::success("Products", ProductList { items }, Some(meta)))
}

pub async fn get_product(state: &AppState, id: i16) -> AppResult<ApiResponse<Product>> {
    let product = Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .map(product_from_entity)
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Product", product, Some(Meta::empty())))
}

/// Products referenced by an order's lines, one entry per line.
pub async fn list_products_for_order(
    state: &AppState,
    order_id: i16,
) -> AppResult<ApiResponse<ProductList>> {
    let items: Vec<Product> = Products::find()
        .inner_join(OrderDetails)
        .filter(DetailCol::OrderId.eq(order_id))
        .order_by_asc(DetailCol::OrderDetailsId)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(product_from_entity)
        .collect();

    if items.is_empty() {
        return Err(AppError::NotFound);
    }

    let meta = Meta::total(items.len() as i64);
    Ok(ApiResponse::success(
        "Products for order",
        ProductList { items },
        Some(meta),
    ))
}

pub async fn create_product(
    state: &AppState,
    payload: Product,
) -> AppResult<ApiResponse<Product>> {
    payload.validate()?;
    let id = payload.product_id;

    let inserted = product_to_active(payload).insert(&state.orm).await;
    let product = settle_insert(inserted, || product_exists(&state.orm, id), "Product").await?;
    tracing::info!(product_id = id, "product created");

    Ok(ApiResponse::success(
        "Product created",
        product_from_entity(product),
        Some(Meta::empty()),
    ))
}

pub async fn replace_product(state: &AppState, id: i16, payload: Product) -> AppResult<()> {
    if id != payload.product_id {
        return Err(AppError::BadRequest("Product ID mismatch.".into()));
    }
    payload.validate()?;
    if !product_exists(&state.orm, id).await? {
        return Err(AppError::NotFound);
    }

    let updated = product_to_active(payload)
        .update(&state.orm)
        .await
        .map_err(AppError::from);
    settle_update(updated, || product_exists(&state.orm, id), AppError::NotFound).await?;
    tracing::info!(product_id = id, "product replaced");
    Ok(())
}

pub async fn patch_product(
    state: &AppState,
    id: i16,
    operations: Vec<PatchOperation>,
) -> AppResult<()> {
    let existing = Products::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let changes: Vec<ProductChange> = decode_document(operations)?;
    let mut product = product_from_entity(existing);
    for change in changes {
        change.apply(&mut product);
    }
    product.validate()?;

    let updated = product_to_active(product)
        .update(&state.orm)
        .await
        .map_err(AppError::from);
    settle_update(updated, || product_exists(&state.orm, id), AppError::NotFound).await?;
    tracing::info!(product_id = id, "product patched");
    Ok(())
}

pub async fn delete_product(state: &AppState, id: i16) -> AppResult<()> {
    let result = Products::delete_by_id(id)
        .exec(&state.orm)
        .await
        .map_err(|err| delete_error(err, "Product"))?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }
    tracing::info!(product_id = id, "product deleted");
    Ok(())
}

pub(crate) async fn product_exists(conn: &OrmConn, id: i16) -> Result<bool, DbErr> {
    Ok(Products::find_by_id(id).one(conn).await?.is_some())
}

fn product_from_entity(model: ProductModel) -> Product {
    Product {
        product_id: model.product_id,
        product_name: model.product_name,
        product_description: model.product_description,
        units_in_stock: model.units_in_stock,
    }
}

fn product_to_active(product: Product) -> ActiveModel {
    ActiveModel {
        product_id: Set(product.product_id),
        product_name: Set(product.product_name),
        product_description: Set(product.product_description),
        units_in_stock: Set(product.units_in_stock),
    }
}
