use std::collections::{HashMap, HashSet};

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use crate::{
    db::OrmConn,
    dto::orders::{OrderChange, OrderList},
    entity::{
        customers::Entity as Customers,
        order_details::{
            ActiveModel as DetailActive, Column as DetailCol, Entity as OrderDetails,
            Model as DetailModel,
        },
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel},
        products::{Column as ProdCol, Entity as Products},
    },
    error::{AppError, AppResult},
    models::{DetailLine, Order, OrderDetail},
    patch::{PatchOperation, decode_document},
    response::{ApiResponse, Meta},
    routes::params::ListQuery,
    services::{settle_insert, settle_update},
    state::AppState,
};

pub async fn list_orders(state: &AppState, query: ListQuery) -> AppResult<ApiResponse<OrderList>> {
    let finder = Orders::find().order_by_asc(OrderCol::OrderId);
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
    let orders = finder.all(&state.orm).await?;

    let ids: Vec<i16> = orders.iter().map(|order| order.order_id).collect();
    let mut details = load_details(&state.orm, ids).await?;
    let items = orders
        .into_iter()
        .map(|order| {
            let lines = details.remove(&order.order_id).unwrap_or_default();
            order_from_entity(order, lines)
        })
        .collect();

    Ok(ApiResponse::success("Orders", OrderList { items }, Some(meta)))
}

pub async fn get_order(state: &AppState, id: i16) -> AppResult<ApiResponse<Order>> {
    let order = Orders::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::missing("Order", id))?;

    let lines = OrderDetails::find()
        .filter(DetailCol::OrderId.eq(id))
        .order_by_asc(DetailCol::OrderDetailsId)
        .all(&state.orm)
        .await?;

    Ok(ApiResponse::success(
        "Order",
        order_from_entity(order, lines),
        Some(Meta::empty()),
    ))
}

/// Create an order with all of its lines, or nothing at all.
pub async fn create_order(state: &AppState, payload: Order) -> AppResult<ApiResponse<Order>> {
    let lines = payload.detail_lines()?;
    let order_id = payload.order_id;

    let created = state
        .orm
        .transaction::<_, (OrderModel, Vec<DetailModel>), AppError>(move |txn| {
            Box::pin(async move {
                ensure_customer(txn, payload.customer_id).await?;
                ensure_products(txn, &lines).await?;
                if Orders::find_by_id(order_id).one(txn).await?.is_some() {
                    return Err(AppError::Conflict("Order already exists".into()));
                }

                let order = OrderActive {
                    order_id: Set(order_id),
                    order_date: Set(payload
                        .order_date
                        .unwrap_or_else(|| Utc::now().naive_utc())),
                    customer_id: Set(payload.customer_id),
                    delivery_address: Set(payload.delivery_address),
                }
                .insert(txn)
                .await?;
                let details = insert_lines(txn, order_id, &lines).await?;
                Ok((order, details))
            })
        })
        .await
        .map_err(AppError::from);

    let (order, details) = match created {
        Err(AppError::OrmError(err)) => {
            settle_insert(Err(err), || order_exists(&state.orm, order_id), "Order").await?
        }
        other => other?,
    };
    tracing::info!(order_id, lines = details.len(), "order created");

    Ok(ApiResponse::success(
        "Order created",
        order_from_entity(order, details),
        Some(Meta::empty()),
    ))
}

/// Replace the order header and swap its lines for the supplied set.
///
/// Every reference is checked before the old lines are touched, and the
/// whole swap commits as one transaction.
pub async fn replace_order(state: &AppState, id: i16, payload: Order) -> AppResult<()> {
    if id != payload.order_id {
        return Err(AppError::BadRequest("Order ID mismatch.".into()));
    }
    let lines = payload.detail_lines()?;

    let replaced = state
        .orm
        .transaction::<_, (), AppError>(move |txn| {
            Box::pin(async move {
                let existing = Orders::find_by_id(id)
                    .one(txn)
                    .await?
                    .ok_or_else(|| AppError::missing("Order", id))?;
                ensure_customer(txn, payload.customer_id).await?;
                ensure_products(txn, &lines).await?;

                OrderDetails::delete_many()
                    .filter(DetailCol::OrderId.eq(id))
                    .exec(txn)
                    .await?;
                OrderActive {
                    order_id: Set(id),
                    order_date: Set(payload.order_date.unwrap_or(existing.order_date)),
                    customer_id: Set(payload.customer_id),
                    delivery_address: Set(payload.delivery_address),
                }
                .update(txn)
                .await?;
                insert_lines(txn, id, &lines).await?;
                Ok(())
            })
        })
        .await
        .map_err(AppError::from);

    settle_update(replaced, || order_exists(&state.orm, id), AppError::missing("Order", id)).await?;
    tracing::info!(order_id = id, "order replaced");
    Ok(())
}

/// Patch header fields only; lines stay as they are.
pub async fn patch_order(
    state: &AppState,
    id: i16,
    operations: Vec<PatchOperation>,
) -> AppResult<()> {
    let existing = Orders::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::missing("Order", id))?;
    let previous_customer = existing.customer_id;

    let changes: Vec<OrderChange> = decode_document(operations)?;
    let mut order = order_from_entity(existing.clone(), Vec::new());
    for change in changes {
        change.apply(&mut order);
    }
    order.validate_header()?;
    if order.customer_id != previous_customer {
        ensure_customer(&state.orm, order.customer_id).await?;
    }

    let updated = OrderActive {
        order_id: Set(id),
        order_date: Set(order.order_date.unwrap_or(existing.order_date)),
        customer_id: Set(order.customer_id),
        delivery_address: Set(order.delivery_address),
    }
    .update(&state.orm)
    .await
    .map_err(AppError::from);
    settle_update(updated, || order_exists(&state.orm, id), AppError::missing("Order", id)).await?;
    tracing::info!(order_id = id, "order patched");
    Ok(())
}

/// Delete the lines, then the order, in one transaction.
pub async fn delete_order(state: &AppState, id: i16) -> AppResult<()> {
    let removed = state
        .orm
        .transaction::<_, u64, AppError>(move |txn| {
            Box::pin(async move {
                if Orders::find_by_id(id).one(txn).await?.is_none() {
                    return Err(AppError::missing("Order", id));
                }
                let lines = OrderDetails::delete_many()
                    .filter(DetailCol::OrderId.eq(id))
                    .exec(txn)
                    .await?;
                Orders::delete_by_id(id).exec(txn).await?;
                Ok(lines.rows_affected)
            })
        })
        .await?;

    tracing::info!(order_id = id, lines = removed, "order deleted");
    Ok(())
}

async fn order_exists(conn: &OrmConn, id: i16) -> Result<bool, DbErr> {
    Ok(Orders::find_by_id(id).one(conn).await?.is_some())
}

async fn ensure_customer<C: ConnectionTrait>(conn: &C, customer_id: i16) -> AppResult<()> {
    match Customers::find_by_id(customer_id).one(conn).await? {
        Some(_) => Ok(()),
        None => Err(AppError::missing("Customer", customer_id)),
    }
}

/// Fails on the first line, in request order, whose product does not exist.
async fn ensure_products<C: ConnectionTrait>(conn: &C, lines: &[DetailLine]) -> AppResult<()> {
    if lines.is_empty() {
        return Ok(());
    }

    let wanted: Vec<i16> = lines.iter().map(|line| line.product_id).collect();
    let found: HashSet<i16> = Products::find()
        .select_only()
        .column(ProdCol::ProductId)
        .filter(ProdCol::ProductId.is_in(wanted))
        .into_tuple::<i16>()
        .all(conn)
        .await?
        .into_iter()
        .collect();

    match lines.iter().find(|line| !found.contains(&line.product_id)) {
        Some(line) => Err(AppError::missing("Product", line.product_id)),
        None => Ok(()),
    }
}

async fn insert_lines<C: ConnectionTrait>(
    conn: &C,
    order_id: i16,
    lines: &[DetailLine],
) -> AppResult<Vec<DetailModel>> {
    if lines.is_empty() {
        return Ok(Vec::new());
    }

    OrderDetails::insert_many(lines.iter().map(|line| DetailActive {
        order_id: Set(order_id),
        order_details_id: Set(line.order_details_id),
        product_id: Set(line.product_id),
        quantity: Set(line.quantity),
        discount: Set(line.discount),
    }))
    .exec_without_returning(conn)
    .await?;

    Ok(lines
        .iter()
        .map(|line| DetailModel {
            order_id,
            order_details_id: line.order_details_id,
            product_id: line.product_id,
            quantity: line.quantity,
            discount: line.discount,
        })
        .collect())
}

async fn load_details(
    conn: &OrmConn,
    order_ids: Vec<i16>,
) -> Result<HashMap<i16, Vec<DetailModel>>, DbErr> {
    let mut grouped: HashMap<i16, Vec<DetailModel>> = HashMap::new();
    if order_ids.is_empty() {
        return Ok(grouped);
    }

    let rows = OrderDetails::find()
        .filter(DetailCol::OrderId.is_in(order_ids))
        .order_by_asc(DetailCol::OrderId)
        .order_by_asc(DetailCol::OrderDetailsId)
        .all(conn)
        .await?;
    for row in rows {
        grouped.entry(row.order_id).or_default().push(row);
    }
    Ok(grouped)
}

fn order_from_entity(model: OrderModel, details: Vec<DetailModel>) -> Order {
    Order {
        order_id: model.order_id,
        order_date: Some(model.order_date),
        customer_id: model.customer_id,
        delivery_address: model.delivery_address,
        order_details: details.into_iter().map(order_detail_from_entity).collect(),
    }
}

fn order_detail_from_entity(model: DetailModel) -> OrderDetail {
    OrderDetail {
        order_details_id: Some(model.order_details_id),
        order_id: Some(model.order_id),
        product_id: model.product_id,
        quantity: model.quantity,
        discount: model.discount,
    }
}
