#![allow(dead_code)]

use chrono::NaiveDate;
use order_desk_api::{
    db::{create_orm_conn, run_migrations},
    models::{Customer, Order, OrderDetail, Product},
    state::AppState,
};

pub const JWT_SECRET: &str = "test-secret";

// One connection: every pooled connection to `sqlite::memory:` would be a separate database.
pub async fn setup_state() -> anyhow::Result<AppState> {
    let orm = create_orm_conn("sqlite::memory:", 1).await?;
    run_migrations(&orm).await?;
    Ok(AppState::new(orm, JWT_SECRET))
}

pub fn customer(id: i16, name: &str) -> Customer {
    Customer {
        customer_id: id,
        customer_title: Some("Ms".into()),
        customer_name: name.into(),
        customer_surname: "Botha".into(),
        cell_phone: Some("0837654321".into()),
    }
}

pub fn product(id: i16, name: &str) -> Product {
    Product {
        product_id: id,
        product_name: name.into(),
        product_description: Some("test item".into()),
        units_in_stock: Some(10),
    }
}

pub fn line(product_id: i16, quantity: i32) -> OrderDetail {
    OrderDetail {
        order_details_id: None,
        order_id: None,
        product_id,
        quantity,
        discount: None,
    }
}

pub fn order(id: i16, customer_id: i16, lines: Vec<OrderDetail>) -> Order {
    Order {
        order_id: id,
        order_date: NaiveDate::from_ymd_opt(2024, 3, 1)
            .and_then(|date| date.and_hms_opt(9, 30, 0)),
        customer_id,
        delivery_address: "12 Long Street".into(),
        order_details: lines,
    }
}
