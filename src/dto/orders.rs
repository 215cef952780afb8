use chrono::NaiveDateTime;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::Order,
    patch::{FieldChange, FieldEdit, immutable_field, unknown_field},
};

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct OrderList {
    #[schema(value_type = Vec<Order>)]
    pub items: Vec<Order>,
}

/// Order header fields a PATCH may touch. Lines are only replaced through PUT.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderChange {
    OrderDate(NaiveDateTime),
    CustomerId(i16),
    DeliveryAddress(String),
}

impl FieldChange for OrderChange {
    fn decode(field: &str, edit: FieldEdit) -> AppResult<Self> {
        match field {
            "orderdate" => edit.required("orderDate").map(Self::OrderDate),
            "customerid" => edit.required("customerId").map(Self::CustomerId),
            "deliveryaddress" => edit.required("deliveryAddress").map(Self::DeliveryAddress),
            "orderid" => Err(immutable_field("orderId")),
            "orderdetails" => Err(immutable_field("orderDetails")),
            other => Err(unknown_field(other)),
        }
    }
}

impl OrderChange {
    pub fn apply(self, order: &mut Order) {
        match self {
            Self::OrderDate(date) => order.order_date = Some(date),
            Self::CustomerId(customer_id) => order.customer_id = customer_id,
            Self::DeliveryAddress(address) => order.delivery_address = address,
        }
    }
}
