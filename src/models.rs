//! Transfer objects exposed at the API boundary.

use std::collections::HashSet;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    validation::{non_negative, optional_text, required_text, within},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub customer_id: i16,
    #[serde(default)]
    pub customer_title: Option<String>,
    pub customer_name: String,
    pub customer_surname: String,
    #[serde(default)]
    pub cell_phone: Option<String>,
}

impl Customer {
    pub fn validate(&self) -> AppResult<()> {
        optional_text("customerTitle", self.customer_title.as_deref(), 10)?;
        required_text("customerName", &self.customer_name, 50)?;
        required_text("customerSurname", &self.customer_surname, 50)?;
        optional_text("cellPhone", self.cell_phone.as_deref(), 20)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub product_id: i16,
    pub product_name: String,
    #[serde(default)]
    pub product_description: Option<String>,
    #[serde(default)]
    pub units_in_stock: Option<i32>,
}

impl Product {
    pub fn validate(&self) -> AppResult<()> {
        required_text("productName", &self.product_name, 50)?;
        optional_text(
            "productDescription",
            self.product_description.as_deref(),
            255,
        )?;
        if let Some(units) = self.units_in_stock {
            non_negative("unitsInStock", units)?;
        }
        Ok(())
    }
}

/// An order together with its detail lines.
///
/// On input `orderDate` may be omitted: a new order is stamped with the
/// current time and a replaced order keeps its stored date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_id: i16,
    #[serde(default)]
    pub order_date: Option<NaiveDateTime>,
    pub customer_id: i16,
    pub delivery_address: String,
    #[serde(default)]
    pub order_details: Vec<OrderDetail>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    /// Line id within the order; defaults to the 1-based line position.
    #[serde(default)]
    pub order_details_id: Option<i16>,
    /// Ignored on input, the enclosing order decides.
    #[serde(default)]
    pub order_id: Option<i16>,
    pub product_id: i16,
    pub quantity: i32,
    #[serde(default)]
    pub discount: Option<i32>,
}

/// A detail line after defaults are applied, ready to be persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetailLine {
    pub order_details_id: i16,
    pub product_id: i16,
    pub quantity: i32,
    pub discount: Option<i32>,
}

impl Order {
    /// Checks the order fields only, without its lines.
    pub fn validate_header(&self) -> AppResult<()> {
        required_text("deliveryAddress", &self.delivery_address, 255)
    }

    /// Validates the whole aggregate and resolves line ids.
    pub fn detail_lines(&self) -> AppResult<Vec<DetailLine>> {
        self.validate_header()?;

        let mut seen = HashSet::with_capacity(self.order_details.len());
        let mut lines = Vec::with_capacity(self.order_details.len());
        for (index, detail) in self.order_details.iter().enumerate() {
            let order_details_id = match detail.order_details_id {
                Some(id) => id,
                None => i16::try_from(index + 1)
                    .map_err(|_| AppError::BadRequest("too many order lines".into()))?,
            };
            if !seen.insert(order_details_id) {
                return Err(AppError::BadRequest(format!(
                    "duplicate orderDetailsId {order_details_id}"
                )));
            }
            non_negative("quantity", detail.quantity)?;
            if let Some(discount) = detail.discount {
                within("discount", discount, 0, 100)?;
            }
            lines.push(DetailLine {
                order_details_id,
                product_id: detail.product_id,
                quantity: detail.quantity,
                discount: detail.discount,
            });
        }
        Ok(lines)
    }
}
