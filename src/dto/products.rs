use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::Product,
    patch::{FieldChange, FieldEdit, immutable_field, unknown_field},
};

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct ProductList {
    #[schema(value_type = Vec<Product>)]
    pub items: Vec<Product>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProductChange {
    Name(String),
    Description(Option<String>),
    UnitsInStock(Option<i32>),
}

impl FieldChange for ProductChange {
    fn decode(field: &str, edit: FieldEdit) -> AppResult<Self> {
        match field {
            "productname" => edit.required("productName").map(Self::Name),
            "productdescription" => edit.optional("productDescription").map(Self::Description),
            "unitsinstock" => edit.optional("unitsInStock").map(Self::UnitsInStock),
            "productid" => Err(immutable_field("productId")),
            other => Err(unknown_field(other)),
        }
    }
}

impl ProductChange {
    pub fn apply(self, product: &mut Product) {
        match self {
            Self::Name(name) => product.product_name = name,
            Self::Description(description) => product.product_description = description,
            Self::UnitsInStock(units) => product.units_in_stock = units,
        }
    }
}
