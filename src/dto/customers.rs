use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::Customer,
    patch::{FieldChange, FieldEdit, immutable_field, unknown_field},
};

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct CustomerList {
    #[schema(value_type = Vec<Customer>)]
    pub items: Vec<Customer>,
}

/// Fields a customer PATCH may touch.
#[derive(Debug, Clone, PartialEq)]
pub enum CustomerChange {
    Title(Option<String>),
    Name(String),
    Surname(String),
    CellPhone(Option<String>),
}

impl FieldChange for CustomerChange {
    fn decode(field: &str, edit: FieldEdit) -> AppResult<Self> {
        match field {
            "customertitle" => edit.optional("customerTitle").map(Self::Title),
            "customername" => edit.required("customerName").map(Self::Name),
            "customersurname" => edit.required("customerSurname").map(Self::Surname),
            "cellphone" => edit.optional("cellPhone").map(Self::CellPhone),
            "customerid" => Err(immutable_field("customerId")),
            other => Err(unknown_field(other)),
        }
    }
}

impl CustomerChange {
    pub fn apply(self, customer: &mut Customer) {
        match self {
            Self::Title(title) => customer.customer_title = title,
            Self::Name(name) => customer.customer_name = name,
            Self::Surname(surname) => customer.customer_surname = surname,
            Self::CellPhone(phone) => customer.cell_phone = phone,
        }
    }
}
