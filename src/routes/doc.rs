use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{customers::CustomerList, orders::OrderList, products::ProductList},
    models::{Customer, Order, OrderDetail, Product},
    patch::PatchOperation,
    response::{ApiResponse, Meta},
    routes::{customers, health, orders, params, products},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        customers::list_customers,
        customers::get_customer,
        customers::create_customer,
        customers::replace_customer,
        customers::patch_customer,
        customers::delete_customer,
        products::list_products,
        products::get_product,
        products::list_products_for_order,
        products::create_product,
        products::replace_product,
        products::patch_product,
        products::delete_product,
        orders::list_orders,
        orders::get_order,
        orders::create_order,
        orders::replace_order,
        orders::patch_order,
        orders::delete_order
    ),
    components(
        schemas(
            Customer,
            Product,
            Order,
            OrderDetail,
            PatchOperation,
            CustomerList,
            ProductList,
            OrderList,
            params::ListQuery,
            Meta,
            ApiResponse<Customer>,
            ApiResponse<Product>,
            ApiResponse<Order>,
            ApiResponse<CustomerList>,
            ApiResponse<ProductList>,
            ApiResponse<OrderList>
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Customers", description = "Customer endpoints"),
        (name = "Products", description = "Product endpoints"),
        (name = "Orders", description = "Order endpoints, orders are written together with their lines"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_resource_is_documented() {
        let spec = ApiDoc::openapi();
        for path in [
            "/api/customers",
            "/api/customers/{id}",
            "/api/products/order/{order_id}",
            "/api/orders/{id}",
        ] {
            assert!(spec.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
