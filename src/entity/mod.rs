pub mod customers;
pub mod order_details;
pub mod orders;
pub mod products;

pub use customers::Entity as Customers;
pub use order_details::Entity as OrderDetails;
pub use orders::Entity as Orders;
pub use products::Entity as Products;
