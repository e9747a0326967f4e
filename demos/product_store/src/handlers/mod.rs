pub mod delete_product;
pub mod get_product;
pub mod order_product;
