pub mod administration;
pub mod animal;
pub mod establishment;
pub mod inventory_transaction;
pub mod movement;
pub mod product;
pub mod product_lot;
pub mod treatment;
