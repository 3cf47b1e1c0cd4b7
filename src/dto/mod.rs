pub mod auth;
pub mod line_items;
pub mod products;
pub mod purchases;
pub mod users;
