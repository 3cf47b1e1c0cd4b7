pub mod line_items;
pub mod products;
pub mod purchases;
pub mod users;

pub use line_items::Entity as LineItems;
pub use products::Entity as Products;
pub use purchases::Entity as Purchases;
pub use users::Entity as Users;
