//! Built-in event schemas.

pub mod auto_click;
pub mod shopping_mall;
pub mod tables;

pub use auto_click::AutoClickSchema;
pub use shopping_mall::ShoppingMallSchema;
