//! Core type definitions.

mod email;
mod id;
mod order;
mod price;
mod product;
mod status;

pub use email::{Email, EmailError};
pub use id::{OrderId, ProductId};
pub use order::{DeliveryInfo, Order, PaymentInfo};
pub use price::{CurrencyCode, Price};
pub use product::Product;
pub use status::OrderStatus;
