//! Shared newtype wrappers.

mod email;
mod id;
mod phone;
mod price;

pub use email::{Email, EmailError};
pub use id::{BrandId, CartId, CategoryId, OrderId, ProductId, UserId};
pub use phone::{PhoneError, PhoneNumber};
pub use price::Price;
