//! Domain records shared by the storage, service and HTTP layers

pub mod order;
pub mod user;

pub use order::{NewOrder, Order, DEFAULT_ORDER_STATUS};
pub use user::{Credential, NewUser, User};
