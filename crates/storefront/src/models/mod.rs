//! Domain models for the storefront.
//!
//! These types represent validated domain objects separate from database row
//! types; the `db` repositories convert rows into them.

pub mod address;
pub mod cart;
pub mod catalog;
pub mod geography;
pub mod order;
pub mod user;

pub use address::Address;
pub use cart::{Cart, CartItem};
pub use catalog::{ProductDetail, ProductSummary};
pub use geography::{ApprovedAddress, Barangay, Municipality, Region};
pub use order::{Order, OrderItem, OrderWithItems};
pub use user::User;
