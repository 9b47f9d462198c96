//! Domain models for the catalog API.
//!
//! These are validated domain objects, separate from database row types and
//! from the JSON request bodies accepted by the routes.

pub mod product;
pub mod user;

pub use product::{
    CreateProductInput, ImageUpdate, Pagination, Product, ProductDraft, ProductOwner, ProductPatch,
};
pub use user::{NewUser, User};
