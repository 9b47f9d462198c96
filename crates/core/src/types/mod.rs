//! Core types for the catalog.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod gender;
pub mod id;
pub mod price;
pub mod role;
pub mod slug;

pub use email::{Email, EmailError};
pub use gender::{Gender, GenderError};
pub use id::*;
pub use price::{Price, PriceError};
pub use role::{Role, RoleError};
pub use slug::{LookupTerm, Slug};
