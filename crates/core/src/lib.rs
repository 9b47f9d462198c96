//! Catalog Core - Shared types library.
//!
//! This crate provides common types used across all catalog components:
//! - `api` - REST backend (auth, products, files, seed)
//! - `cli` - Command-line tools for migrations, user bootstrap, and seeding
//!
//! # Architecture
//!
//! The core crate contains only types and pure helpers - no I/O, no database
//! access, no HTTP. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, emails, roles, and slugs

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
