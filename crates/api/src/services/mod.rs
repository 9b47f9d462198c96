//! Business logic services.
//!
//! # Services
//!
//! - `auth` - Registration, sign-in and session tokens
//! - `products` - Product catalog operations
//! - `files` - Product image storage
//! - `seed` - Development data seeder

pub mod auth;
pub mod files;
pub mod products;
pub mod seed;
