//! Build script for the api crate.
//!
//! `sqlx::migrate!` embeds the SQL files at compile time, so the crate has to
//! be rebuilt whenever a migration is added or edited.

fn main() {
    println!("cargo:rerun-if-changed=migrations");
}
