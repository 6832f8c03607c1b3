//! Bookshelf application library
//!
//! Application modules plus the wiring shared by the `bookshelf-app` and
//! `bookshelf` binaries.

pub mod app;
pub mod modules;

pub use app::{build_registry, migrate, serve};
