//! Premium Food Ventures Core - Shared types library.
//!
//! This crate provides the types used across all site components:
//! - `site` - Public marketing pages and the admin back-office
//! - `cli` - Command-line tools for storage reconciliation
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Entity records, type-safe IDs, ratings, emails, and storage buckets

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
