//! Garuda Core - Shared types library.
//!
//! This crate provides the types shared by every Garuda component:
//! - `site` - Public marketing site
//! - `admin` - Content and administration dashboard
//! - `cli` - Command-line tools for migrations, admin provisioning and seeding
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no database
//! access, no HTTP clients. Both binaries agree on the shape of website
//! content through the typed sections in [`content`].
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, emails, statuses, money and validation errors
//! - [`content`] - Section names and the typed website content sections

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod content;
pub mod types;

pub use types::*;
