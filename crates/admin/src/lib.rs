//! Garuda Dhruvam Foundation admin library.
//!
//! The content dashboard as a library, so the binary, the CLI and the
//! integration tests share one implementation:
//!
//! - Website content sections (`website_content`)
//! - Programs, stories, gallery, events, donations, volunteers
//! - Image uploads to object storage
//! - Password login with server-side sessions

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
