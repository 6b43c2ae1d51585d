//! Garuda Dhruvam Foundation public site.
//!
//! Renders the home page from `website_content`, `stories` and `gallery`,
//! read-only. Content is edited through the admin dashboard; see the
//! `garuda-admin` crate.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod content;
pub mod error;
pub mod routes;
pub mod showcase;
pub mod state;
