//! Business logic services for admin.
//!
//! # Services
//!
//! - `auth` - Password sign-in and session state
//! - `content` - Website content sections
//! - `dashboard` - Record counts and donation totals
//! - `entities` - CRUD for programs, stories, gallery, events, donations, volunteers
//! - `uploads` - Image uploads to object storage

pub mod auth;
pub mod content;
pub mod dashboard;
pub mod entities;
pub mod uploads;

pub use auth::{AuthError, AuthService, IdentityProvider, PasswordIdentityProvider};
pub use content::{ContentError, ContentRepository};
pub use dashboard::DashboardStats;
pub use entities::{Confirmation, EntityError, EntityManager, Managed, Managers};
pub use uploads::{UploadError, UploadService};
