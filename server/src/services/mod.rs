//! Domain services used by the HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own account storage, OAuth state handling and page
//! rendering so route handlers can stay focused on protocol translation.

pub mod accounts;
pub mod claim;
pub mod oauth;
