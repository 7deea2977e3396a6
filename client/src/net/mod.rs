//! Networking modules for the settings REST API and the OAuth popup.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` handles REST calls, `oauth_popup` opens popups and routes their
//! completions, `account_sync` ties both to a widget's list state, and
//! `types` defines the shared wire schema.

pub mod account_sync;
pub mod api;
pub mod oauth_popup;
pub mod types;
