//! Reusable UI component modules.

pub mod linked_accounts;
