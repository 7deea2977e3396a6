//! Shared client-side state modules.
//!
//! DESIGN
//! ======
//! State structs are plain data held in `RwSignal`s so transitions can be
//! unit tested without a browser.

pub mod accounts;
