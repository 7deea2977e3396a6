//! # account-client
//!
//! Leptos + WASM frontend for the account settings screens.
//!
//! This crate contains the linked-accounts widget, the page hosting it, the
//! per-widget account-list state, and the REST/popup plumbing the widget
//! synchronizes through. The server crate renders it with the `ssr`
//! feature; the browser bundle is built with `hydrate`.

pub mod app;
pub mod components;
pub mod net;
pub mod pages;
pub mod state;

/// WASM entry point: attach to the server-rendered DOM.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::hydrate_body(app::App);
}
