//! OAuth popup launch and completion routing.
//!
//! SYSTEM CONTEXT
//! ==============
//! Linking runs in a separate browsing context. The completion page at the
//! end of the flow signals its opener with a same-origin `postMessage`
//! carrying the request id the popup was opened with, or, when it has no id,
//! by calling the legacy global `window.oauth_complete()` function. The
//! message path routes to exactly the widget that opened the popup; the
//! global function is a single window-wide slot that the most recent
//! `connect` owns.
//!
//! All browser wiring is gated behind `#[cfg(feature = "hydrate")]`.

#[cfg(test)]
#[path = "oauth_popup_test.rs"]
mod oauth_popup_test;

#[cfg(feature = "hydrate")]
use std::sync::Arc;
#[cfg(feature = "hydrate")]
use std::sync::atomic::{AtomicBool, Ordering};

use super::api::ApiError;
use super::types::{OAUTH_COMPLETE_MESSAGE_TYPE, OAuthCompleteMessage};

/// Window property the legacy completion page calls on its opener.
pub const LEGACY_HOOK_NAME: &str = "oauth_complete";

pub const POPUP_TARGET: &str = "_blank";
pub const POPUP_FEATURES: &str = "popup,width=640,height=720";

/// A completion report received from an OAuth popup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CompletionSignal {
    /// Completion for the request opened with this id.
    Correlated(String),
    /// Untokened completion through the legacy global hook.
    Legacy,
}

/// Parse a `postMessage` payload from the completion page.
///
/// Returns `None` for anything that is not an `oauth_complete` message so
/// unrelated cross-window chatter is ignored.
#[must_use]
pub fn parse_completion_message(raw: &str) -> Option<CompletionSignal> {
    let msg: OAuthCompleteMessage = serde_json::from_str(raw).ok()?;
    if msg.kind != OAUTH_COMPLETE_MESSAGE_TYPE {
        return None;
    }
    match msg.request_id {
        Some(id) if !id.trim().is_empty() => Some(CompletionSignal::Correlated(id)),
        _ => Some(CompletionSignal::Legacy),
    }
}

/// Opens the provider's OAuth entry point in a new browsing context.
pub trait PopupLauncher {
    /// # Errors
    ///
    /// Returns an error if no window could be opened.
    fn open_popup(&self, url: &str) -> Result<(), ApiError>;
}

/// [`PopupLauncher`] using `window.open`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserPopup;

impl PopupLauncher for BrowserPopup {
    fn open_popup(&self, url: &str) -> Result<(), ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let window = web_sys::window().ok_or(ApiError::PopupBlocked)?;
            match window.open_with_url_and_target_and_features(url, POPUP_TARGET, POPUP_FEATURES) {
                Ok(Some(_)) => Ok(()),
                _ => Err(ApiError::PopupBlocked),
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = url;
            Err(ApiError::Unavailable)
        }
    }
}

/// Listen for completion messages from same-origin popups.
///
/// The listener lives as long as the page; it stops forwarding once `alive`
/// is cleared by the owning component's cleanup.
#[cfg(feature = "hydrate")]
pub fn install_completion_listener<F>(alive: Arc<AtomicBool>, on_signal: F)
where
    F: Fn(CompletionSignal) + 'static,
{
    use wasm_bindgen::JsCast as _;
    use wasm_bindgen::closure::Closure;

    let Some(window) = web_sys::window() else {
        return;
    };
    let own_origin = window.location().origin().ok();

    let handler = Closure::<dyn FnMut(web_sys::MessageEvent)>::new(move |event: web_sys::MessageEvent| {
        if !alive.load(Ordering::Relaxed) {
            return;
        }
        if own_origin.as_deref() != Some(event.origin().as_str()) {
            return;
        }
        let Some(raw) = event.data().as_string() else {
            return;
        };
        if let Some(signal) = parse_completion_message(&raw) {
            on_signal(signal);
        }
    });

    if window
        .add_event_listener_with_callback("message", handler.as_ref().unchecked_ref())
        .is_err()
    {
        leptos::logging::warn!("oauth completion listener not installed");
    }
    handler.forget();
}

/// Closure currently installed as `window.oauth_complete`.
#[cfg(feature = "hydrate")]
pub type LegacyHook = wasm_bindgen::closure::Closure<dyn FnMut()>;

/// Point the global `window.oauth_complete` at `on_complete`.
///
/// Last writer wins: a later `connect` anywhere on the page replaces it. The
/// caller owns the returned closure and must keep it alive until it installs
/// the next one; dropping it leaves the global pointing at a dead closure,
/// which the completion page tolerates.
#[cfg(feature = "hydrate")]
#[must_use]
pub fn install_legacy_hook<F>(alive: Arc<AtomicBool>, on_complete: F) -> Option<LegacyHook>
where
    F: Fn() + 'static,
{
    use wasm_bindgen::JsValue;

    let window = web_sys::window()?;
    let hook = LegacyHook::new(move || {
        if alive.load(Ordering::Relaxed) {
            on_complete();
        }
    });
    if js_sys::Reflect::set(&window, &JsValue::from_str(LEGACY_HOOK_NAME), hook.as_ref()).is_err() {
        leptos::logging::warn!("failed to install window.{LEGACY_HOOK_NAME}");
        return None;
    }
    Some(hook)
}
