//! Settings widget listing linked third-party accounts for one provider.
//!
//! SYSTEM CONTEXT
//! ==============
//! Each mounted widget owns an `AccountSync`. Mounting spawns the initial
//! fetch and starts listening for popup completions; Connect and Disconnect
//! buttons delegate to the synchronizer, which re-fetches on completion.

use leptos::prelude::*;

use crate::net::account_sync::AccountSync;
use crate::net::api::HttpAccountsApi;
use crate::net::oauth_popup::BrowserPopup;
use crate::net::types::LinkedAccount;
use crate::state::accounts::SyncPhase;

/// Connect/disconnect panel for a single OAuth provider.
#[component]
pub fn LinkedAccountsWidget(
    /// Provider slug used in API paths (e.g. `"zotero"`).
    provider: String,
    /// Human-readable provider name.
    label: String,
) -> impl IntoView {
    let (sync, initial_fetch) = AccountSync::start(provider, HttpAccountsApi, BrowserPopup);
    let state = sync.state();

    #[cfg(feature = "hydrate")]
    let alive = {
        let alive = std::sync::Arc::new(std::sync::atomic::AtomicBool::new(true));
        leptos::task::spawn_local(initial_fetch);

        let listener_sync = sync.clone();
        crate::net::oauth_popup::install_completion_listener(alive.clone(), move |signal| {
            let sync = listener_sync.clone();
            leptos::task::spawn_local(async move {
                sync.handle_completion(&signal).await;
            });
        });

        let cleanup_alive = alive.clone();
        on_cleanup(move || cleanup_alive.store(false, std::sync::atomic::Ordering::Relaxed));
        alive
    };
    #[cfg(not(feature = "hydrate"))]
    drop(initial_fetch);

    // Replacing the stored hook drops the one it supersedes.
    #[cfg(feature = "hydrate")]
    let legacy_hook = StoredValue::new_local(None::<crate::net::oauth_popup::LegacyHook>);

    let on_connect = {
        let sync = sync.clone();
        #[cfg(feature = "hydrate")]
        let alive = alive.clone();
        move |_| {
            if sync.connect().is_err() {
                return;
            }
            #[cfg(feature = "hydrate")]
            {
                let hook_sync = sync.clone();
                let hook = crate::net::oauth_popup::install_legacy_hook(alive.clone(), move || {
                    let sync = hook_sync.clone();
                    leptos::task::spawn_local(async move {
                        sync.handle_completion(&crate::net::oauth_popup::CompletionSignal::Legacy)
                            .await;
                    });
                });
                if hook.is_some() {
                    legacy_hook.set_value(hook);
                }
            }
        }
    };

    let on_disconnect = Callback::new(move |account: LinkedAccount| {
        #[cfg(feature = "hydrate")]
        {
            let sync = sync.clone();
            leptos::task::spawn_local(async move {
                let _ = sync.disconnect(&account).await;
            });
        }
        #[cfg(not(feature = "hydrate"))]
        let _ = account;
    });

    let empty_label = format!("No {label} accounts connected.");
    let connect_label = format!("Connect {label} account");

    view! {
        <section class="linked-accounts">
            <h4 class="linked-accounts__title">{label}</h4>
            <Show when=move || state.get().phase() == SyncPhase::Fetching>
                <p class="linked-accounts__loading">"Loading accounts..."</p>
            </Show>
            <Show
                when=move || !state.get().accounts.is_empty()
                fallback=move || view! { <p class="linked-accounts__empty">{empty_label.clone()}</p> }
            >
                <ul class="linked-accounts__list">
                    {move || {
                        state
                            .get()
                            .accounts
                            .into_iter()
                            .map(|account| view! { <LinkedAccountRow account=account on_disconnect=on_disconnect/> })
                            .collect::<Vec<_>>()
                    }}
                </ul>
            </Show>
            <Show when=move || state.get().notice.is_some()>
                <p class="linked-accounts__notice" role="alert">
                    {move || state.get().notice.unwrap_or_default()}
                </p>
            </Show>
            <button class="btn linked-accounts__connect" on:click=on_connect>
                {connect_label}
            </button>
        </section>
    }
}

/// One linked account with its Disconnect action.
#[component]
fn LinkedAccountRow(account: LinkedAccount, on_disconnect: Callback<LinkedAccount>) -> impl IntoView {
    let name = account.display_name.clone();
    view! {
        <li class="linked-accounts__item">
            <span class="linked-accounts__name">{name}</span>
            <button
                class="btn linked-accounts__disconnect"
                on:click=move |_| on_disconnect.run(account.clone())
                title="Disconnect account"
            >
                "Disconnect"
            </button>
        </li>
    }
}
