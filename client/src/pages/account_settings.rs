//! Account settings page hosting the linked-accounts widgets.

use leptos::prelude::*;
use leptos_meta::Title;

use crate::components::linked_accounts::LinkedAccountsWidget;

/// Reference managers a user can link from this page, as `(slug, label)`.
pub const LINKABLE_PROVIDERS: &[(&str, &str)] = &[("zotero", "Zotero")];

#[component]
pub fn AccountSettingsPage() -> impl IntoView {
    view! {
        <Title text="Linked accounts"/>
        <div class="settings-page">
            <header class="settings-page__header">
                <h2>"Configure add-on accounts"</h2>
            </header>
            <div class="settings-page__body">
                {LINKABLE_PROVIDERS
                    .iter()
                    .map(|(provider, label)| {
                        view! {
                            <LinkedAccountsWidget
                                provider=(*provider).to_owned()
                                label=(*label).to_owned()
                            />
                        }
                    })
                    .collect::<Vec<_>>()}
            </div>
        </div>
    }
}
