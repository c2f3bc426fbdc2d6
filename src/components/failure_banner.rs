//! Failure Banner Component
//!
//! Shows the latest failure message and clears it after a few seconds.

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::context::use_board;
use crate::store::{dismiss_banner, Banner, BoardUiStateStoreFields};

const BANNER_TIMEOUT_MS: u32 = 6_000;

#[component]
pub fn FailureBanner() -> impl IntoView {
    let state = use_board().state;

    // Each banner gets its own timer; a newer banner is left alone
    Effect::new(move |_| {
        if let Some(id) = state.banner().with(|b| b.as_ref().map(|b| b.id)) {
            spawn_local(async move {
                TimeoutFuture::new(BANNER_TIMEOUT_MS).await;
                dismiss_banner(&state, id);
            });
        }
    });

    view! {
        {move || state.banner().get().map(|Banner { id, message }| view! {
            <div class="failure-banner" role="alert">
                <span class="failure-text">{message}</span>
                <button
                    class="failure-dismiss"
                    title="Dismiss"
                    on:click=move |_| dismiss_banner(&state, id)
                >
                    "×"
                </button>
            </div>
        })}
    }
}
