//! Add Member Form Component

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{error, info};

use board_sync::NewUser;

use crate::context::use_board;
use crate::store::BoardUiStateStoreFields;

#[component]
pub fn AddMemberForm() -> impl IntoView {
    let ctx = use_board();
    let state = ctx.state;

    let (name, set_name) = signal(String::new());
    let (phone, set_phone) = signal(String::new());
    let (designation, set_designation) = signal(String::new());
    let (error_text, set_error_text) = signal(None::<String>);
    let (saving, set_saving) = signal(false);

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if saving.get_untracked() { return; }
        let member = match NewUser::new(&name.get_untracked(), &phone.get_untracked(), &designation.get_untracked()) {
            Ok(member) => member,
            Err(e) => {
                set_error_text.set(Some(e.to_string()));
                return;
            }
        };
        set_saving.set(true);
        spawn_local(async move {
            let mutator = ctx.mutator();
            let mut directory = state.users().get_untracked();
            match directory.add_member(mutator.service(), &member).await {
                Ok(user) => {
                    info!("added member {} ({})", user.name, user.id);
                    state.users().set(directory);
                    state.member_open().set(false);
                }
                Err(e) => {
                    error!("adding member failed: {e}");
                    set_saving.set(false);
                    set_error_text.set(Some(format!("Could not add member ({e}).")));
                }
            }
        });
    };

    view! {
        <form class="member-form" on:submit=submit>
            <h2>"Add member"</h2>
            <input
                type="text"
                placeholder="Name"
                prop:value=move || name.get()
                on:input=move |ev| {
                    set_name.set(event_target_value(&ev));
                    set_error_text.set(None);
                }
            />
            <input
                type="tel"
                placeholder="Phone"
                prop:value=move || phone.get()
                on:input=move |ev| set_phone.set(event_target_value(&ev))
            />
            <input
                type="text"
                placeholder="Designation"
                prop:value=move || designation.get()
                on:input=move |ev| set_designation.set(event_target_value(&ev))
            />

            {move || error_text.get().map(|text| view! { <p class="form-error">{text}</p> })}

            <div class="form-actions">
                <button type="submit" disabled=move || saving.get()>"Add"</button>
                <button type="button" class="cancel-btn" on:click=move |_| state.member_open().set(false)>
                    "Cancel"
                </button>
            </div>
        </form>
    }
}
