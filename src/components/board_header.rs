//! Board Header Component
//!
//! Today's date, team avatars and the board-level actions.

use chrono::NaiveDate;
use leptos::prelude::*;
use leptos::task::spawn_local;

use board_sync::{display_case, initial, User};

use crate::context::use_board;
use crate::format::header_date;
use crate::store::{open_task_form, BoardUiStateStoreFields};

#[component]
pub fn BoardHeader(today: Option<NaiveDate>) -> impl IntoView {
    let ctx = use_board();
    let state = ctx.state;

    let task_count = move || ctx.with_tasks(|tasks| tasks.len());
    let members = move || state.users().with(|d| d.users().to_vec());

    view! {
        <header class="board-header">
            <div class="board-title">
                <h1>"Task Board"</h1>
                <span class="board-date">{header_date(today)}</span>
                <span class="board-count">{move || format!("{} tasks", task_count())}</span>
            </div>

            <div class="board-members">
                <For
                    each=members
                    key=|user: &User| user.id.clone()
                    children=move |user: User| {
                        let name = display_case(&user.name);
                        let title = match &user.designation {
                            Some(designation) => format!("{name} ({designation})"),
                            None => name.clone(),
                        };
                        view! {
                            <span class="member-avatar" title=title>{initial(&name)}</span>
                        }
                    }
                />
            </div>

            <div class="board-actions">
                <button class="header-btn" on:click=move |_| open_task_form(&state, None)>
                    "+ New task"
                </button>
                <button class="header-btn" on:click=move |_| state.member_open().update(|open| *open = !*open)>
                    "+ Add member"
                </button>
                <button
                    class="header-btn"
                    title="Reload from server"
                    on:click=move |_| spawn_local(async move {
                        ctx.reload().await;
                        ctx.reload_users().await;
                    })
                >
                    "Reload"
                </button>
            </div>
        </header>
    }
}
