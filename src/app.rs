//! Task Board Frontend App
//!
//! Header, failure banner, optional forms and the four status columns.

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::debug;
use reactive_stores::Store;

use board_sync::{project, HttpTaskService, OptimisticMutator, Status, TaskId};
use leptos_dragdrop::{bind_global_mouseup, create_dnd_signals};

use crate::components::{AddMemberForm, BoardColumn, BoardHeader, FailureBanner, TaskForm};
use crate::config;
use crate::context::BoardContext;
use crate::format;
use crate::store::{BoardUiState, BoardUiStateStoreFields};

#[component]
pub fn App() -> impl IntoView {
    let config = config::load();
    let mutator = OptimisticMutator::new(HttpTaskService::new(&config));
    let state = Store::new(BoardUiState::new(&config));
    let ctx = BoardContext::new(mutator, state);

    // Provide context to all children
    provide_context(ctx);

    // Load tasks and members on mount
    spawn_local(async move { ctx.reload().await });
    spawn_local(async move { ctx.reload_users().await });

    let today = format::today();

    // Columns re-project when the task store or the paging changes
    let board = Memo::new(move |_| {
        let counts = state.visible_counts().get();
        ctx.with_tasks(|tasks| project(tasks, &counts))
    });

    // Drag a card onto a column to change its status
    let dnd = create_dnd_signals::<TaskId, Status>();
    bind_global_mouseup(dnd, move |dragged: TaskId, target: Option<Status>| {
        debug!("drop: task={dragged}, column={target:?}");
        if let Some(pending) = ctx.mutator().on_drop(&dragged, target) {
            ctx.run(pending);
        }
    });

    view! {
        <div class="board-app">
            <BoardHeader today=today />

            <FailureBanner />

            {move || state.form_open().get().then(|| {
                view! { <TaskForm editing=state.editing().get() /> }
            })}

            <Show when=move || state.member_open().get()>
                <AddMemberForm />
            </Show>

            <main class="board-columns">
                {Status::ALL.iter().map(|&status| view! {
                    <BoardColumn status=status board=board dnd=dnd today=today />
                }).collect_view()}
            </main>
        </div>
    }
}
