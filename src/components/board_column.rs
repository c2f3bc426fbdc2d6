//! Board Column Component
//!
//! One status column: a drop target for cards, showing the projected slice
//! with a "load more" control.

use chrono::NaiveDate;
use leptos::prelude::*;

use board_sync::{BoardView, Status, Task, TaskId};
use leptos_dragdrop::{make_on_mouseleave, make_on_target_mouseenter, DndSignals};

use crate::components::TaskCard;
use crate::context::use_board;
use crate::store::BoardUiStateStoreFields;

/// Render key covering every field a card displays
type CardKey = (
    TaskId,
    String,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<NaiveDate>,
    &'static str,
    &'static str,
);

fn card_key(task: &Task) -> CardKey {
    (
        task.id.clone(),
        task.title.clone(),
        task.description.clone(),
        task.assignee_id().map(ToString::to_string),
        task.assigned_user.as_ref().and_then(|u| u.name.clone()),
        task.due_date,
        task.priority.as_str(),
        task.status.as_str(),
    )
}

#[component]
pub fn BoardColumn(
    status: Status,
    board: Memo<BoardView>,
    dnd: DndSignals<TaskId, Status>,
    today: Option<NaiveDate>,
) -> impl IntoView {
    let state = use_board().state;

    let tasks = move || board.with(|b| b.column(status).tasks.clone());
    let total = move || board.with(|b| b.column(status).total);
    let hidden = move || board.with(|b| b.column(status).hidden());

    let on_mouseenter = make_on_target_mouseenter(dnd, status);
    let on_mouseleave = make_on_mouseleave(dnd);
    let is_drop_target = move || dnd.drop_target_read.get() == Some(status);
    let is_dragging = move || dnd.dragging_read.with(Option::is_some);

    view! {
        <section
            class=move || {
                if is_drop_target() {
                    "board-column drop-target"
                } else if is_dragging() {
                    "board-column drag-active"
                } else {
                    "board-column"
                }
            }
            data-status=status.as_str()
            on:mouseenter=on_mouseenter
            on:mouseleave=on_mouseleave
        >
            <header class="column-header">
                <h2>{status.label()}</h2>
                <span class="column-count">{total}</span>
            </header>

            <div class="column-cards">
                <For
                    each=tasks
                    key=card_key
                    children=move |task: Task| view! {
                        <TaskCard task=task dnd=dnd today=today />
                    }
                />
                <Show when=move || total() == 0>
                    <p class="column-empty">"No tasks"</p>
                </Show>
            </div>

            <Show when=move || (hidden() > 0)>
                <button
                    class="load-more-btn"
                    on:click=move |_| {
                        state.visible_counts().update(|counts| {
                            counts.load_more(status);
                        });
                    }
                >
                    {move || format!("Load more ({} hidden)", hidden())}
                </button>
            </Show>
        </section>
    }
}
