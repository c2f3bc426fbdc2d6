//! Task Card Component
//!
//! A draggable card with the quick actions: status cycle, done checkbox,
//! edit and delete.

use chrono::NaiveDate;
use leptos::prelude::*;

use board_sync::{next_status, Status, Task, TaskId};
use leptos_dragdrop::{make_on_mousedown, DndSignals};

use crate::components::DeleteConfirmButton;
use crate::context::use_board;
use crate::format::due_label;
use crate::store::{open_task_form, BoardUiStateStoreFields};

#[component]
pub fn TaskCard(
    task: Task,
    dnd: DndSignals<TaskId, Status>,
    today: Option<NaiveDate>,
) -> impl IntoView {
    let ctx = use_board();
    let state = ctx.state;

    let id = task.id.clone();
    let pending = id.is_provisional();
    let overdue = today.is_some_and(|day| task.is_overdue(day));
    let done = task.status == Status::Done;

    let on_mousedown = make_on_mousedown(dnd, id.clone());
    let is_dragging = {
        let id = id.clone();
        move || dnd.dragging_read.with(|d| d.as_ref() == Some(&id))
    };

    let card_class = move || {
        let mut class = String::from("task-card");
        if is_dragging() { class.push_str(" dragging"); }
        if overdue { class.push_str(" overdue"); }
        if pending { class.push_str(" pending"); }
        class
    };

    let assignee = {
        let task = task.clone();
        move || state.users().with(|users| users.assignee_label(&task))
    };

    let cycle = {
        let id = id.clone();
        move |ev: web_sys::MouseEvent| {
            ev.stop_propagation();
            ctx.run(ctx.mutator().cycle_status(&id));
        }
    };
    let toggle_done = {
        let id = id.clone();
        move |ev: web_sys::Event| {
            ctx.run(ctx.mutator().set_done(&id, event_target_checked(&ev)));
        }
    };
    let edit = {
        let id = id.clone();
        move |ev: web_sys::MouseEvent| {
            ev.stop_propagation();
            open_task_form(&state, Some(id.clone()));
        }
    };
    let delete = {
        let id = id.clone();
        move |_: ()| ctx.run(ctx.mutator().delete(&id))
    };

    view! {
        <article class=card_class data-priority=task.priority.as_str() on:mousedown=on_mousedown>
            <div class="card-top">
                <label class="card-done">
                    <input type="checkbox" prop:checked=done on:change=toggle_done />
                </label>
                <h3 class="card-title">{task.title.clone()}</h3>
                <span class="card-priority">{task.priority.label()}</span>
            </div>

            {task.description.clone().map(|text| view! {
                <p class="card-description">{text}</p>
            })}

            <div class="card-meta">
                <span class="card-assignee">{assignee}</span>
                <span class="card-due">{due_label(task.due_date)}</span>
            </div>

            <div class="card-actions">
                <button
                    class="card-btn status-btn"
                    title=format!("Move to {}", next_status(task.status).label())
                    on:click=cycle
                >
                    {task.status.label()}
                </button>
                <button class="card-btn edit-btn" on:click=edit>"Edit"</button>
                <DeleteConfirmButton on_confirm=Callback::new(delete) />
            </div>
        </article>
    }
}
