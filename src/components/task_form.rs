//! Task Form Component
//!
//! Create and edit form. Editing starts from the local copy and then
//! switches to the freshest server copy of the task, unless the user has
//! already started typing.

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{debug, warn};

use board_sync::{display_case, parse_due_date, NewTask, Priority, Status, Task, TaskId, TaskPatch, User, UserId};

use crate::context::use_board;
use crate::format::date_input_value;
use crate::store::{close_task_form, BoardUiStateStoreFields};

/// Suggestions shown under the assignee search
const MAX_SUGGESTIONS: usize = 6;

/// Form contents
#[derive(Debug, Clone, Default, PartialEq)]
struct FormFields {
    title: String,
    description: String,
    user_id: Option<UserId>,
    /// Text in the assignee search box
    user_query: String,
    /// `YYYY-MM-DD` from the date input, empty for none
    due: String,
    priority: Priority,
    status: Status,
    /// Set by the first user edit
    touched: bool,
}

impl FormFields {
    /// `assignee` is the label shown for the task's current assignee
    fn from_task(task: &Task, assignee: String) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            user_id: task.assignee_id().cloned(),
            user_query: if task.assignee_id().is_some() { assignee } else { String::new() },
            due: date_input_value(task.due_date),
            priority: task.priority,
            status: task.status,
            touched: false,
        }
    }

    /// Replace the contents with a fresher copy; edited forms are left alone
    fn refresh_from(&mut self, task: &Task, assignee: String) -> bool {
        if self.touched {
            return false;
        }
        *self = Self::from_task(task, assignee);
        true
    }

    fn set_user_query(&mut self, query: String) {
        if query.trim().is_empty() {
            self.user_id = None;
        }
        self.user_query = query;
    }

    fn to_draft(&self) -> NewTask {
        NewTask {
            title: self.title.clone(),
            description: Some(self.description.clone()),
            user_id: self.user_id.clone(),
            due_date: parse_due_date(&self.due),
            priority: self.priority,
            status: self.status,
        }
    }
}

/// Apply a user edit
fn edit(fields: RwSignal<FormFields>, change: impl FnOnce(&mut FormFields)) {
    fields.update(|f| {
        change(f);
        f.touched = true;
    });
}

#[component]
pub fn TaskForm(editing: Option<TaskId>) -> impl IntoView {
    let ctx = use_board();
    let state = ctx.state;

    let fields = RwSignal::new(FormFields::default());
    let (picking_user, set_picking_user) = signal(false);
    let (error_text, set_error_text) = signal(None::<String>);

    let assignee_of = move |task: &Task| state.users().with_untracked(|users| users.assignee_label(task));

    if let Some(id) = editing.clone() {
        if let Some(task) = ctx.mutator().store().get(&id) {
            fields.set(FormFields::from_task(&task, assignee_of(&task)));
        }
        if !id.is_provisional() {
            spawn_local(async move {
                match ctx.mutator().fetch_fresh(&id).await {
                    Ok(task) => {
                        let label = assignee_of(&task);
                        let refreshed = fields
                            .try_update(|f| f.refresh_from(&task, label))
                            .unwrap_or(false);
                        if !refreshed {
                            debug!("form for task {id} already edited, keeping input");
                        }
                    }
                    Err(e) => warn!("using local copy of task {id} for editing: {e}"),
                }
            });
        }
    }

    let suggestions = move || {
        let query = fields.with(|f| f.user_query.clone());
        state.users().with(|users| {
            users
                .search(&query)
                .into_iter()
                .take(MAX_SUGGESTIONS)
                .cloned()
                .collect::<Vec<User>>()
        })
    };

    let heading = if editing.is_some() { "Edit task" } else { "New task" };
    let submit_label = if editing.is_some() { "Save" } else { "Create" };

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let draft = fields.with_untracked(FormFields::to_draft);
        let mutator = ctx.mutator();
        let pending = match &editing {
            Some(id) => draft
                .validate()
                .map(|draft| mutator.mutate(id, TaskPatch::from_draft(&draft))),
            None => mutator.create(draft),
        };
        match pending {
            Ok(pending) => {
                close_task_form(&state);
                ctx.run(pending);
            }
            Err(e) => set_error_text.set(Some(e.to_string())),
        }
    };

    view! {
        <form class="task-form" on:submit=submit>
            <h2>{heading}</h2>

            <input
                type="text"
                class="form-title"
                placeholder="Title"
                prop:value=move || fields.with(|f| f.title.clone())
                on:input=move |ev| {
                    edit(fields, |f| f.title = event_target_value(&ev));
                    set_error_text.set(None);
                }
            />

            <textarea
                class="form-description"
                placeholder="Description"
                prop:value=move || fields.with(|f| f.description.clone())
                on:input=move |ev| edit(fields, |f| f.description = event_target_value(&ev))
            />

            <div class="form-assignee">
                <input
                    type="text"
                    placeholder="Assign to..."
                    prop:value=move || fields.with(|f| f.user_query.clone())
                    on:focus=move |_| set_picking_user.set(true)
                    on:input=move |ev| {
                        edit(fields, |f| f.set_user_query(event_target_value(&ev)));
                        set_picking_user.set(true);
                    }
                />
                <Show when=move || picking_user.get()>
                    <ul class="assignee-suggestions">
                        <For
                            each=suggestions
                            key=|user: &User| user.id.clone()
                            children=move |user: User| {
                                let name = display_case(&user.name);
                                let label = name.clone();
                                view! {
                                    <li
                                        class="assignee-option"
                                        on:mousedown=move |ev| {
                                            ev.prevent_default();
                                            edit(fields, |f| {
                                                f.user_id = Some(user.id.clone());
                                                f.user_query = name.clone();
                                            });
                                            set_picking_user.set(false);
                                        }
                                    >
                                        {label}
                                    </li>
                                }
                            }
                        />
                    </ul>
                </Show>
            </div>

            <div class="form-row">
                <input
                    type="date"
                    prop:value=move || fields.with(|f| f.due.clone())
                    on:input=move |ev| edit(fields, |f| f.due = event_target_value(&ev))
                />

                <select on:change=move |ev| edit(fields, |f| f.priority = Priority::parse_lenient(&event_target_value(&ev)))>
                    {Priority::ALL.iter().map(|&p| view! {
                        <option value=p.as_str() selected=move || fields.with(|f| f.priority == p)>{p.label()}</option>
                    }).collect_view()}
                </select>

                <select on:change=move |ev| edit(fields, |f| f.status = Status::parse_lenient(&event_target_value(&ev)))>
                    {Status::ALL.iter().map(|&s| view! {
                        <option value=s.as_str() selected=move || fields.with(|f| f.status == s)>{s.label()}</option>
                    }).collect_view()}
                </select>
            </div>

            {move || error_text.get().map(|text| view! { <p class="form-error">{text}</p> })}

            <div class="form-actions">
                <button type="submit">{submit_label}</button>
                <button type="button" class="cancel-btn" on:click=move |_| close_task_form(&state)>
                    "Cancel"
                </button>
            </div>
        </form>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn assigned_task() -> Task {
        let mut task = Task::new(1, "Write report").with_due_date(NaiveDate::from_ymd_opt(2026, 11, 3).unwrap());
        task.user_id = Some(UserId::Num(3));
        task
    }

    #[test]
    fn test_from_task() {
        let fields = FormFields::from_task(&assigned_task(), "Ada".to_string());
        assert_eq!(fields.title, "Write report");
        assert_eq!(fields.user_id, Some(UserId::Num(3)));
        assert_eq!(fields.user_query, "Ada");
        assert_eq!(fields.due, "2026-11-03");
        assert!(!fields.touched);

        let unassigned = FormFields::from_task(&Task::new(2, "x"), "Unassigned".to_string());
        assert_eq!(unassigned.user_query, "");
    }

    #[test]
    fn test_fresh_copy_replaces_untouched_form() {
        let mut fields = FormFields::from_task(&assigned_task(), "Ada".to_string());
        let mut fresh = assigned_task();
        fresh.title = "Write report v2".to_string();

        assert!(fields.refresh_from(&fresh, "Ada".to_string()));
        assert_eq!(fields.title, "Write report v2");
    }

    #[test]
    fn test_fresh_copy_does_not_overwrite_user_input() {
        let mut fields = FormFields::from_task(&assigned_task(), "Ada".to_string());
        fields.title = "My edit".to_string();
        fields.touched = true;
        let mut fresh = assigned_task();
        fresh.title = "Server title".to_string();

        assert!(!fields.refresh_from(&fresh, "Ada".to_string()));
        assert_eq!(fields.title, "My edit");
    }

    #[test]
    fn test_cleared_fields_reach_the_patch() {
        let mut fields = FormFields::from_task(&assigned_task(), "Ada".to_string());
        fields.set_user_query("  ".to_string());
        fields.due.clear();

        let patch = TaskPatch::from_draft(&fields.to_draft());
        assert_eq!(patch.user_id, Some(None));
        assert_eq!(patch.due_date, Some(None));
    }
}
