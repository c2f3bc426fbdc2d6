//! Board Projector
//!
//! Derives the visible slice of each status column from the task store.
//! Paging is a rendering concern over the already loaded collection:
//! "load more" reveals tasks, it never fetches.

use crate::config::{BoardConfig, DEFAULT_PAGE_SIZE, DEFAULT_PAGE_STEP};
use crate::domain::{Status, Task};

/// How many tasks each column shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleCounts {
    counts: [usize; 4],
    step: usize,
}

impl Default for VisibleCounts {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE, DEFAULT_PAGE_STEP)
    }
}

impl VisibleCounts {
    pub fn new(page_size: usize, step: usize) -> Self {
        Self {
            counts: [page_size; 4],
            step: step.max(1),
        }
    }

    pub fn from_config(config: &BoardConfig) -> Self {
        Self::new(config.page_size, config.page_step)
    }

    pub fn get(&self, status: Status) -> usize {
        self.counts[status.index()]
    }

    /// Reveal one more page of `status`; returns the new count
    pub fn load_more(&mut self, status: Status) -> usize {
        let count = &mut self.counts[status.index()];
        *count = count.saturating_add(self.step);
        *count
    }
}

/// One rendered column
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnView {
    pub status: Status,
    /// Visible tasks, in store order
    pub tasks: Vec<Task>,
    /// All tasks with this status
    pub total: usize,
}

impl ColumnView {
    pub fn has_more(&self) -> bool {
        self.total > self.tasks.len()
    }

    pub fn hidden(&self) -> usize {
        self.total - self.tasks.len()
    }
}

/// The four columns in workflow order
#[derive(Debug, Clone, PartialEq)]
pub struct BoardView {
    columns: Vec<ColumnView>,
}

impl BoardView {
    pub fn column(&self, status: Status) -> &ColumnView {
        &self.columns[status.index()]
    }

    pub fn columns(&self) -> &[ColumnView] {
        &self.columns
    }

    pub fn into_columns(self) -> Vec<ColumnView> {
        self.columns
    }
}

/// Group tasks by status, keep input order, truncate each group to its visible count
pub fn project<'a>(tasks: impl IntoIterator<Item = &'a Task>, counts: &VisibleCounts) -> BoardView {
    let mut columns: Vec<ColumnView> = Status::ALL
        .iter()
        .map(|&status| ColumnView {
            status,
            tasks: Vec::new(),
            total: 0,
        })
        .collect();

    for task in tasks {
        let column = &mut columns[task.status.index()];
        column.total += 1;
        if column.tasks.len() < counts.get(task.status) {
            column.tasks.push(task.clone());
        }
    }

    BoardView { columns }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TaskId;

    fn todo_tasks(n: u64) -> Vec<Task> {
        (1..=n).map(|i| Task::new(i, format!("task {i}"))).collect()
    }

    #[test]
    fn test_five_todos_page_of_four_then_all() {
        let tasks = todo_tasks(5);
        let mut counts = VisibleCounts::default();

        let view = project(&tasks, &counts);
        assert_eq!(view.column(Status::ToDo).tasks.len(), 4);
        assert!(view.column(Status::ToDo).has_more());
        assert_eq!(view.column(Status::ToDo).hidden(), 1);

        counts.load_more(Status::ToDo);
        let view = project(&tasks, &counts);
        assert_eq!(view.column(Status::ToDo).tasks, tasks);
        assert!(!view.column(Status::ToDo).has_more());
    }

    #[test]
    fn test_projection_is_repeatable() {
        let mut tasks = todo_tasks(6);
        tasks[1].status = Status::Done;
        tasks[4].status = Status::InProgress;
        let counts = VisibleCounts::new(2, 2);

        assert_eq!(project(&tasks, &counts), project(&tasks, &counts));
    }

    #[test]
    fn test_columns_follow_status_and_store_order() {
        let tasks = vec![
            Task::new(1, "a").with_status(Status::Done),
            Task::new(2, "b"),
            Task::new(3, "c").with_status(Status::Done),
            Task::new(4, "d").with_status(Status::NeedReview),
        ];
        let view = project(&tasks, &VisibleCounts::default());

        let ids = |status| -> Vec<TaskId> { view.column(status).tasks.iter().map(|t| t.id.clone()).collect() };
        assert_eq!(ids(Status::Done), vec![TaskId::Num(1), TaskId::Num(3)]);
        assert_eq!(ids(Status::ToDo), vec![TaskId::Num(2)]);
        assert_eq!(ids(Status::NeedReview), vec![TaskId::Num(4)]);
        assert!(ids(Status::InProgress).is_empty());
        let order: Vec<_> = view.columns().iter().map(|c| c.status).collect();
        assert_eq!(order, Status::ALL.to_vec());
    }

    #[test]
    fn test_load_more_is_monotonic() {
        let tasks = todo_tasks(13);
        let mut counts = VisibleCounts::default();
        for status in Status::ALL {
            let mut shown = project(&tasks, &counts).column(status).tasks.len();
            for _ in 0..5 {
                let before = counts.get(status);
                assert!(counts.load_more(status) > before);
                let now = project(&tasks, &counts).column(status).tasks.len();
                assert!(now >= shown);
                shown = now;
            }
        }
        assert_eq!(project(&tasks, &counts).column(Status::ToDo).tasks.len(), 13);
    }

    #[test]
    fn test_load_more_touches_one_column() {
        let mut counts = VisibleCounts::default();
        counts.load_more(Status::NeedReview);
        assert_eq!(counts.get(Status::NeedReview), 8);
        assert_eq!(counts.get(Status::ToDo), 4);
        assert_eq!(counts.get(Status::Done), 4);
    }

    #[test]
    fn test_counts_from_config() {
        let config = BoardConfig {
            page_size: 2,
            page_step: 3,
            ..BoardConfig::default()
        };
        let mut counts = VisibleCounts::from_config(&config);
        assert_eq!(counts.get(Status::InProgress), 2);
        assert_eq!(counts.load_more(Status::InProgress), 5);
    }
}
