pub mod api;
pub mod view;

use dew_api::v1::{Todo, TodoStatus};
use tracing::{error, warn};

pub use api::{Api, PushTodo, RemoveTodo, ReplaceTodo, UpdateTodos};

/// Client-side view filter, applied without a server round-trip.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Completed,
}

impl StatusFilter {
    pub fn matches(self, status: TodoStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Pending => status == TodoStatus::Pending,
            StatusFilter::Completed => status == TodoStatus::Completed,
        }
    }
}

/// Local mirror of the server's todos.
#[derive(Debug, Default)]
pub struct Data {
    pub todos: Vec<Todo>,
    pub filter: StatusFilter,
}

impl Data {
    pub fn get(&self, id: i64) -> Option<&Todo> {
        self.todos.iter().find(|todo| todo.id == id)
    }

    pub fn filtered(&self) -> impl Iterator<Item = &Todo> {
        let filter = self.filter;
        (self.todos.iter()).filter(move |todo| filter.matches(todo.status))
    }

    pub fn count(&self, status: TodoStatus) -> usize {
        (self.todos.iter()).filter(|todo| todo.status == status).count()
    }

    /// Applies the outcome of a remote call. Errors are logged and leave the
    /// local list untouched. Returns whether the command was applied.
    pub fn handle<C: Command>(&mut self, result: eyre::Result<C>) -> bool {
        match result {
            Ok(command) => {
                command.apply(self);
                true
            }
            Err(err) => {
                error!("{:?}", err);
                false
            }
        }
    }
}

/// A server response that can be merged into [`Data`].
pub trait Command {
    fn apply(self, data: &mut Data);
}

impl Command for UpdateTodos {
    fn apply(self, data: &mut Data) {
        data.todos = self.0;
    }
}

impl Command for PushTodo {
    fn apply(self, data: &mut Data) {
        data.todos.push(self.0);
    }
}

impl Command for ReplaceTodo {
    fn apply(self, data: &mut Data) {
        let todo = self.0;

        if let Some(local) = data.todos.iter_mut().find(|local| local.id == todo.id) {
            *local = todo;
        }
    }
}

impl Command for RemoveTodo {
    fn apply(self, data: &mut Data) {
        if !self.success {
            warn!(id = self.id, "todo was already deleted on the server");
        }

        data.todos.retain(|todo| todo.id != self.id);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    pub fn todo(id: i64, title: &str, status: TodoStatus) -> Todo {
        let created = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();

        Todo {
            id,
            title: String::from(title),
            description: None,
            status,
            created_at: created,
            updated_at: created,
        }
    }

    fn data() -> Data {
        let mut data = Data::default();
        data.handle(Ok(UpdateTodos(vec![
            todo(2, "Walk dog", TodoStatus::Completed),
            todo(1, "Buy milk", TodoStatus::Pending),
        ])));
        data
    }

    #[test]
    fn initial_load_replaces_everything() {
        let mut data = data();
        data.handle(Ok(UpdateTodos(vec![todo(5, "Other", TodoStatus::Pending)])));

        assert_eq!(data.todos.len(), 1);
        assert_eq!(data.todos[0].id, 5);
    }

    #[test]
    fn created_todo_is_appended() {
        let mut data = data();
        data.handle(Ok(PushTodo(todo(3, "Read", TodoStatus::Pending))));

        let ids: Vec<_> = data.todos.iter().map(|todo| todo.id).collect();
        assert_eq!(ids, [2, 1, 3]);
    }

    #[test]
    fn update_replaces_matching_todo() {
        let mut data = data();
        let mut updated = todo(1, "Buy oat milk", TodoStatus::Completed);
        updated.description = Some(String::from("2 litres"));

        data.handle(Ok(ReplaceTodo(updated.clone())));

        assert_eq!(data.get(1), Some(&updated));
        assert_eq!(data.todos[0].title, "Walk dog");
    }

    #[test]
    fn delete_removes_matching_todo() {
        let mut data = data();
        data.handle(Ok(RemoveTodo {
            id: 2,
            success: true,
        }));

        assert_eq!(data.todos.len(), 1);
        assert!(data.get(2).is_none());
    }

    #[test]
    fn failed_call_leaves_state_alone() {
        let mut data = data();

        let applied = data.handle::<RemoveTodo>(Err(eyre::eyre!("connection refused")));

        assert!(!applied);
        assert_eq!(data.todos.len(), 2);
    }

    #[test]
    fn filter_and_counts() {
        let mut data = data();
        assert_eq!(data.count(TodoStatus::Pending), 1);
        assert_eq!(data.count(TodoStatus::Completed), 1);
        assert_eq!(data.filtered().count(), 2);

        data.filter = StatusFilter::Completed;
        let titles: Vec<_> = data.filtered().map(|todo| todo.title.as_str()).collect();
        assert_eq!(titles, ["Walk dog"]);

        data.filter = StatusFilter::Pending;
        let titles: Vec<_> = data.filtered().map(|todo| todo.title.as_str()).collect();
        assert_eq!(titles, ["Buy milk"]);
    }
}
