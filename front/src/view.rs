use std::fmt;

use chrono::{DateTime, Utc};
use dew_api::v1::{Todo, TodoStatus};

use crate::{Data, StatusFilter};

const TIME_FORMAT: &str = "%b %-d, %Y %H:%M";

/// The todo list: status counts, then every todo passing the current filter.
pub struct ListView<'a>(pub &'a Data);

impl fmt::Display for ListView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.0;

        writeln!(
            f,
            "Todo Manager: {} pending, {} completed",
            data.count(TodoStatus::Pending),
            data.count(TodoStatus::Completed),
        )?;

        let mut empty = true;
        for todo in data.filtered() {
            empty = false;
            write!(f, "{}", ItemView(todo))?;
        }

        if empty {
            writeln!(f, "{}", empty_message(data.filter))?;
        }

        Ok(())
    }
}

fn empty_message(filter: StatusFilter) -> &'static str {
    match filter {
        StatusFilter::All => "No todos yet. Create your first one!",
        StatusFilter::Pending => "No pending todos found.",
        StatusFilter::Completed => "No completed todos found.",
    }
}

/// One entry of [`ListView`].
pub struct ItemView<'a>(pub &'a Todo);

impl fmt::Display for ItemView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let todo = self.0;

        let check = match todo.status {
            TodoStatus::Pending => "[ ]",
            TodoStatus::Completed => "[x]",
        };

        writeln!(f, "{} #{} {} ({})", check, todo.id, todo.title, todo.status)?;

        if let Some(description) = &todo.description {
            writeln!(f, "      {}", description)?;
        }

        writeln!(
            f,
            "      created {}, updated {}",
            time(todo.created_at),
            time(todo.updated_at),
        )
    }
}

/// Every field of a single todo.
pub struct TodoView<'a>(pub &'a Todo);

impl fmt::Display for TodoView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let todo = self.0;

        writeln!(f, "#{} {}", todo.id, todo.title)?;
        writeln!(f, "status:      {}", todo.status)?;
        writeln!(
            f,
            "description: {}",
            todo.description.as_deref().unwrap_or("-")
        )?;
        writeln!(f, "created:     {}", time(todo.created_at))?;
        writeln!(f, "updated:     {}", time(todo.updated_at))
    }
}

fn time(time: DateTime<Utc>) -> String {
    time.format(TIME_FORMAT).to_string()
}
