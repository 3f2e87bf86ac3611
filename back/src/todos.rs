use dew_api::v1::{CreateTodo, DeleteResult, DeleteTodo, Patch, Todo, UpdateTodo};
use sqlx::{QueryBuilder, Sqlite};
use tracing::info;
use validator::Validate;

use crate::{
    db::{self, Db, TodoRow, TODO_COLUMNS},
    error::Error,
};

/// All todos, newest first. Rows created in the same microsecond come out in
/// reverse insertion order.
pub async fn get_todos(db: &Db) -> Result<Vec<Todo>, Error> {
    let rows: Vec<TodoRow> = sqlx::query_as(&format!(
        "SELECT {TODO_COLUMNS} FROM todos ORDER BY created_at DESC, id DESC"
    ))
    .fetch_all(db.pool())
    .await?;

    let todos = rows
        .into_iter()
        .map(TodoRow::into_todo)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(todos)
}

pub async fn create_todo(db: &Db, input: CreateTodo) -> Result<Todo, Error> {
    input.validate()?;

    let now = db::now_micros();
    let row: TodoRow = sqlx::query_as(&format!(
        "INSERT INTO todos (title, description, status, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?) RETURNING {TODO_COLUMNS}"
    ))
    .bind(input.title)
    .bind(input.description)
    .bind(input.status.unwrap_or_default().as_str())
    .bind(now)
    .bind(now)
    .fetch_one(db.pool())
    .await?;

    let todo = row.into_todo()?;

    info!(
        id = %todo.id,
        title = %todo.title,
        "created todo"
    );

    Ok(todo)
}

/// Applies a partial update in one statement.
///
/// `updated_at` becomes `max(now, updated_at + 1µs)` so that it moves forward
/// on every update even if the clock has not.
pub async fn update_todo(db: &Db, input: UpdateTodo) -> Result<Todo, Error> {
    input.validate()?;

    let UpdateTodo {
        id,
        title,
        description,
        status,
    } = input;

    let mut query = QueryBuilder::<Sqlite>::new("UPDATE todos SET updated_at = MAX(");
    query.push_bind(db::now_micros()).push(", updated_at + 1)");

    if let Some(title) = title {
        query.push(", title = ").push_bind(title);
    }

    if let Patch::Set(description) = description {
        query.push(", description = ").push_bind(description);
    }

    if let Some(status) = status {
        query.push(", status = ").push_bind(status.as_str());
    }

    query
        .push(" WHERE id = ")
        .push_bind(id)
        .push(" RETURNING ")
        .push(TODO_COLUMNS);

    let row = query
        .build_query_as::<TodoRow>()
        .fetch_optional(db.pool())
        .await?
        .ok_or(Error::NotFound(id))?;

    let todo = row.into_todo()?;

    info!(
        id = %todo.id,
        title = ?todo.title,
        status = ?todo.status,
        "updated todo"
    );

    Ok(todo)
}

/// Deleting an id that does not exist is reported through
/// [`DeleteResult::success`], not as an error.
pub async fn delete_todo(db: &Db, input: DeleteTodo) -> Result<DeleteResult, Error> {
    let result = sqlx::query("DELETE FROM todos WHERE id = ?")
        .bind(input.id)
        .execute(db.pool())
        .await?;

    let success = result.rows_affected() > 0;

    info!(id = %input.id, success, "deleted todo");

    Ok(DeleteResult { success })
}
