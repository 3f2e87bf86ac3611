use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use dew_api::v1::{CreateTodo, DeleteResult, DeleteTodo, Todo, UpdateTodo};

use crate::{error::Error, todos, AppState};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/getTodos", get(get_todos))
        .route("/createTodo", post(create_todo))
        .route("/updateTodo", post(update_todo))
        .route("/deleteTodo", post(delete_todo))
}

async fn get_todos(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Todo>>, Error> {
    todos::get_todos(&state.db).await.map(Json)
}

async fn create_todo(
    State(state): State<Arc<AppState>>,
    input: Result<Json<CreateTodo>, JsonRejection>,
) -> Result<Json<Todo>, Error> {
    let Json(input) = input?;
    todos::create_todo(&state.db, input).await.map(Json)
}

async fn update_todo(
    State(state): State<Arc<AppState>>,
    input: Result<Json<UpdateTodo>, JsonRejection>,
) -> Result<Json<Todo>, Error> {
    let Json(input) = input?;
    todos::update_todo(&state.db, input).await.map(Json)
}

async fn delete_todo(
    State(state): State<Arc<AppState>>,
    input: Result<Json<DeleteTodo>, JsonRejection>,
) -> Result<Json<DeleteResult>, Error> {
    let Json(input) = input?;
    todos::delete_todo(&state.db, input).await.map(Json)
}
