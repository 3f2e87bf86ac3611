use std::future::Future;

use dew_api::v1::{CreateTodo, DeleteResult, DeleteTodo, ErrorBody, Todo, UpdateTodo};
use eyre::Context;
use serde::de::DeserializeOwned;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:7890/api/v1";

/// Replaces the whole local list.
pub struct UpdateTodos(pub Vec<Todo>);
/// Appends a freshly created todo.
pub struct PushTodo(pub Todo);
/// Replaces the local todo with the same id.
pub struct ReplaceTodo(pub Todo);
/// Drops the local todo with this id.
pub struct RemoveTodo {
    pub id: i64,
    pub success: bool,
}

/// Client for the `/api/v1` procedures.
#[derive(Clone, Debug)]
pub struct Api {
    client: reqwest::Client,
    url: String,
}

impl Api {
    pub fn new(url: impl Into<String>) -> Self {
        let mut url = url.into();
        while url.ends_with('/') {
            url.pop();
        }

        Self {
            client: reqwest::Client::new(),
            url,
        }
    }

    fn endpoint(&self, procedure: &str) -> String {
        format!("{}/{}", self.url, procedure)
    }

    pub async fn get_todos(&self) -> eyre::Result<UpdateTodos> {
        let api = self.clone();
        spawn(async move {
            let response = api.client.get(api.endpoint("getTodos")).send().await?;
            Ok(UpdateTodos(decode(response).await?))
        })
        .await
        .wrap_err("failed to load todos")
    }

    pub async fn create_todo(&self, input: CreateTodo) -> eyre::Result<PushTodo> {
        let api = self.clone();
        spawn(async move {
            let response = api
                .client
                .post(api.endpoint("createTodo"))
                .json(&input)
                .send()
                .await?;

            Ok(PushTodo(decode(response).await?))
        })
        .await
        .wrap_err("failed to create todo")
    }

    pub async fn update_todo(&self, input: UpdateTodo) -> eyre::Result<ReplaceTodo> {
        let api = self.clone();
        let id = input.id;
        spawn(async move {
            let response = api
                .client
                .post(api.endpoint("updateTodo"))
                .json(&input)
                .send()
                .await?;

            Ok(ReplaceTodo(decode(response).await?))
        })
        .await
        .wrap_err_with(|| format!("failed to update todo {}", id))
    }

    pub async fn toggle_todo(&self, todo: &Todo) -> eyre::Result<ReplaceTodo> {
        self.update_todo(UpdateTodo::toggle(todo)).await
    }

    pub async fn delete_todo(&self, id: i64) -> eyre::Result<RemoveTodo> {
        let api = self.clone();
        spawn(async move {
            let response = api
                .client
                .post(api.endpoint("deleteTodo"))
                .json(&DeleteTodo { id })
                .send()
                .await?;

            let DeleteResult { success } = decode(response).await?;
            Ok(RemoveTodo { id, success })
        })
        .await
        .wrap_err_with(|| format!("failed to delete todo {}", id))
    }
}

/// Decodes a successful response body, or turns the server's [`ErrorBody`]
/// into an error.
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> eyre::Result<T> {
    let status = response.status();

    if status.is_success() {
        return Ok(response.json().await?);
    }

    match response.json::<ErrorBody>().await {
        Ok(body) => eyre::bail!("{} ({:?}, {})", body.message, body.kind, status),
        Err(_) => eyre::bail!("request failed with {}", status),
    }
}

pub async fn spawn<T: Send + 'static>(
    fut: impl Future<Output = eyre::Result<T>> + Send + 'static,
) -> eyre::Result<T> {
    tokio::spawn(fut)
        .await
        .wrap_err("Tokio error")
        .and_then(|r| r)
}
