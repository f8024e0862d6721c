use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};
use uuid::Uuid;

pub const DEFAULT_USERNAME: &str = "demo";
pub const DEFAULT_PASSWORD: &str = "demo";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: Uuid,
    pub task: String,
    pub due_date: String,
    pub completed: bool,
}

/// Body of both create and update. Updates replace all three fields.
#[derive(Deserialize)]
pub struct TodoInput {
    pub task: String,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Deserialize)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Detail {
    pub detail: String,
}

pub type Db = Arc<RwLock<Vec<Todo>>>;

/// username -> password
pub type Accounts = HashMap<String, String>;

#[derive(Clone)]
pub struct AppState {
    todos: Db,
    accounts: Arc<Accounts>,
}

type Rejection = (StatusCode, Json<Detail>);

fn reject(status: StatusCode, detail: &str) -> Rejection {
    (
        status,
        Json(Detail {
            detail: detail.to_string(),
        }),
    )
}

pub fn default_accounts() -> Accounts {
    HashMap::from([(DEFAULT_USERNAME.to_string(), DEFAULT_PASSWORD.to_string())])
}

/// Parse `user:pass,user2:pass2`. Entries without a `:` are skipped.
pub fn parse_accounts(raw: &str) -> Accounts {
    raw.split(',')
        .filter_map(|entry| {
            let (user, pass) = entry.trim().split_once(':')?;
            (!user.is_empty()).then(|| (user.to_string(), pass.to_string()))
        })
        .collect()
}

pub fn app() -> Router {
    app_with_accounts(default_accounts())
}

pub fn app_with_accounts(accounts: Accounts) -> Router {
    let state = AppState {
        todos: Arc::new(RwLock::new(Vec::new())),
        accounts: Arc::new(accounts),
    };
    Router::new()
        .route("/login", post(login))
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/{id}", get(get_todo).put(update_todo).delete(delete_todo))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with_accounts(listener: TcpListener, accounts: Accounts) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_accounts(accounts)).await
}

fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Validate an input and fill in the due date.
fn normalize(input: TodoInput) -> Result<(String, String, bool), Rejection> {
    if input.task.trim().is_empty() {
        return Err(reject(StatusCode::UNPROCESSABLE_ENTITY, "task must not be empty"));
    }
    let due_date = match input.due_date {
        Some(d) if !d.trim().is_empty() => d,
        _ => now_iso(),
    };
    Ok((input.task, due_date, input.completed))
}

async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginInput>,
) -> Result<Json<Message>, Rejection> {
    match state.accounts.get(&input.username) {
        Some(password) if *password == input.password => {
            info!(username = %input.username, "login accepted");
            Ok(Json(Message {
                message: "Login successful".to_string(),
            }))
        }
        _ => {
            info!(username = %input.username, "login rejected");
            Err(reject(StatusCode::BAD_REQUEST, "Invalid credentials"))
        }
    }
}

async fn list_todos(State(state): State<AppState>) -> Json<Vec<Todo>> {
    let todos = state.todos.read().await;
    Json(todos.clone())
}

async fn create_todo(
    State(state): State<AppState>,
    Json(input): Json<TodoInput>,
) -> Result<(StatusCode, Json<Todo>), Rejection> {
    let (task, due_date, completed) = normalize(input)?;
    let todo = Todo {
        id: Uuid::new_v4(),
        task,
        due_date,
        completed,
    };
    debug!(id = %todo.id, "todo created");
    state.todos.write().await.push(todo.clone());
    Ok((StatusCode::CREATED, Json(todo)))
}

async fn get_todo(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Todo>, Rejection> {
    let todos = state.todos.read().await;
    todos
        .iter()
        .find(|t| t.id == id)
        .cloned()
        .map(Json)
        .ok_or_else(|| reject(StatusCode::NOT_FOUND, "Todo not found"))
}

async fn update_todo(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<TodoInput>,
) -> Result<Json<Todo>, Rejection> {
    let mut todos = state.todos.write().await;
    let todo = todos
        .iter_mut()
        .find(|t| t.id == id)
        .ok_or_else(|| reject(StatusCode::NOT_FOUND, "Todo not found"))?;
    let (task, due_date, completed) = normalize(input)?;
    todo.task = task;
    todo.due_date = due_date;
    todo.completed = completed;
    debug!(%id, "todo updated");
    Ok(Json(todo.clone()))
}

async fn delete_todo(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, Rejection> {
    let mut todos = state.todos.write().await;
    let pos = todos
        .iter()
        .position(|t| t.id == id)
        .ok_or_else(|| reject(StatusCode::NOT_FOUND, "Todo not found"))?;
    todos.remove(pos);
    debug!(%id, "todo deleted");
    Ok(StatusCode::NO_CONTENT)
}
