//! In-memory transports for unit tests.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};

use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport};
use crate::types::{Credentials, TodoId, TodoItem, TodoPayload};

pub const BASE_URL: &str = "http://todo.test";

/// Replays canned outcomes in order and records every request.
pub struct ScriptedTransport {
    outcomes: RefCell<VecDeque<Result<HttpResponse, TransportError>>>,
    requests: RefCell<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new(outcomes: Vec<Result<HttpResponse, TransportError>>) -> Self {
        Self {
            outcomes: RefCell::new(outcomes.into()),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }
}

impl Transport for ScriptedTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.borrow_mut().push(request.clone());
        self.outcomes
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::new("script exhausted")))
    }
}

/// A tiny stand-in for the remote service: accounts plus a todo list.
#[derive(Default)]
pub struct FakeService {
    accounts: HashMap<String, String>,
    todos: RefCell<Vec<TodoItem>>,
    next_id: Cell<u64>,
    requests: RefCell<Vec<HttpRequest>>,
}

impl FakeService {
    pub fn with_account(username: &str, password: &str) -> Self {
        let mut service = Self::default();
        service
            .accounts
            .insert(username.to_string(), password.to_string());
        service
    }

    pub fn seed(&self, task: &str, due_date: &str, completed: bool) -> TodoId {
        let id = self.allocate_id();
        self.todos.borrow_mut().push(TodoItem {
            id: id.clone(),
            task: task.to_string(),
            due_date: due_date.to_string(),
            completed,
        });
        id
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }

    pub fn requests_to(&self, method: HttpMethod, path: &str) -> Vec<HttpRequest> {
        let full = format!("{BASE_URL}{path}");
        self.requests
            .borrow()
            .iter()
            .filter(|r| r.method == method && r.path == full)
            .cloned()
            .collect()
    }

    fn allocate_id(&self) -> TodoId {
        let n = self.next_id.get() + 1;
        self.next_id.set(n);
        TodoId::new(n.to_string())
    }

    fn route(&self, request: &HttpRequest) -> HttpResponse {
        let path = request.path.strip_prefix(BASE_URL).unwrap_or(&request.path);
        let body = request.body.as_deref().unwrap_or("");
        match (request.method, path) {
            (HttpMethod::Post, "/login") => match serde_json::from_str::<Credentials>(body) {
                Ok(c) if self.accounts.get(&c.username) == Some(&c.password) => {
                    json(200, r#"{"message":"Login successful"}"#)
                }
                _ => json(400, r#"{"detail":"Invalid credentials"}"#),
            },
            (HttpMethod::Get, "/todos") => {
                json(200, &serde_json::to_string(&*self.todos.borrow()).unwrap_or_default())
            }
            (HttpMethod::Post, "/todos") => match serde_json::from_str::<TodoPayload>(body) {
                Ok(p) => {
                    let item = TodoItem {
                        id: self.allocate_id(),
                        task: p.task,
                        due_date: p.due_date,
                        completed: p.completed,
                    };
                    self.todos.borrow_mut().push(item.clone());
                    json(201, &serde_json::to_string(&item).unwrap_or_default())
                }
                Err(_) => json(422, r#"{"detail":"invalid body"}"#),
            },
            (method, path) => {
                let Some(id) = path.strip_prefix("/todos/") else {
                    return json(404, "");
                };
                let mut todos = self.todos.borrow_mut();
                let Some(pos) = todos.iter().position(|t| t.id.as_str() == id) else {
                    return json(404, r#"{"detail":"Todo not found"}"#);
                };
                match method {
                    HttpMethod::Put => match serde_json::from_str::<TodoPayload>(body) {
                        Ok(p) => {
                            let todo = &mut todos[pos];
                            todo.task = p.task;
                            todo.due_date = p.due_date;
                            todo.completed = p.completed;
                            json(200, &serde_json::to_string(&*todo).unwrap_or_default())
                        }
                        Err(_) => json(422, r#"{"detail":"invalid body"}"#),
                    },
                    HttpMethod::Delete => {
                        todos.remove(pos);
                        json(204, "")
                    }
                    HttpMethod::Get => json(200, &serde_json::to_string(&todos[pos]).unwrap_or_default()),
                    HttpMethod::Post => json(405, ""),
                }
            }
        }
    }
}

impl Transport for FakeService {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.borrow_mut().push(request.clone());
        Ok(self.route(request))
    }
}

fn json(status: u16, body: &str) -> HttpResponse {
    HttpResponse {
        status,
        headers: vec![("content-type".to_string(), "application/json".to_string())],
        body: body.to_string(),
    }
}
