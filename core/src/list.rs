//! List screen: the local mirror of the server's todo list and the
//! create/edit form.
//!
//! # Design
//! - The server is the only source of truth. Every mutation is followed by a
//!   full `GET /todos` and the local list is replaced wholesale; mutation
//!   responses are checked for status only; their bodies are ignored.
//! - Whether the form creates or updates is an explicit `FormMode`, never a
//!   nullable id.
//! - Fetch and mutation failures never stop the flow. They are logged and
//!   pushed onto a queue of dismissible notices; a failed refresh keeps the
//!   previous snapshot on screen.
//! - A repeated failure bumps the count of the notice already queued for it,
//!   and the queue keeps at most `MAX_NOTICES` entries, dropping the oldest.

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::{debug, warn};

use crate::client::TodoClient;
use crate::error::{ApiError, FetchError, MutationError, MutationKind, ValidationError};
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::types::{TodoId, TodoItem, TodoPayload};

/// What submitting the form will do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Creating,
    Editing(TodoId),
}

/// Working state of the create/edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoForm {
    pub task: String,
    /// Empty means "now" at submit time.
    pub due_date: String,
    pub completed: bool,
}

impl TodoForm {
    pub fn to_payload(&self, now: DateTime<Utc>) -> Result<TodoPayload, ValidationError> {
        if self.task.trim().is_empty() {
            return Err(ValidationError::TaskRequired);
        }
        let due_date = if self.due_date.trim().is_empty() {
            now.to_rfc3339_opts(SecondsFormat::Millis, true)
        } else {
            self.due_date.trim().to_string()
        };
        Ok(TodoPayload {
            task: self.task.clone(),
            due_date,
            completed: self.completed,
        })
    }
}

/// Upper bound on queued notices.
pub const MAX_NOTICES: usize = 32;

/// A failure the user can look at and dismiss.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    /// How many times this failure has occurred since it was queued.
    pub count: usize,
}

/// Result of a mutation followed by its resynchronizing refresh.
#[derive(Debug)]
pub struct SyncOutcome {
    pub kind: MutationKind,
    pub mutation: Result<(), MutationError>,
    pub refresh: Result<(), FetchError>,
}

impl SyncOutcome {
    pub fn is_ok(&self) -> bool {
        self.mutation.is_ok() && self.refresh.is_ok()
    }
}

pub struct ListManager<T> {
    client: TodoClient,
    transport: T,
    items: Vec<TodoItem>,
    form: TodoForm,
    mode: FormMode,
    notices: Vec<Notice>,
    clock: fn() -> DateTime<Utc>,
}

impl<T: Transport> ListManager<T> {
    pub fn new(client: TodoClient, transport: T) -> Self {
        Self {
            client,
            transport,
            items: Vec::new(),
            form: TodoForm::default(),
            mode: FormMode::Creating,
            notices: Vec::new(),
            clock: Utc::now,
        }
    }

    /// Replace the source of "now" used for defaulted due dates.
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    pub fn items(&self) -> &[TodoItem] {
        &self.items
    }

    pub fn form(&self) -> &TodoForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut TodoForm {
        &mut self.form
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    /// Label for the form's submit control.
    pub fn submit_label(&self) -> &'static str {
        match self.mode {
            FormMode::Creating => "Add Todo",
            FormMode::Editing(_) => "Update Todo",
        }
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn dismiss_notice(&mut self, index: usize) -> Option<Notice> {
        (index < self.notices.len()).then(|| self.notices.remove(index))
    }

    pub fn clear_notices(&mut self) {
        self.notices.clear();
    }

    /// Initial load when the list screen is shown.
    pub fn activate(&mut self) -> Result<&[TodoItem], FetchError> {
        self.refresh()
    }

    /// Fetch the full list and replace the local copy. On failure the previous
    /// list is kept.
    pub fn refresh(&mut self) -> Result<&[TodoItem], FetchError> {
        self.reload()?;
        Ok(&self.items)
    }

    /// Create or update depending on the form mode, then reset the form and
    /// refresh. Only an empty task stops this before any request is sent.
    pub fn submit(&mut self) -> Result<SyncOutcome, ValidationError> {
        let payload = self.form.to_payload((self.clock)())?;

        let (kind, mutation) = match &self.mode {
            FormMode::Creating => {
                let result = self
                    .client
                    .build_create_todo(&payload)
                    .and_then(|req| self.send(&req))
                    .and_then(|resp| self.client.parse_mutation_status(resp));
                (MutationKind::Create, result)
            }
            FormMode::Editing(id) => {
                let result = self
                    .client
                    .build_update_todo(id, &payload)
                    .and_then(|req| self.send(&req))
                    .and_then(|resp| self.client.parse_mutation_status(resp));
                (MutationKind::Update, result)
            }
        };
        let mutation = self.record_mutation(kind, mutation);

        self.form = TodoForm::default();
        self.mode = FormMode::Creating;

        let refresh = self.reload();
        Ok(SyncOutcome {
            kind,
            mutation,
            refresh,
        })
    }

    /// Load an item from the local snapshot into the form for editing.
    pub fn begin_edit(&mut self, item: &TodoItem) {
        self.form = TodoForm {
            task: item.task.clone(),
            due_date: item.due_date.clone(),
            completed: item.completed,
        };
        self.mode = FormMode::Editing(item.id.clone());
    }

    pub fn cancel_edit(&mut self) {
        self.form = TodoForm::default();
        self.mode = FormMode::Creating;
    }

    /// Delete by id, then refresh whatever the outcome.
    pub fn delete(&mut self, id: &TodoId) -> SyncOutcome {
        let request = self.client.build_delete_todo(id);
        let result = self
            .send(&request)
            .and_then(|resp| self.client.parse_delete_todo(resp));
        let mutation = self.record_mutation(MutationKind::Delete, result);

        if self.mode == FormMode::Editing(id.clone()) && mutation.is_ok() {
            self.cancel_edit();
        }

        let refresh = self.reload();
        SyncOutcome {
            kind: MutationKind::Delete,
            mutation,
            refresh,
        }
    }

    fn reload(&mut self) -> Result<(), FetchError> {
        let request = self.client.build_list_todos();
        let result = self
            .send(&request)
            .and_then(|resp| self.client.parse_list_todos(resp));
        match result {
            Ok(items) => {
                debug!(count = items.len(), "todo list refreshed");
                self.items = items;
                Ok(())
            }
            Err(err) => {
                let err = FetchError(err);
                warn!(error = %err, "keeping previous todo list");
                self.push_notice(err.to_string());
                Err(err)
            }
        }
    }

    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(method = request.method.as_str(), path = %request.path, "sending request");
        Ok(self.transport.execute(request)?)
    }

    fn record_mutation(
        &mut self,
        kind: MutationKind,
        result: Result<(), ApiError>,
    ) -> Result<(), MutationError> {
        result.map_err(|source| {
            let err = MutationError { kind, source };
            warn!(error = %err, "mutation failed");
            self.push_notice(err.to_string());
            err
        })
    }

    fn push_notice(&mut self, message: String) {
        if let Some(existing) = self.notices.iter_mut().find(|n| n.message == message) {
            existing.count += 1;
            return;
        }
        if self.notices.len() == MAX_NOTICES {
            self.notices.remove(0);
        }
        self.notices.push(Notice { message, count: 1 });
    }
}
