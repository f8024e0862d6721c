//! Login and list lifecycle against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives `Session` and
//! `ListManager` over real HTTP through a ureq-backed `Transport`. Validates
//! that request building, response parsing and the refetch-after-mutation
//! flow work end-to-end with the actual server.

use todo_core::{
    AuthError, FormMode, HttpMethod, HttpRequest, HttpResponse, ListManager, MutationKind, Screen,
    Session, TodoClient, Transport, TransportError,
};

/// Executes requests with ureq.
///
/// Disables ureq's automatic status-code-as-error behavior so 4xx/5xx
/// responses are returned as data rather than `Err`, letting the core
/// handle status interpretation.
struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

fn with_headers<B>(mut builder: ureq::RequestBuilder<B>, headers: &[(String, String)]) -> ureq::RequestBuilder<B> {
    for (key, value) in headers {
        builder = builder.header(key.as_str(), value.as_str());
    }
    builder
}

impl Transport for UreqTransport {
    fn execute(&self, req: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let result = match (req.method, req.body.as_deref()) {
            (HttpMethod::Get, _) => with_headers(self.agent.get(&req.path), &req.headers).call(),
            (HttpMethod::Delete, _) => with_headers(self.agent.delete(&req.path), &req.headers).call(),
            (HttpMethod::Post, Some(body)) => {
                with_headers(self.agent.post(&req.path), &req.headers).send(body.as_bytes())
            }
            (HttpMethod::Post, None) => with_headers(self.agent.post(&req.path), &req.headers).send_empty(),
            (HttpMethod::Put, Some(body)) => {
                with_headers(self.agent.put(&req.path), &req.headers).send(body.as_bytes())
            }
            (HttpMethod::Put, None) => with_headers(self.agent.put(&req.path), &req.headers).send_empty(),
        };
        let mut response = result.map_err(|e| TransportError::new(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(k, v)| (k.as_str().to_string(), v.to_str().unwrap_or_default().to_string()))
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| TransportError::new(e.to_string()))?;
        Ok(HttpResponse { status, headers, body })
    }
}

/// Start the mock server on a random port and return its base URL.
fn spawn_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

#[test]
fn login_then_manage_todos() {
    let base_url = spawn_server();
    let transport = UreqTransport::new();

    // Step 1: wrong password stays on the login screen.
    let mut session = Session::new(TodoClient::new(&base_url));
    session.set_username(mock_server::DEFAULT_USERNAME);
    session.set_password("wrong");
    let err = session.submit_credentials(&transport).unwrap_err();
    assert!(matches!(err, AuthError::Rejected(_)));
    assert_eq!(session.error_message(), Some("Invalid credentials"));

    // Step 2: correct credentials redirect to the list.
    session.set_username(mock_server::DEFAULT_USERNAME);
    session.set_password(mock_server::DEFAULT_PASSWORD);
    let redirect = session.submit_credentials(&transport).unwrap();
    assert_eq!(redirect.to, Screen::Todos);

    // Step 3: activate — empty list.
    let mut list = ListManager::new(TodoClient::new(&base_url), &transport);
    assert!(list.activate().unwrap().is_empty());

    // Step 4: create with a blank due date.
    list.form_mut().task = "Buy milk".to_string();
    let outcome = list.submit().unwrap();
    assert_eq!(outcome.kind, MutationKind::Create);
    assert!(outcome.is_ok());
    assert_eq!(list.items().len(), 1);
    let created = list.items()[0].clone();
    assert_eq!(created.task, "Buy milk");
    assert!(!created.due_date.is_empty());
    assert!(!created.completed);

    // Step 5: refresh twice — same snapshot.
    let first = list.refresh().unwrap().to_vec();
    let second = list.refresh().unwrap().to_vec();
    assert_eq!(first, second);

    // Step 6: edit with an unchanged form — same item, same values.
    list.begin_edit(&created);
    assert_eq!(list.mode(), &FormMode::Editing(created.id.clone()));
    let outcome = list.submit().unwrap();
    assert_eq!(outcome.kind, MutationKind::Update);
    assert!(outcome.is_ok());
    assert_eq!(list.items(), &[created.clone()]);

    // Step 7: edit completion.
    list.begin_edit(&created);
    list.form_mut().completed = true;
    list.submit().unwrap();
    assert!(list.items()[0].completed);
    assert_eq!(list.items()[0].id, created.id);

    // Step 8: delete.
    let outcome = list.delete(&created.id);
    assert!(outcome.is_ok());
    assert!(list.items().is_empty());

    // Step 9: delete again — mutation fails, refresh still happens.
    let outcome = list.delete(&created.id);
    assert!(outcome.mutation.is_err());
    assert!(outcome.refresh.is_ok());
    assert_eq!(list.notices().len(), 1);
}

#[test]
fn unreachable_service_collapses_to_invalid_credentials() {
    // Bind then drop, so the port is very likely closed.
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let transport = UreqTransport::new();

    let mut session = Session::new(TodoClient::new(&format!("http://{addr}")));
    session.set_username("demo");
    session.set_password("demo");
    let err = session.submit_credentials(&transport).unwrap_err();
    assert!(matches!(err, AuthError::Unreachable(_)));
    assert_eq!(session.error_message(), Some("Invalid credentials"));
    assert!(!session.is_pending());

    let mut list = ListManager::new(TodoClient::new(&format!("http://{addr}")), &transport);
    assert!(list.refresh().is_err());
    assert!(list.items().is_empty());
    assert_eq!(list.notices().len(), 1);
}

#[test]
fn request_headers_are_forwarded_to_the_server() {
    let base_url = spawn_server();
    let transport = UreqTransport::new();
    let client = TodoClient::new(&base_url);
    let payload = todo_core::TodoPayload {
        task: "Buy milk".to_string(),
        due_date: "2024-05-01T09:30".to_string(),
        completed: false,
    };

    // The server only accepts JSON bodies declared as such.
    let mut bare = client.build_create_todo(&payload).unwrap();
    bare.headers.clear();
    let rejected = transport.execute(&bare).unwrap();
    assert_eq!(rejected.status, 415);

    let request = client.build_create_todo(&payload).unwrap();
    let accepted = transport.execute(&request).unwrap();
    assert_eq!(accepted.status, 201);
    assert!(accepted
        .headers
        .iter()
        .any(|(k, v)| k.eq_ignore_ascii_case("content-type") && v.starts_with("application/json")));
}
