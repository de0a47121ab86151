// system-tests/tests/helpers/backend.rs
// ============================================================================
// Module: Mock Case Backend
// Description: Stateful in-process backend implementing the wire protocol.
// Purpose: Serve the full case/catalog/association surface for the suites.
// Dependencies: casework-core, serde_json, tiny_http, uuid
// ============================================================================

//! ## Overview
//! `MockBackend` is a tiny_http server holding cases, a service catalog, and
//! case/service associations in memory. It implements the backend's wire
//! protocol: `{status, data}` envelopes, session affinity through the
//! `casework-session` cookie, envelope 401 for requests outside a live
//! session, 404 for missing cases and unregistered services, and 409 for a
//! sync against an already-present association. GUIDs are v4 and never
//! reused after deletion.

use std::collections::HashMap;
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::Mutex;
use std::thread;
use std::thread::JoinHandle;

use casework_client::Session;
use casework_client::SessionConfig;
use casework_core::Case;
use casework_core::CaseDraft;
use casework_core::CaseGuid;
use serde_json::Value;
use serde_json::json;
use system_tests::fixtures::TEST_PASSWORD;
use system_tests::fixtures::TEST_USERNAME;
use tiny_http::Header;
use tiny_http::Method;
use tiny_http::Request;
use tiny_http::Response;
use tiny_http::Server;
use tiny_http::StatusCode;
use url::Url;
use uuid::Uuid;

/// Name of the session cookie issued at login.
const SESSION_COOKIE: &str = "casework-session";

/// One reply in the backend's envelope shape.
struct Reply {
    /// Envelope (and HTTP) status.
    status: u16,
    /// Envelope payload.
    data: Option<Value>,
    /// Optional `Set-Cookie` header value.
    set_cookie: Option<String>,
}

impl Reply {
    /// Successful reply carrying a payload.
    fn ok(data: Value) -> Self {
        Self {
            status: 200,
            data: Some(data),
            set_cookie: None,
        }
    }

    /// Successful reply without a payload.
    fn ok_empty() -> Self {
        Self {
            status: 200,
            data: None,
            set_cookie: None,
        }
    }

    /// Failure reply carrying only an envelope status.
    fn status_only(status: u16) -> Self {
        Self {
            status,
            data: None,
            set_cookie: None,
        }
    }
}

/// Mutable backend state behind the server loop.
#[derive(Default)]
struct State {
    /// Live cases by GUID.
    cases: HashMap<Uuid, Case>,
    /// GUIDs of deleted cases; never handed out again.
    retired: HashSet<Uuid>,
    /// Registered service names.
    services: Vec<String>,
    /// Case snapshots held per (service, case) association.
    associations: HashMap<(String, Uuid), Case>,
    /// Active session token, if any.
    session: Option<String>,
    /// Successful logins observed.
    login_count: u32,
    /// Acknowledged logouts observed.
    logout_count: u32,
    /// Monotonic source for session tokens.
    token_counter: u32,
    /// When set, case updates fail with an envelope 500.
    fail_case_updates: bool,
}

/// Stateful mock backend serving the case-management wire protocol.
pub struct MockBackend {
    /// Listener shared with the server thread; unblocked on drop.
    server: Arc<Server>,
    /// Backend state shared with the server thread.
    state: Arc<Mutex<State>>,
    /// Server thread handle, joined on drop.
    handle: Option<JoinHandle<()>>,
    /// Base URL the listener is bound to.
    base_url: String,
}

impl MockBackend {
    /// Starts a backend with the given registered services.
    pub fn start(services: &[&str]) -> Self {
        let server = Arc::new(Server::http("127.0.0.1:0").expect("mock backend listener"));
        let base_url = format!("http://{}", server.server_addr());
        let state = Arc::new(Mutex::new(State {
            services: services.iter().map(ToString::to_string).collect(),
            ..State::default()
        }));
        let thread_server = Arc::clone(&server);
        let thread_state = Arc::clone(&state);
        let handle = thread::spawn(move || {
            while let Ok(request) = thread_server.recv() {
                handle_request(request, &thread_state);
            }
        });
        Self {
            server,
            state,
            handle: Some(handle),
            base_url,
        }
    }

    /// Base URL the backend listens on.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Number of successful logins observed.
    pub fn login_count(&self) -> u32 {
        self.state.lock().expect("mock state").login_count
    }

    /// Number of acknowledged logouts observed.
    pub fn logout_count(&self) -> u32 {
        self.state.lock().expect("mock state").logout_count
    }

    /// Number of live (non-deleted) cases.
    pub fn live_case_count(&self) -> usize {
        self.state.lock().expect("mock state").cases.len()
    }

    /// Makes every subsequent case update fail with an envelope 500.
    pub fn inject_case_update_failure(&self) {
        self.state.lock().expect("mock state").fail_case_updates = true;
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.server.unblock();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Logs in against a backend as the canonical test user.
pub fn login(backend: &MockBackend) -> Session {
    let config = SessionConfig::new(Url::parse(backend.base_url()).expect("base url"));
    Session::login(&config, TEST_USERNAME, TEST_PASSWORD).expect("login")
}

/// Session configuration pointing at a backend.
pub fn session_config(backend: &MockBackend) -> SessionConfig {
    SessionConfig::new(Url::parse(backend.base_url()).expect("base url"))
}

// ============================================================================
// SECTION: Request Handling
// ============================================================================

/// Reads, routes, and answers one request.
fn handle_request(mut request: Request, state: &Arc<Mutex<State>>) {
    let method = request.method().clone();
    let path = request.url().to_string();
    let mut body = String::new();
    let _ = request.as_reader().read_to_string(&mut body);
    let cookie = session_token(&request);
    let reply = {
        let mut state = state.lock().expect("mock state");
        route(&method, &path, &body, cookie.as_deref(), &mut state)
    };
    respond(request, reply);
}

/// Extracts the session token from the request's cookie header.
fn session_token(request: &Request) -> Option<String> {
    let header = request
        .headers()
        .iter()
        .find(|header| header.field.equiv("Cookie"))?;
    let raw = header.value.to_string();
    for pair in raw.split(';') {
        let pair = pair.trim();
        if let Some(token) = pair.strip_prefix(SESSION_COOKIE)
            && let Some(token) = token.strip_prefix('=')
        {
            return Some(token.to_string());
        }
    }
    None
}

/// Serializes the reply envelope and answers the request.
fn respond(request: Request, reply: Reply) {
    let envelope = json!({"status": reply.status, "data": reply.data});
    let mut response = Response::from_string(envelope.to_string())
        .with_status_code(StatusCode(reply.status))
        .with_header(Header::from_bytes("Content-Type", "application/json").expect("json header"));
    if let Some(cookie) = reply.set_cookie {
        response = response
            .with_header(Header::from_bytes("Set-Cookie", cookie.as_bytes()).expect("cookie header"));
    }
    let _ = request.respond(response);
}

/// Routes one request to its handler.
fn route(
    method: &Method,
    path: &str,
    body: &str,
    cookie: Option<&str>,
    state: &mut State,
) -> Reply {
    if *method == Method::Post && path == "/api/auth/login" {
        return login_route(body, state);
    }
    if *method == Method::Get && path == "/api/auth/logout" {
        return logout_route(cookie, state);
    }
    if !session_valid(cookie, state) {
        return Reply::status_only(401);
    }
    if *method == Method::Get && path == "/api/services" {
        let services: Vec<Value> =
            state.services.iter().map(|name| json!({"name": name})).collect();
        return Reply::ok(Value::Array(services));
    }
    if *method == Method::Get && path == "/api/cases" {
        let cases: Vec<Value> = state
            .cases
            .values()
            .map(|case| serde_json::to_value(case).expect("case json"))
            .collect();
        return Reply::ok(Value::Array(cases));
    }
    if *method == Method::Post && path == "/api/case" {
        return create_case(body, state);
    }
    if let Some(raw) = path.strip_prefix("/api/case/") {
        let Ok(guid) = Uuid::parse_str(raw) else {
            return Reply::status_only(404);
        };
        return match *method {
            Method::Get => retrieve_case(guid, state),
            Method::Put => update_case(guid, body, state),
            Method::Delete => delete_case(guid, state),
            _ => Reply::status_only(404),
        };
    }
    if let Some(rest) = path.strip_prefix("/api/service/") {
        if let Some((name, raw_guid)) = rest.split_once("/case/") {
            let Ok(guid) = Uuid::parse_str(raw_guid) else {
                return Reply::status_only(404);
            };
            return match *method {
                Method::Get => probe_association(name, guid, state),
                Method::Post => sync_association(name, guid, state),
                Method::Delete => delete_association(name, guid, state),
                _ => Reply::status_only(404),
            };
        }
    }
    Reply::status_only(404)
}

// ============================================================================
// SECTION: Auth Routes
// ============================================================================

/// Handles `POST /api/auth/login`.
fn login_route(body: &str, state: &mut State) -> Reply {
    let Ok(parsed) = serde_json::from_str::<Value>(body) else {
        return Reply::status_only(400);
    };
    let username = parsed["data"]["username"].as_str().unwrap_or_default();
    let password = parsed["data"]["password"].as_str().unwrap_or_default();
    if username != TEST_USERNAME || password != TEST_PASSWORD {
        return Reply::status_only(401);
    }
    state.token_counter += 1;
    let token = format!("token-{}", state.token_counter);
    state.session = Some(token.clone());
    state.login_count += 1;
    Reply {
        status: 200,
        data: Some(json!({"username": username})),
        set_cookie: Some(format!("{SESSION_COOKIE}={token}; Path=/")),
    }
}

/// Handles `GET /api/auth/logout`.
fn logout_route(cookie: Option<&str>, state: &mut State) -> Reply {
    if !session_valid(cookie, state) {
        return Reply::status_only(401);
    }
    state.session = None;
    state.logout_count += 1;
    Reply::ok_empty()
}

/// Checks the cookie token against the active session.
fn session_valid(cookie: Option<&str>, state: &State) -> bool {
    match (&state.session, cookie) {
        (Some(active), Some(presented)) => active == presented,
        _ => false,
    }
}

// ============================================================================
// SECTION: Case Routes
// ============================================================================

/// Handles `POST /api/case`.
fn create_case(body: &str, state: &mut State) -> Reply {
    let Ok(draft) = serde_json::from_str::<CaseDraft>(body) else {
        return Reply::status_only(400);
    };
    if draft.validate().is_err() {
        return Reply::status_only(400);
    }
    let guid = fresh_guid(state);
    let case = Case {
        guid: CaseGuid::new(guid),
        tsid: draft.tsid,
        name: draft.name,
        description: draft.description,
        acs: draft.acs,
        report: draft.report,
    };
    let value = serde_json::to_value(&case).expect("case json");
    state.cases.insert(guid, case);
    Reply::ok(json!({"case": value}))
}

/// Handles `GET /api/case/{guid}`.
fn retrieve_case(guid: Uuid, state: &State) -> Reply {
    match state.cases.get(&guid) {
        Some(case) => Reply::ok(json!({"case": serde_json::to_value(case).expect("case json")})),
        None => Reply::status_only(404),
    }
}

/// Handles `PUT /api/case/{guid}`.
fn update_case(guid: Uuid, body: &str, state: &mut State) -> Reply {
    if state.fail_case_updates {
        return Reply::status_only(500);
    }
    if !state.cases.contains_key(&guid) {
        return Reply::status_only(404);
    }
    let Ok(case) = serde_json::from_str::<Case>(body) else {
        return Reply::status_only(400);
    };
    if case.guid.as_uuid() != guid {
        return Reply::status_only(400);
    }
    let value = serde_json::to_value(&case).expect("case json");
    state.cases.insert(guid, case);
    Reply::ok(json!({"case": value}))
}

/// Handles `DELETE /api/case/{guid}`.
fn delete_case(guid: Uuid, state: &mut State) -> Reply {
    let removed = state.cases.remove(&guid).is_some();
    if removed {
        state.retired.insert(guid);
        state.associations.retain(|(_, held), _| *held != guid);
    }
    Reply::ok(Value::Bool(removed))
}

/// Allocates a GUID that has never been seen, live or retired.
fn fresh_guid(state: &State) -> Uuid {
    loop {
        let guid = Uuid::new_v4();
        if !state.cases.contains_key(&guid) && !state.retired.contains(&guid) {
            return guid;
        }
    }
}

// ============================================================================
// SECTION: Association Routes
// ============================================================================

/// Handles `GET /api/service/{name}/case/{guid}`.
fn probe_association(name: &str, guid: Uuid, state: &State) -> Reply {
    if !state.services.iter().any(|service| service == name) {
        return Reply::status_only(404);
    }
    match state.associations.get(&(name.to_string(), guid)) {
        Some(case) => Reply::ok(json!({"case": serde_json::to_value(case).expect("case json")})),
        None => Reply {
            status: 200,
            data: None,
            set_cookie: None,
        },
    }
}

/// Handles `POST /api/service/{name}/case/{guid}`.
fn sync_association(name: &str, guid: Uuid, state: &mut State) -> Reply {
    if !state.services.iter().any(|service| service == name) {
        return Reply::status_only(404);
    }
    let Some(case) = state.cases.get(&guid).cloned() else {
        return Reply::status_only(404);
    };
    let key = (name.to_string(), guid);
    if state.associations.contains_key(&key) {
        return Reply::status_only(409);
    }
    let value = serde_json::to_value(&case).expect("case json");
    state.associations.insert(key, case);
    Reply::ok(json!({"case": value}))
}

/// Handles `DELETE /api/service/{name}/case/{guid}`.
fn delete_association(name: &str, guid: Uuid, state: &mut State) -> Reply {
    if !state.services.iter().any(|service| service == name) {
        return Reply::status_only(404);
    }
    let removed = state.associations.remove(&(name.to_string(), guid)).is_some();
    Reply::ok(Value::Bool(removed))
}
