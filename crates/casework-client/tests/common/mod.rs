// crates/casework-client/tests/common/mod.rs
// ============================================================================
// Module: Client Test Helpers
// Description: Scripted single-connection HTTP responders for client tests.
// Purpose: Serve canned envelopes and record what the client sent.
// Dependencies: casework-client, casework-core, serde_json, tiny_http
// ============================================================================

//! Scripted backend responders shared by the client test suites.

#![allow(dead_code, reason = "Shared helpers are reused across multiple test suites.")]

use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;

use casework_client::Session;
use casework_client::SessionConfig;
use serde_json::Value;
use serde_json::json;
use tiny_http::Header;
use tiny_http::Response;
use tiny_http::Server;
use tiny_http::StatusCode;
use url::Url;

/// One canned reply served in script order.
pub struct Scripted {
    /// HTTP status code of the reply.
    pub status_code: u16,
    /// Raw response body.
    pub body: String,
    /// Optional `Set-Cookie` header value.
    pub set_cookie: Option<String>,
}

impl Scripted {
    /// Canned HTTP 200 reply with the given body.
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status_code: 200,
            body: body.into(),
            set_cookie: None,
        }
    }

    /// Canned reply with an explicit HTTP status code.
    pub fn http(status_code: u16, body: impl Into<String>) -> Self {
        Self {
            status_code,
            body: body.into(),
            set_cookie: None,
        }
    }

    /// Attaches a `Set-Cookie` header to the reply.
    pub fn with_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.set_cookie = Some(cookie.into());
        self
    }
}

/// One request as observed by the scripted responder.
pub struct Recorded {
    /// Request method.
    pub method: String,
    /// Request path and query.
    pub path: String,
    /// Raw request body.
    pub body: String,
    /// `Cookie` header value, when present.
    pub cookie: Option<String>,
}

/// Serves the script on a loopback listener and records each request.
///
/// Returns the base URL and the join handle yielding the recorded requests.
/// After the script is exhausted the responder briefly drains and records
/// any unexpected extra requests (answering them with a 500 envelope) so
/// tests can assert on exact request counts.
pub fn serve(script: Vec<Scripted>) -> (String, JoinHandle<Vec<Recorded>>) {
    let server = Server::http("127.0.0.1:0").expect("http server");
    let base = format!("http://{}", server.server_addr());
    let handle = thread::spawn(move || {
        let mut recorded = Vec::new();
        for scripted in script {
            let Ok(request) = server.recv() else {
                break;
            };
            record_and_respond(&mut recorded, request, &scripted);
        }
        let overflow = Scripted::ok(envelope_empty(500));
        while let Ok(Some(request)) = server.recv_timeout(Duration::from_millis(200)) {
            record_and_respond(&mut recorded, request, &overflow);
        }
        recorded
    });
    (base, handle)
}

/// Records one request and answers it with the scripted reply.
fn record_and_respond(recorded: &mut Vec<Recorded>, mut request: tiny_http::Request, scripted: &Scripted) {
    let mut body = String::new();
    let _ = request.as_reader().read_to_string(&mut body);
    let cookie = request
        .headers()
        .iter()
        .find(|header| header.field.equiv("Cookie"))
        .map(|header| header.value.to_string());
    recorded.push(Recorded {
        method: request.method().to_string(),
        path: request.url().to_string(),
        body,
        cookie,
    });
    let mut response = Response::from_string(scripted.body.clone())
        .with_status_code(StatusCode(scripted.status_code))
        .with_header(Header::from_bytes("Content-Type", "application/json").expect("json header"));
    if let Some(cookie) = &scripted.set_cookie {
        response = response
            .with_header(Header::from_bytes("Set-Cookie", cookie.as_bytes()).expect("cookie header"));
    }
    request.respond(response).expect("respond");
}

/// Builds a response envelope body with a payload.
pub fn envelope(status: u16, data: Value) -> String {
    json!({"status": status, "data": data}).to_string()
}

/// Builds a response envelope body without a payload.
pub fn envelope_empty(status: u16) -> String {
    json!({"status": status}).to_string()
}

/// Canned successful login reply for the `test` user.
pub fn login_ok() -> Scripted {
    Scripted::ok(envelope(200, json!({"username": "test"})))
        .with_cookie("casework-session=fixture; Path=/")
}

/// Canned successful logout reply.
pub fn logout_ok() -> Scripted {
    Scripted::ok(envelope_empty(200))
}

/// Session configuration pointing at a scripted responder.
pub fn session_config(base: &str) -> SessionConfig {
    SessionConfig::new(Url::parse(base).expect("base url"))
}

/// Logs in against a scripted responder as the `test` user.
pub fn login(base: &str) -> Session {
    Session::login(&session_config(base), "test", "test").expect("login")
}

/// Case body in the backend's wire shape.
pub fn case_json(guid: &str) -> Value {
    json!({
        "guid": guid,
        "tsid": null,
        "name": "T",
        "description": "D",
        "acs": ["test"],
        "report": null
    })
}

/// Fixture GUID used across the suites.
pub const FIXTURE_GUID: &str = "5f0c954f-6b2a-4d6a-9f06-d7a4c9f7c001";
