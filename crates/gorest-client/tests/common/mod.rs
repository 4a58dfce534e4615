//! In-process fake of the GoREST users/posts/comments API
//!
//! Stateful enough for the full user → post → comment chain: ids are
//! assigned by the server, emails must be unique, listings are newest first,
//! and deleting a user removes its posts and comments.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use gorest_client::GorestClient;
use gorest_core::Config;
use serde_json::{Value, json};
use tiny_http::{Header, Request, Response, Server};

pub const TOKEN: &str = "test-token";
const PREFIX: &str = "/public/v2";

/// Switches that make the fake misbehave.
#[derive(Debug, Clone, Default)]
pub struct Faults {
    /// `POST /users` answers 201 without an `id`
    pub omit_user_id: bool,
    /// `POST /users/{id}/posts` answers 201 without a `title`
    pub omit_post_title: bool,
    /// `POST /users/{id}/posts` answers 201 without an `id`
    pub omit_post_id: bool,
    /// `POST /posts/{id}/comments` answers 201 without a `name`
    pub omit_comment_name: bool,
    /// `POST /posts/{id}/comments` answers 201 without an `id`
    pub omit_comment_id: bool,
    /// `DELETE /users/{id}` answers 500
    pub fail_deletes: bool,
    /// `PUT /users/{id}` ignores the submitted name
    pub ignore_update_name: bool,
    /// `GET /users/{id}/todos` answers an HTML error page
    pub html_todos: bool,
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub body: Option<Value>,
}

#[derive(Default)]
struct State {
    next_id: u64,
    users: BTreeMap<u64, Value>,
    posts: BTreeMap<u64, Value>,
    comments: BTreeMap<u64, Value>,
    faults: Faults,
    requests: Vec<RecordedRequest>,
}

impl State {
    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        7_000_000 + self.next_id
    }
}

pub struct FakeGorest {
    pub base_url: String,
    state: Arc<Mutex<State>>,
    server: Arc<Server>,
    handle: Option<JoinHandle<()>>,
}

impl FakeGorest {
    pub fn start() -> Self {
        let server = Arc::new(Server::http("127.0.0.1:0").expect("bind fake server"));
        let addr = server.server_addr().to_ip().expect("ip address");
        let state = Arc::new(Mutex::new(State::default()));

        let handle = {
            let server = Arc::clone(&server);
            let state = Arc::clone(&state);
            std::thread::spawn(move || {
                for request in server.incoming_requests() {
                    handle_request(&state, request);
                }
            })
        };

        Self {
            base_url: format!("http://{addr}{PREFIX}"),
            state,
            server,
            handle: Some(handle),
        }
    }

    pub fn config(&self) -> Config {
        Config {
            base_url: self.base_url.clone(),
            token: Some(TOKEN.into()),
            seed_data: PathBuf::from("does-not-exist/users.json"),
            ..Config::default()
        }
    }

    pub fn client(&self) -> GorestClient {
        GorestClient::new(&self.config()).expect("client")
    }

    pub fn set_faults(&self, update: impl FnOnce(&mut Faults)) {
        update(&mut self.state.lock().unwrap().faults);
    }

    pub fn user_count(&self) -> usize {
        self.state.lock().unwrap().users.len()
    }

    pub fn post_count(&self) -> usize {
        self.state.lock().unwrap().posts.len()
    }

    pub fn comment_count(&self) -> usize {
        self.state.lock().unwrap().comments.len()
    }

    pub fn user_exists(&self, id: u64) -> bool {
        self.state.lock().unwrap().users.contains_key(&id)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    /// `(method, path)` of every request, in arrival order.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.requests()
            .into_iter()
            .map(|r| (r.method, r.path))
            .collect()
    }

    /// Emails submitted to `POST /users`.
    pub fn submitted_user_emails(&self) -> Vec<String> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == "POST" && r.path == "/users")
            .filter_map(|r| r.body?.get("email")?.as_str().map(String::from))
            .collect()
    }
}

impl Drop for FakeGorest {
    fn drop(&mut self) {
        self.server.unblock();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

enum Reply {
    Json(u16, Value),
    Html(u16, &'static str),
    Empty(u16),
}

fn handle_request(state: &Mutex<State>, mut request: Request) {
    let method = request.method().to_string().to_uppercase();
    let path = request
        .url()
        .split('?')
        .next()
        .unwrap_or_default()
        .trim_start_matches(PREFIX)
        .to_string();
    let authorization = request
        .headers()
        .iter()
        .find(|h| h.field.equiv("Authorization"))
        .map(|h| h.value.as_str().to_string());

    let mut raw = String::new();
    let _ = request.as_reader().read_to_string(&mut raw);
    let body = serde_json::from_str::<Value>(&raw).ok();

    let reply = {
        let mut state = state.lock().unwrap();
        state.requests.push(RecordedRequest {
            method: method.clone(),
            path: path.clone(),
            authorization: authorization.clone(),
            body: body.clone(),
        });
        let expected = format!("Bearer {TOKEN}");
        if authorization.as_deref() != Some(expected.as_str()) {
            Reply::Json(401, json!({"message": "Authentication failed"}))
        } else {
            route(&mut state, &method, &path, body)
        }
    };

    let json_header = Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap();
    let _ = match reply {
        Reply::Json(status, value) => request.respond(
            Response::from_string(value.to_string())
                .with_status_code(status)
                .with_header(json_header),
        ),
        Reply::Html(status, text) => request.respond(
            Response::from_string(text)
                .with_status_code(status)
                .with_header(Header::from_bytes(&b"Content-Type"[..], &b"text/html"[..]).unwrap()),
        ),
        Reply::Empty(status) => request.respond(Response::empty(status)),
    };
}

fn not_found() -> Reply {
    Reply::Json(404, json!({"message": "Resource not found"}))
}

fn missing_fields(body: &Option<Value>, fields: &[&str]) -> Vec<Value> {
    fields
        .iter()
        .filter(|f| {
            body.as_ref()
                .and_then(|b| b.get(**f))
                .and_then(Value::as_str)
                .is_none_or(str::is_empty)
        })
        .map(|f| json!({"field": f, "message": "can't be blank"}))
        .collect()
}

fn field(body: &Option<Value>, name: &str) -> Value {
    body.as_ref()
        .and_then(|b| b.get(name))
        .cloned()
        .unwrap_or(Value::Null)
}

fn route(state: &mut State, method: &str, path: &str, body: Option<Value>) -> Reply {
    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
    let id = |i: usize| segments.get(i).and_then(|s| s.parse::<u64>().ok());

    match (method, segments.as_slice()) {
        ("POST", ["users"]) => {
            let errors = missing_fields(&body, &["name", "email", "gender", "status"]);
            if !errors.is_empty() {
                return Reply::Json(422, Value::Array(errors));
            }
            let email = field(&body, "email");
            if state.users.values().any(|u| u["email"] == email) {
                return Reply::Json(
                    422,
                    json!([{"field": "email", "message": "has already been taken"}]),
                );
            }
            let user_id = state.allocate_id();
            let user = json!({
                "id": user_id,
                "name": field(&body, "name"),
                "email": email,
                "gender": field(&body, "gender"),
                "status": field(&body, "status"),
            });
            state.users.insert(user_id, user.clone());
            if state.faults.omit_user_id {
                let mut without = user;
                without.as_object_mut().unwrap().remove("id");
                return Reply::Json(201, without);
            }
            Reply::Json(201, user)
        }
        ("GET", ["users", _]) => match id(1).and_then(|i| state.users.get(&i)) {
            Some(user) => Reply::Json(200, user.clone()),
            None => not_found(),
        },
        ("PUT", ["users", _]) => {
            let ignore_name = state.faults.ignore_update_name;
            let Some(user) = id(1).and_then(|i| state.users.get_mut(&i)) else {
                return not_found();
            };
            for key in ["name", "email", "gender", "status"] {
                if key == "name" && ignore_name {
                    continue;
                }
                let value = field(&body, key);
                if !value.is_null() {
                    user[key] = value;
                }
            }
            Reply::Json(200, user.clone())
        }
        ("DELETE", ["users", _]) => {
            if state.faults.fail_deletes {
                return Reply::Json(500, json!({"message": "Internal server error"}));
            }
            let Some(user_id) = id(1).filter(|i| state.users.contains_key(i)) else {
                return not_found();
            };
            state.users.remove(&user_id);
            let post_ids: Vec<u64> = state
                .posts
                .iter()
                .filter(|(_, p)| p["user_id"] == user_id)
                .map(|(k, _)| *k)
                .collect();
            for post_id in &post_ids {
                state.posts.remove(post_id);
            }
            state
                .comments
                .retain(|_, c| !post_ids.iter().any(|p| c["post_id"] == *p));
            Reply::Empty(204)
        }
        ("POST", ["users", _, "posts"]) => {
            let Some(user_id) = id(1).filter(|i| state.users.contains_key(i)) else {
                return Reply::Json(422, json!([{"field": "user", "message": "must exist"}]));
            };
            let errors = missing_fields(&body, &["title", "body"]);
            if !errors.is_empty() {
                return Reply::Json(422, Value::Array(errors));
            }
            let post_id = state.allocate_id();
            let post = json!({
                "id": post_id,
                "user_id": user_id,
                "title": field(&body, "title"),
                "body": field(&body, "body"),
            });
            state.posts.insert(post_id, post.clone());
            let mut reply = post;
            if state.faults.omit_post_title {
                reply.as_object_mut().unwrap().remove("title");
            }
            if state.faults.omit_post_id {
                reply.as_object_mut().unwrap().remove("id");
            }
            Reply::Json(201, reply)
        }
        ("GET", ["users", _, "posts"]) => {
            let user_id = id(1);
            let posts: Vec<Value> = state
                .posts
                .values()
                .rev()
                .filter(|p| user_id.is_some_and(|u| p["user_id"] == u))
                .cloned()
                .collect();
            Reply::Json(200, Value::Array(posts))
        }
        ("GET", ["users", _, "todos"]) => {
            if state.faults.html_todos {
                return Reply::Html(502, "<html><body>Bad Gateway</body></html>");
            }
            Reply::Json(200, json!([]))
        }
        ("POST", ["posts", _, "comments"]) => {
            let Some(post_id) = id(1).filter(|i| state.posts.contains_key(i)) else {
                return Reply::Json(422, json!([{"field": "post", "message": "must exist"}]));
            };
            let errors = missing_fields(&body, &["name", "email", "body"]);
            if !errors.is_empty() {
                return Reply::Json(422, Value::Array(errors));
            }
            let comment_id = state.allocate_id();
            let comment = json!({
                "id": comment_id,
                "post_id": post_id,
                "name": field(&body, "name"),
                "email": field(&body, "email"),
                "body": field(&body, "body"),
            });
            state.comments.insert(comment_id, comment.clone());
            let mut reply = comment;
            if state.faults.omit_comment_name {
                reply.as_object_mut().unwrap().remove("name");
            }
            if state.faults.omit_comment_id {
                reply.as_object_mut().unwrap().remove("id");
            }
            Reply::Json(201, reply)
        }
        ("GET", ["posts", _, "comments"]) => {
            let post_id = id(1);
            let comments: Vec<Value> = state
                .comments
                .values()
                .rev()
                .filter(|c| post_id.is_some_and(|p| c["post_id"] == p))
                .cloned()
                .collect();
            Reply::Json(200, Value::Array(comments))
        }
        _ => not_found(),
    }
}
