#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use quest_core::model::auth::test_token;
use quest_core::model::{AccessToken, AuthSession, Role, SessionContext};
use quest_core::time::fixed_now;
use serde_json::{Value, json};
use services::{ApiClient, ApiError, AppServices, Clock, HttpMethod};
use storage::repository::Storage;

/// Token expiry far after the fixed test clock.
pub const FUTURE_EXP: i64 = 2_000_000_000;

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: HttpMethod,
    pub path: String,
    pub token: Option<String>,
    pub body: Option<Value>,
}

/// Scripted backend. Each route answers from a queue; the last answer repeats.
#[derive(Default)]
pub struct FakeApi {
    routes: Mutex<HashMap<(HttpMethod, String), VecDeque<Result<Value, ApiError>>>>,
    calls: Mutex<Vec<Call>>,
}

impl FakeApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, method: HttpMethod, path: &str, response: Result<Value, ApiError>) {
        self.routes
            .lock()
            .unwrap()
            .entry((method, path.to_owned()))
            .or_default()
            .push_back(response);
    }

    pub fn ok(&self, method: HttpMethod, path: &str, body: Value) {
        self.respond(method, path, Ok(body));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, method: HttpMethod, path: &str) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| c.method == method && c.path == path)
            .collect()
    }
}

#[async_trait]
impl ApiClient for FakeApi {
    async fn call(
        &self,
        method: HttpMethod,
        path: &str,
        token: Option<&AccessToken>,
        body: Option<Value>,
    ) -> Result<Value, ApiError> {
        self.calls.lock().unwrap().push(Call {
            method,
            path: path.to_owned(),
            token: token.map(|t| t.as_str().to_owned()),
            body,
        });
        let mut routes = self.routes.lock().unwrap();
        let Some(queue) = routes.get_mut(&(method, path.to_owned())) else {
            return Err(ApiError::NotFound(format!("unrouted {method} {path}")));
        };
        if queue.len() > 1 {
            queue.pop_front().unwrap()
        } else {
            queue.front().cloned().unwrap()
        }
    }
}

pub fn services(api: &Arc<FakeApi>) -> (AppServices, Storage) {
    let storage = Storage::in_memory();
    let client: Arc<dyn ApiClient> = api.clone();
    let services = AppServices::with_parts(storage.clone(), client, Clock::fixed(fixed_now()));
    (services, storage)
}

pub fn token_for(user_id: u64, role: &str) -> String {
    test_token(&json!({"user_id": user_id, "role": role, "exp": FUTURE_EXP}))
}

pub fn session(user_id: u64, role: Role) -> SessionContext {
    let token = AccessToken::parse(token_for(user_id, role.as_str())).unwrap();
    SessionContext::authenticated(AuthSession {
        token,
        role,
        email: format!("user{user_id}@example.com"),
    })
}
