//! Shared harness: boots the full application on an ephemeral port.

#![allow(dead_code, clippy::panic)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde_json::{Value, json};

use eventdesk::api;
use eventdesk::app_state::AppState;
use eventdesk::domain::EventBus;
use eventdesk::persistence::{CatalogStore, MemoryStore};
use eventdesk::service::RegistrationService;

/// A running server plus a client pointed at it.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: reqwest::Client,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    pub async fn get_json(&self, path: &str) -> (u16, Value) {
        let Ok(resp) = self.client.get(self.url(path)).send().await else {
            panic!("GET {path} failed");
        };
        split(resp).await
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> (u16, Value) {
        let Ok(resp) = self.client.post(self.url(path)).json(body).send().await else {
            panic!("POST {path} failed");
        };
        split(resp).await
    }

    pub async fn put_json(&self, path: &str, body: &Value) -> (u16, Value) {
        let Ok(resp) = self.client.put(self.url(path)).json(body).send().await else {
            panic!("PUT {path} failed");
        };
        split(resp).await
    }

    pub async fn delete(&self, path: &str) -> (u16, Value) {
        let Ok(resp) = self.client.delete(self.url(path)).send().await else {
            panic!("DELETE {path} failed");
        };
        split(resp).await
    }

    /// Creates an event and returns its id.
    pub async fn create_event(&self, title: &str, capacity: u32) -> String {
        let (status, body) = self.post_json("/api/events", &event_body(title, capacity)).await;
        assert_eq!(status, 200, "create failed: {body}");
        let Some(id) = body["id"].as_str() else {
            panic!("created event has no id: {body}");
        };
        id.to_string()
    }

    /// Registers `email` for `event_id`, returning status and body.
    pub async fn register(&self, event_id: &str, email: &str) -> (u16, Value) {
        self.post_json("/api/participants", &participant_body(event_id, email))
            .await
    }
}

async fn split(resp: reqwest::Response) -> (u16, Value) {
    let status = resp.status().as_u16();
    let body = resp.json::<Value>().await.unwrap_or(Value::Null);
    (status, body)
}

/// Boots the app over an in-memory store.
pub async fn spawn_app() -> TestApp {
    spawn_app_with(Arc::new(MemoryStore::new())).await
}

/// Boots the app over the given store.
pub async fn spawn_app_with(store: Arc<dyn CatalogStore>) -> TestApp {
    let service = Arc::new(RegistrationService::new(store, EventBus::new(64)));
    let app = api::build_app(AppState::new(service), Duration::from_secs(10));

    let Ok(listener) = tokio::net::TcpListener::bind("127.0.0.1:0").await else {
        panic!("bind failed");
    };
    let Ok(addr) = listener.local_addr() else {
        panic!("no local addr");
    };
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    TestApp {
        addr,
        client: reqwest::Client::new(),
    }
}

/// A valid create body dated one month ahead.
pub fn event_body(title: &str, capacity: u32) -> Value {
    let date = (Utc::now() + chrono::Duration::days(30))
        .format("%Y-%m-%dT%H:%M")
        .to_string();
    json!({
        "title": title,
        "description": "An evening of talks",
        "date": date,
        "location": "Hall A",
        "capacity": capacity,
        "category": "Hackathon",
    })
}

/// A valid registration body.
pub fn participant_body(event_id: &str, email: &str) -> Value {
    json!({
        "eventId": event_id,
        "name": "Ada Lovelace",
        "email": email,
        "phone": "+44 7700 900123",
        "year": "2nd",
    })
}
