//! Integration tests for userhub.
//!
//! Each test spawns the real router on an ephemeral port, backed by the
//! in-memory repository so no store needs to be running, and drives it
//! over HTTP with `reqwest`.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p userhub-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use secrecy::SecretString;

use userhub_server::config::AppConfig;
use userhub_server::db::InMemoryUserRepository;
use userhub_server::routes;
use userhub_server::state::AppState;

/// A running service instance plus a client to talk to it.
pub struct TestContext {
    pub client: reqwest::Client,
    pub base_url: String,
}

impl TestContext {
    /// Spawn the service on an ephemeral port with an empty in-memory
    /// repository.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn spawn() -> Self {
        let config = AppConfig {
            database_url: SecretString::from("mongodb://unused-in-tests"),
            database_name: "userhub-test".to_owned(),
            host: std::net::Ipv4Addr::LOCALHOST.into(),
            port: 0,
        };
        let state = AppState::new(config, Arc::new(InMemoryUserRepository::new()));
        let app = routes::router().with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("listener has no local addr");

        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("test server error");
        });

        Self {
            client: reqwest::Client::new(),
            base_url: format!("http://{addr}"),
        }
    }

    /// Build a full URL for a path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// POST a JSON body to `/users` and return the response.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn create_user(&self, body: &serde_json::Value) -> reqwest::Response {
        self.client
            .post(self.url("/users"))
            .json(body)
            .send()
            .await
            .expect("request failed")
    }
}
