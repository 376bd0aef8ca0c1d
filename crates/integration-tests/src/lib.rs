//! Integration tests for the User Directory server.
//!
//! Each test starts its own server on an ephemeral port with a fresh,
//! empty directory, then talks to it over HTTP.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p user-directory-integration-tests
//! ```

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use serde_json::Value;
use user_directory_server::config::{DirectoryConfig, HashingConfig, PasswordPolicy};
use user_directory_server::routes;
use user_directory_server::state::AppState;

/// RPC path prefix of the user service.
pub const USER_SERVICE: &str = "/user.v1.UserService";

/// Configuration for a test server: loopback, ephemeral port, cheap hashing.
#[must_use]
pub fn test_config() -> DirectoryConfig {
    DirectoryConfig {
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        password_policy: PasswordPolicy::default(),
        hashing: HashingConfig {
            memory_kib: 8,
            iterations: 1,
            parallelism: 1,
            pepper: None,
        },
        sentry: None,
    }
}

/// A running server plus a client pointed at it.
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: reqwest::Client,
}

impl TestServer {
    /// Start a server with [`test_config`].
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn spawn() -> Self {
        Self::spawn_with(&test_config()).await
    }

    /// Start a server with the given configuration.
    ///
    /// # Panics
    ///
    /// Panics if the state cannot be built or the listener cannot be bound.
    pub async fn spawn_with(config: &DirectoryConfig) -> Self {
        let bind = config.socket_addr();
        let state = AppState::new(config).expect("Failed to build test state");
        let app = routes::router(state);

        let listener = tokio::net::TcpListener::bind(bind)
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has no local address");

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Self {
            addr,
            client: reqwest::Client::new(),
        }
    }

    /// Absolute URL for a path on this server.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// Call a `UserService` method and return the raw response.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn call_raw(&self, method: &str, body: &Value) -> reqwest::Response {
        self.client
            .post(self.url(&format!("{USER_SERVICE}/{method}")))
            .json(body)
            .send()
            .await
            .expect("Request failed")
    }

    /// Call a `UserService` method and decode the JSON body.
    ///
    /// # Panics
    ///
    /// Panics if the request fails, the status is not 200, or the body is
    /// not JSON.
    pub async fn call(&self, method: &str, body: &Value) -> Value {
        let response = self.call_raw(method, body).await;
        assert_eq!(response.status(), reqwest::StatusCode::OK, "{method}");
        response.json().await.expect("Response was not JSON")
    }
}
