//! Stub backend for client integration tests.
//!
//! Binds an axum router on an ephemeral port and serves canned or stateful
//! JSON, so the client is exercised over a real HTTP round trip without a
//! database.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use taskpoints_client::{ApiClient, SessionStore};

/// A running stub server plus a client pointed at it.
pub struct TestBackend {
    pub addr: SocketAddr,
    pub session: Arc<SessionStore>,
}

impl TestBackend {
    /// Serve `router` on an ephemeral local port.
    pub async fn start(router: Router) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("serve");
        });
        Self {
            addr,
            session: Arc::new(SessionStore::in_memory()),
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn client(&self) -> ApiClient {
        ApiClient::new(self.base_url(), self.session.clone())
    }
}

/// A session the stub does not verify; used where the client just needs to
/// look logged in.
pub fn fake_session() -> taskpoints_client::Session {
    taskpoints_client::Session {
        token: "test-token".into(),
        user: taskpoints_client::types::UserProfile {
            id: 1,
            username: "admin".into(),
            email: "admin@example.com".into(),
            role: "admin".into(),
            total_points: 0,
        },
    }
}
