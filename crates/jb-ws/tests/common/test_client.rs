#![allow(dead_code)]

use crate::common::jwt_helper::create_test_token;

use axum_test::{TestServer, TestWebSocket};
use serde_json::Value;

/// WebSocket test client wrapper
pub struct WsTestClient {
    ws: TestWebSocket,
    pub user_id: String,
    pub role: String,
}

impl WsTestClient {
    /// Connect to the WebSocket endpoint with JWT authentication
    pub async fn connect(server: &TestServer, user_id: &str, role: &str, jwt_secret: &[u8]) -> Self {
        let token = create_test_token(user_id, role, jwt_secret);

        let ws = server
            .get_websocket("/ws")
            .add_header("Authorization", format!("Bearer {}", token))
            .await
            .into_websocket()
            .await;

        Self {
            ws,
            user_id: user_id.to_string(),
            role: role.to_string(),
        }
    }

    /// Send a client event as JSON text
    pub async fn send_event(&mut self, event: &Value) {
        self.ws.send_text(event.to_string()).await;
    }

    /// Send raw text (for malformed-frame tests)
    pub async fn send_text(&mut self, text: impl std::fmt::Display) {
        self.ws.send_text(text).await;
    }

    /// Receive the next text frame parsed as JSON
    pub async fn receive_envelope(&mut self) -> Value {
        let text = self.ws.receive_text().await;
        serde_json::from_str(&text).expect("frame should be JSON")
    }

    /// Receive raw text
    pub async fn receive_text(&mut self) -> String {
        self.ws.receive_text().await
    }

    /// Close the WebSocket connection
    pub async fn close(self) {
        self.ws.close().await;
    }
}
