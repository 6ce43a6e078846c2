// WebSocket connection and JSON message transport
use wasm_bindgen::prelude::*;
use web_sys::WebSocket;

use protocol::ClientAction;

use crate::sim::{ActionSink, SendError};

/// Path of the simulation endpoint on the serving host.
const ENDPOINT_PATH: &str = "/live";

/// The single long-lived socket to the simulation server.
///
/// Opened once at initialization. There is deliberately no reconnect, no
/// retry and no outbound buffering: a closed socket is logged and the
/// simulation stalls.
pub struct Connection {
    ws: WebSocket,
}

impl Connection {
    /// Open the socket to the well-known endpoint on the current host,
    /// matching the page's security scheme.
    pub fn from_window() -> Result<Self, JsValue> {
        let location = web_sys::window().ok_or("No window")?.location();
        let is_https = location.protocol().map(|p| p == "https:").unwrap_or(false);
        let host = location.host()?;
        let url = format!(
            "ws{}://{}{}",
            if is_https { "s" } else { "" },
            host,
            ENDPOINT_PATH
        );
        Self::new(&url)
    }

    pub fn new(url: &str) -> Result<Self, JsValue> {
        web_sys::console::log_1(&format!("Connecting to: {}", url).into());
        let ws = WebSocket::new(url)?;
        Ok(Self { ws })
    }

    pub fn websocket(&self) -> &WebSocket {
        &self.ws
    }

    /// Serialize and send one action. Refuses when the socket is not OPEN.
    pub fn send_action(&self, action: &ClientAction) -> Result<(), JsValue> {
        // OPEN state = 1
        if self.ws.ready_state() != 1 {
            return Err(JsValue::from_str("WebSocket not ready"));
        }
        let text = serde_json::to_string(action)
            .map_err(|e| JsValue::from_str(&format!("encode failed: {e}")))?;
        log::debug!("pushing {text}");
        self.ws.send_with_str(&text)
    }
}

impl ActionSink for Connection {
    fn send(&mut self, action: &ClientAction) -> Result<(), SendError> {
        self.send_action(action)
            .map_err(|e| SendError(format!("{e:?}")))
    }
}
