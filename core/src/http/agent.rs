use async_trait::async_trait;
use std::io::Read;
use tracing::debug;

use super::{HttpTransport, JsonRequest, JsonResponse, TransportError};
use crate::config::HttpConfig;

/// Blocking `ureq` agent driven from the tokio blocking pool.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
    max_response_bytes: u64,
}

impl UreqTransport {
    pub fn new(config: &HttpConfig) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(config.connect_timeout())
            .timeout(config.timeout())
            .build();
        Self {
            agent,
            max_response_bytes: config.max_response_bytes,
        }
    }

    fn execute(
        agent: &ureq::Agent,
        max_response_bytes: u64,
        request: JsonRequest,
    ) -> Result<JsonResponse, TransportError> {
        let mut call = agent
            .post(&request.url)
            .set("Content-Type", "application/json");
        for (name, value) in &request.headers {
            call = call.set(name, value);
        }

        match call.send_string(&request.body.to_string()) {
            Ok(response) => {
                let status = response.status();
                let body = read_body(response, max_response_bytes)?;
                Ok(JsonResponse { status, body })
            }
            Err(ureq::Error::Status(status, response)) => {
                let body = read_body(response, max_response_bytes).unwrap_or_default();
                Ok(JsonResponse { status, body })
            }
            Err(ureq::Error::Transport(transport)) => {
                let message = transport.to_string();
                if message.contains("timed out") || message.contains("timeout") {
                    Err(TransportError::Timeout(message))
                } else {
                    Err(TransportError::Connection(message))
                }
            }
        }
    }
}

#[async_trait]
impl HttpTransport for UreqTransport {
    async fn post_json(&self, request: JsonRequest) -> Result<JsonResponse, TransportError> {
        let agent = self.agent.clone();
        let limit = self.max_response_bytes;
        debug!(target: "http_transport", url = %request.url, "sending request");

        tokio::task::spawn_blocking(move || Self::execute(&agent, limit, request))
            .await
            .map_err(|err| TransportError::Aborted(err.to_string()))?
    }
}

/// Reads the whole body up to `limit` bytes; ureq's own `into_string` stops at 10 MB.
fn read_body(response: ureq::Response, limit: u64) -> Result<String, TransportError> {
    let mut bytes = Vec::new();
    response
        .into_reader()
        .take(limit.saturating_add(1))
        .read_to_end(&mut bytes)
        .map_err(|err| TransportError::Connection(err.to_string()))?;
    if bytes.len() as u64 > limit {
        return Err(TransportError::TooLarge(limit));
    }
    String::from_utf8(bytes)
        .map_err(|err| TransportError::Connection(format!("response is not UTF-8: {err}")))
}
