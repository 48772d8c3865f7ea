use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use super::{HttpTransport, JsonRequest, JsonResponse, TransportError};

/// Scripted transport: each route matches a URL fragment and pops queued replies in order.
#[derive(Default)]
pub(crate) struct MockTransport {
    routes: Mutex<Vec<(String, VecDeque<Result<JsonResponse, TransportError>>)>>,
    requests: Mutex<Vec<JsonRequest>>,
    latency: Option<Duration>,
}

impl MockTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Delays every reply, so tests can overlap calls.
    pub(crate) fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub(crate) fn reply(self, fragment: &str, status: u16, body: Value) -> Self {
        self.push(
            fragment,
            Ok(JsonResponse {
                status,
                body: body.to_string(),
            }),
        )
    }

    pub(crate) fn reply_raw(self, fragment: &str, status: u16, body: &str) -> Self {
        self.push(
            fragment,
            Ok(JsonResponse {
                status,
                body: body.to_string(),
            }),
        )
    }

    pub(crate) fn fail(self, fragment: &str, error: TransportError) -> Self {
        self.push(fragment, Err(error))
    }

    fn push(self, fragment: &str, reply: Result<JsonResponse, TransportError>) -> Self {
        {
            let mut routes = self.routes.lock().expect("routes lock poisoned");
            match routes.iter_mut().find(|(key, _)| key == fragment) {
                Some((_, queue)) => queue.push_back(reply),
                None => routes.push((fragment.to_string(), VecDeque::from([reply]))),
            }
        }
        self
    }

    pub(crate) fn requests(&self) -> Vec<JsonRequest> {
        self.requests.lock().expect("requests lock poisoned").clone()
    }

    pub(crate) fn request_count(&self) -> usize {
        self.requests.lock().expect("requests lock poisoned").len()
    }

    pub(crate) fn requests_to(&self, fragment: &str) -> Vec<JsonRequest> {
        self.requests()
            .into_iter()
            .filter(|request| request.url.contains(fragment))
            .collect()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn post_json(&self, request: JsonRequest) -> Result<JsonResponse, TransportError> {
        self.requests
            .lock()
            .expect("requests lock poisoned")
            .push(request.clone());
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let mut routes = self.routes.lock().expect("routes lock poisoned");
        let queue = routes
            .iter_mut()
            .find(|(fragment, _)| request.url.contains(fragment.as_str()))
            .map(|(_, queue)| queue);

        match queue.and_then(|queue| queue.pop_front()) {
            Some(reply) => reply,
            None => Err(TransportError::Connection(format!(
                "no scripted reply for {}",
                request.url
            ))),
        }
    }
}
