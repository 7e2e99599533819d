//! Recording fake transport shared by the gateway tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::client::HealthEventClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::Transport;

use super::RemoteGateway;

pub(crate) const BASE_URL: &str = "http://farm.test/api";

/// Replays queued outcomes in order and records every request it sees.
/// Once the queue is empty every call fails with a transport error.
#[derive(Default)]
pub(crate) struct FakeTransport {
    outcomes: Mutex<VecDeque<Result<HttpResponse, ApiError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl FakeTransport {
    pub(crate) fn respond(self, status: u16, body: &str) -> Self {
        self.outcomes.lock().unwrap().push_back(Ok(HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }));
        self
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn paths(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.path).collect()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        self.requests.lock().unwrap().push(request);
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Transport("connection refused".to_string())))
    }
}

pub(crate) fn remote(transport: Arc<FakeTransport>) -> RemoteGateway<Arc<FakeTransport>> {
    RemoteGateway::new(HealthEventClient::new(BASE_URL), transport)
}
