//! Fake AI client for testing.
//!
//! Returns a fixed reply for every call and records the requests it received,
//! so tests run without network access or API costs.

use async_trait::async_trait;
use std::sync::Mutex;

use super::client::{AiClient, AiError};
use super::types::{ChatCompletion, ChatRequest};

#[derive(Debug, Clone)]
enum FakeReply {
    Completion(ChatCompletion),
    Status { status: u16, message: String },
    Transport(String),
}

#[derive(Debug)]
pub struct FakeAiClient {
    reply: FakeReply,
    requests: Mutex<Vec<ChatRequest>>,
}

impl FakeAiClient {
    fn new(reply: FakeReply) -> Self {
        Self {
            reply,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Answer with one choice whose content is `content`.
    pub fn with_content(content: &str) -> Self {
        Self::new(FakeReply::Completion(ChatCompletion::with_content(content)))
    }

    /// Answer with an arbitrary envelope, e.g. one with no choices.
    pub fn with_completion(completion: ChatCompletion) -> Self {
        Self::new(FakeReply::Completion(completion))
    }

    /// Fail as if the API answered with a non-success status.
    pub fn with_status(status: u16, message: &str) -> Self {
        Self::new(FakeReply::Status {
            status,
            message: message.to_string(),
        })
    }

    /// Fail as if the connection broke.
    pub fn with_transport_error(message: &str) -> Self {
        Self::new(FakeReply::Transport(message.to_string()))
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or_default()
    }
}

#[async_trait]
impl AiClient for FakeAiClient {
    async fn complete(&self, request: ChatRequest) -> Result<ChatCompletion, AiError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }

        match &self.reply {
            FakeReply::Completion(completion) => Ok(completion.clone()),
            FakeReply::Status { status, message } => Err(AiError::Api {
                status: *status,
                message: message.clone(),
            }),
            FakeReply::Transport(message) => Err(AiError::Request(message.clone())),
        }
    }

    fn model_name(&self) -> &str {
        "fake-model"
    }

    fn max_tokens(&self) -> u32 {
        2000
    }
}
