//! Mock CamConnection for unit testing
//!
//! Replies are queued up front and handed out in order; every submitted
//! request is recorded so tests can assert on what would have gone on the wire.

use crate::connection::{CamConnection, DEFAULT_USER_AGENT};
use crate::error::{ConnectionError, DecodeError, InvalidArgument};
use crate::request::CamRequest;
use crate::response::{CamResponse, Row};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

/// A reply the mock hands back for the next request
#[derive(Debug)]
pub enum MockReply {
    Response(CamResponse),
    Error(ConnectionError),
}

/// Mock connection for testing
///
/// Clones share the same reply queue and request log.
#[derive(Debug, Clone)]
pub struct MockCamConnection {
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    requests: Arc<Mutex<Vec<CamRequest>>>,
    user_agent: String,
}

impl Default for MockCamConnection {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCamConnection {
    /// Create a new mock connection with an empty reply queue
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Queue a successful 200 response built from `rows`
    pub fn push_rows(&self, rows: Vec<Row>) {
        self.push_response(CamResponse::from_rows(200, rows));
    }

    /// Queue a 200 response whose first row carries the error marker
    pub fn push_api_error(&self, message: &str) {
        let marker: Row = [("error", "true"), ("message", message)].into_iter().collect();
        self.push_rows(vec![marker]);
    }

    /// Queue an arbitrary response
    pub fn push_response(&self, response: CamResponse) {
        lock(&self.replies).push_back(MockReply::Response(response));
    }

    /// Queue a transport failure
    pub fn push_error(&self, error: ConnectionError) {
        lock(&self.replies).push_back(MockReply::Error(error));
    }

    /// Requests submitted so far, oldest first
    pub fn requests(&self) -> Vec<CamRequest> {
        lock(&self.requests).clone()
    }

    /// The most recent request, if any
    pub fn last_request(&self) -> Option<CamRequest> {
        lock(&self.requests).last().cloned()
    }

    /// Replies queued but not yet consumed
    pub fn pending(&self) -> usize {
        lock(&self.replies).len()
    }
}

impl CamConnection for MockCamConnection {
    fn submit_request(&self, request: &CamRequest) -> Result<CamResponse, ConnectionError> {
        lock(&self.requests).push(request.clone());
        match lock(&self.replies).pop_front() {
            Some(MockReply::Response(response)) => Ok(response),
            Some(MockReply::Error(error)) => Err(error),
            None => Err(ConnectionError::Decode(DecodeError::Markup(format!(
                "no mock reply queued for op={}",
                request.operation()
            )))),
        }
    }

    fn user_agent(&self) -> &str {
        &self.user_agent
    }

    fn set_user_agent(&mut self, user_agent: &str) -> Result<(), InvalidArgument> {
        if user_agent.trim().is_empty() {
            return Err(InvalidArgument::new("user agent cannot be empty"));
        }
        self.user_agent = user_agent.to_string();
        Ok(())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
