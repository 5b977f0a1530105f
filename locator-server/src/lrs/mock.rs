//! Mock transport for running without the lookup service.
//!
//! Serves canned JSON bodies, either loaded from a directory or scripted
//! one reply at a time. Scripted replies can be held back until released,
//! which lets tests choose the order concurrent lookups settle in.

use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::sync::Mutex;

use tokio::sync::oneshot;

use super::error::LookupError;
use super::transport::LookupTransport;
use super::types::{LookupRequest, Operation};

/// A one-shot reply, optionally held until its gate is released.
struct ScriptedReply {
    body: Result<String, String>,
    gate: Option<oneshot::Receiver<()>>,
}

/// Mock transport serving canned responses.
#[derive(Default)]
pub struct MockTransport {
    /// Bodies served for every request to an operation.
    fixtures: HashMap<Operation, String>,
    /// Replies served once each, in order, before falling back to fixtures.
    scripted: Mutex<VecDeque<ScriptedReply>>,
    /// Every request received, for inspection.
    requests: Mutex<Vec<LookupRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load fixtures from a directory.
    ///
    /// Expects files named after the endpoints (`geometryToStation.json`,
    /// `stationToGeometry.json`); at least one must exist.
    pub fn from_dir(data_dir: impl AsRef<Path>) -> Result<Self, LookupError> {
        let data_dir = data_dir.as_ref();
        let mut fixtures = HashMap::new();

        for operation in [Operation::GeometryToStation, Operation::StationToGeometry] {
            let path = data_dir.join(format!("{}.json", operation.endpoint()));
            if !path.is_file() {
                continue;
            }
            let body = std::fs::read_to_string(&path)
                .map_err(|e| LookupError::Mock(format!("failed to read {path:?}: {e}")))?;
            fixtures.insert(operation, body);
        }

        if fixtures.is_empty() {
            return Err(LookupError::Mock(format!(
                "no fixture files found in {data_dir:?}"
            )));
        }

        Ok(Self {
            fixtures,
            ..Self::default()
        })
    }

    /// Serve `body` for every request to `operation`.
    pub fn with_fixture(mut self, operation: Operation, body: impl Into<String>) -> Self {
        self.fixtures.insert(operation, body.into());
        self
    }

    /// Queue a body to be served once.
    pub fn push_reply(&self, body: impl Into<String>) {
        self.push(ScriptedReply {
            body: Ok(body.into()),
            gate: None,
        });
    }

    /// Queue a transport failure to be served once.
    pub fn push_failure(&self, message: impl Into<String>) {
        self.push(ScriptedReply {
            body: Err(message.into()),
            gate: None,
        });
    }

    /// Queue a body that is only delivered once the returned sender fires.
    pub fn push_gated_reply(&self, body: impl Into<String>) -> oneshot::Sender<()> {
        let (release, gate) = oneshot::channel();
        self.push(ScriptedReply {
            body: Ok(body.into()),
            gate: Some(gate),
        });
        release
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<LookupRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    fn push(&self, reply: ScriptedReply) {
        if let Ok(mut scripted) = self.scripted.lock() {
            scripted.push_back(reply);
        }
    }

    fn next_scripted(&self) -> Option<ScriptedReply> {
        self.scripted.lock().ok()?.pop_front()
    }
}

impl std::fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockTransport")
            .field("fixtures", &self.fixtures.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl LookupTransport for MockTransport {
    async fn fetch(&self, request: &LookupRequest) -> Result<String, LookupError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        if let Some(reply) = self.next_scripted() {
            if let Some(gate) = reply.gate {
                // A dropped sender releases the reply too
                let _ = gate.await;
            }
            return reply.body.map_err(LookupError::Mock);
        }

        self.fixtures
            .get(&request.operation)
            .cloned()
            .ok_or_else(|| {
                LookupError::Mock(format!(
                    "no response for {}. Available: {:?}",
                    request.operation.endpoint(),
                    self.fixtures.keys().map(|op| op.endpoint()).collect::<Vec<_>>()
                ))
            })
    }
}
