//! Wire types exchanged with the backend

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// A tracked symbol
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    pub symbol: String,
    /// Display name, when the backend knows one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Stock {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            name: None,
        }
    }
}

/// Body of `POST /stocks`
#[derive(Debug, Serialize)]
pub(crate) struct AddStockRequest<'a> {
    pub symbol: &'a str,
}

/// Error body returned by the backend on rejected mutations
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorDetail {
    pub detail: String,
}

/// Handle returned by `POST /analyze/start`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisTask {
    pub task_id: String,
}

/// State reported by `GET /analyze/status/{task_id}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TaskState {
    Pending,
    Success,
    Failure,
    /// Any other worker state (STARTED, RETRY, ...), treated as still running
    #[serde(other)]
    Other,
}

impl TaskState {
    /// SUCCESS and FAILURE end a poll loop, everything else keeps it going
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskState::Success | TaskState::Failure)
    }
}

/// One poll response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskStatus {
    pub state: TaskState,

    /// Raw job result; only meaningful once `state` is SUCCESS
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Human readable progress note sent with PENDING
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl TaskStatus {
    pub fn pending() -> Self {
        Self {
            state: TaskState::Pending,
            result: None,
            error: None,
            status: None,
        }
    }

    pub fn success(whispers: &[Whisper]) -> Result<Self> {
        Ok(Self {
            state: TaskState::Success,
            result: Some(serde_json::to_value(whispers)?),
            error: None,
            status: None,
        })
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            state: TaskState::Failure,
            result: None,
            error: Some(error.into()),
            status: None,
        }
    }

    /// Decode the job result as whispers
    ///
    /// A missing or null result is an empty list.
    pub fn whispers(&self) -> Result<Vec<Whisper>> {
        match &self.result {
            None | Some(serde_json::Value::Null) => Ok(Vec::new()),
            Some(value) => Ok(Vec::<Whisper>::deserialize(value)?),
        }
    }
}

/// A single market signal produced by the analysis job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Whisper {
    pub symbol: String,
    /// NEWS, MOVEMENT, MERGER, ...
    #[serde(rename = "type")]
    pub kind: String,
    /// HIGH, MEDIUM, LOW
    pub severity: String,
    pub message: String,
    pub reasoning: String,
    /// BUY, SELL, HOLD
    pub action: String,
}
