//! Task lifecycle codes and their client-side classification
//!
//! The remote agent is the sole authority over task transitions. This module
//! only names the codes it reports and classifies them; nothing here drives
//! or validates a transition.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Lifecycle code reported by the agent gateway
///
/// Codes the client does not know are kept verbatim in [`StatusCode::Unknown`]
/// so that newer gateways never break decoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StatusCode {
    /// User input is being analyzed
    Interpreting,

    /// Reasoning frame in a stream
    Thinking,

    /// The agent needs more input from the caller
    WaitingUser,

    /// Task accepted and queued
    TaskAccepted,

    /// Task is executing
    TaskRunning,

    /// Task finished successfully
    TaskCompleted,

    /// Task finished with an error
    TaskFailed,

    /// Task was cancelled
    TaskCancelled,

    /// Out-of-scope input or bad parameters
    InvalidRequest,

    /// Authentication failure
    Unauthorized,

    /// Not enough credits
    InsufficientCredits,

    /// Unsupported intent
    InvalidIntent,

    /// Too many requests
    RateLimited,

    /// Downstream service unavailable
    TargetUnavailable,

    /// No response within the allowed window
    Timeout,

    /// Any code this client does not know
    Unknown(String),
}

impl StatusCode {
    /// Wire representation of the code
    pub fn as_str(&self) -> &str {
        match self {
            StatusCode::Interpreting => "INTERPRETING",
            StatusCode::Thinking => "THINKING",
            StatusCode::WaitingUser => "WAITING_USER",
            StatusCode::TaskAccepted => "TASK_ACCEPTED",
            StatusCode::TaskRunning => "TASK_RUNNING",
            StatusCode::TaskCompleted => "TASK_COMPLETED",
            StatusCode::TaskFailed => "TASK_FAILED",
            StatusCode::TaskCancelled => "TASK_CANCELLED",
            StatusCode::InvalidRequest => "INVALID_REQUEST",
            StatusCode::Unauthorized => "UNAUTHORIZED",
            StatusCode::InsufficientCredits => "INSUFFICIENT_CREDITS",
            StatusCode::InvalidIntent => "INVALID_INTENT",
            StatusCode::RateLimited => "RATE_LIMITED",
            StatusCode::TargetUnavailable => "TARGET_UNAVAILABLE",
            StatusCode::Timeout => "TIMEOUT",
            StatusCode::Unknown(code) => code,
        }
    }

    /// Whether the agent is waiting for more caller input
    ///
    /// This is the single decision point every adapter uses to decide when to
    /// solicit more input.
    pub fn needs_user_input(&self) -> bool {
        matches!(self, StatusCode::WaitingUser)
    }

    /// Whether no further progress will happen on this task
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            StatusCode::TaskCompleted | StatusCode::TaskFailed | StatusCode::TaskCancelled
        ) || self.is_error()
    }

    /// Whether this is an error-class code
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            StatusCode::InvalidRequest
                | StatusCode::Unauthorized
                | StatusCode::InsufficientCredits
                | StatusCode::InvalidIntent
                | StatusCode::RateLimited
                | StatusCode::TargetUnavailable
                | StatusCode::Timeout
        )
    }

    /// Whether a `success: false` response with this code is a hard failure
    pub fn is_fatal(&self) -> bool {
        matches!(self, StatusCode::TaskFailed | StatusCode::TaskCancelled) || self.is_error()
    }

    /// Coarse run state for hosts that only know five states
    pub fn run_status(&self) -> RunStatus {
        match self {
            StatusCode::WaitingUser => RunStatus::RequiresAction,
            StatusCode::TaskCompleted => RunStatus::Completed,
            StatusCode::TaskCancelled => RunStatus::Cancelled,
            StatusCode::TaskFailed => RunStatus::Failed,
            code if code.is_error() => RunStatus::Failed,
            _ => RunStatus::InProgress,
        }
    }
}

/// Free-function form of [`StatusCode::needs_user_input`]
pub fn needs_user_input(code: &StatusCode) -> bool {
    code.needs_user_input()
}

impl FromStr for StatusCode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "INTERPRETING" => StatusCode::Interpreting,
            "THINKING" => StatusCode::Thinking,
            "WAITING_USER" => StatusCode::WaitingUser,
            "TASK_ACCEPTED" => StatusCode::TaskAccepted,
            "TASK_RUNNING" => StatusCode::TaskRunning,
            "TASK_COMPLETED" => StatusCode::TaskCompleted,
            "TASK_FAILED" => StatusCode::TaskFailed,
            "TASK_CANCELLED" => StatusCode::TaskCancelled,
            "INVALID_REQUEST" => StatusCode::InvalidRequest,
            "UNAUTHORIZED" => StatusCode::Unauthorized,
            "INSUFFICIENT_CREDITS" => StatusCode::InsufficientCredits,
            "INVALID_INTENT" => StatusCode::InvalidIntent,
            "RATE_LIMITED" => StatusCode::RateLimited,
            "TARGET_UNAVAILABLE" => StatusCode::TargetUnavailable,
            "TIMEOUT" => StatusCode::Timeout,
            other => StatusCode::Unknown(other.to_string()),
        })
    }
}

impl From<&str> for StatusCode {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(code) => code,
            Err(never) => match never {},
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for StatusCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for StatusCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(StatusCode::from(s.as_str()))
    }
}

/// Coarse run state used by OpenAI-style agent runtimes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    InProgress,
    RequiresAction,
    Completed,
    Failed,
    Cancelled,
}

/// Processing stage reported alongside a code
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Stage {
    Interpreting,
    Executing,
    Completed,
    Cancelled,
    Unknown(String),
}

impl Stage {
    pub fn as_str(&self) -> &str {
        match self {
            Stage::Interpreting => "interpreting",
            Stage::Executing => "executing",
            Stage::Completed => "completed",
            Stage::Cancelled => "cancelled",
            Stage::Unknown(stage) => stage,
        }
    }
}

impl From<&str> for Stage {
    fn from(s: &str) -> Self {
        match s {
            "interpreting" => Stage::Interpreting,
            "executing" => Stage::Executing,
            "completed" => Stage::Completed,
            "cancelled" => Stage::Cancelled,
            other => Stage::Unknown(other.to_string()),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Stage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Stage {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Stage::from(s.as_str()))
    }
}
