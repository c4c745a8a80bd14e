// File: outcome.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - Volker Schwaberow <volker@schwaberow.de>

use once_cell::sync::Lazy;
use regex::bytes::Regex;
use serde::Serialize;
use std::fmt;
use std::io;

static STATUS_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^HTTP/\d(?:\.\d)? \d{3}(?: [^\r\n]*)?").unwrap());

pub const TIMED_OUT: &str = "timed out";

/// Where in the exchange a transport failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeStage {
    Connect,
    Send,
    Receive,
}

impl fmt::Display for ProbeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeStage::Connect => write!(f, "connect"),
            ProbeStage::Send => write!(f, "send"),
            ProbeStage::Receive => write!(f, "receive"),
        }
    }
}

/// Ordered from best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    Success,
    InvalidResponse,
    ConnectionError,
}

impl OutcomeKind {
    pub fn exit_code(&self) -> i32 {
        match self {
            OutcomeKind::Success => 0,
            OutcomeKind::InvalidResponse => 1,
            OutcomeKind::ConnectionError => 3,
        }
    }
}

impl fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutcomeKind::Success => write!(f, "success"),
            OutcomeKind::InvalidResponse => write!(f, "invalid response"),
            OutcomeKind::ConnectionError => write!(f, "connection error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// The read completed but the success predicate did not hold.
    InvalidResponse(Vec<u8>),
    ConnectionError { stage: ProbeStage, detail: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeResult {
    Success(Vec<u8>),
    Failure(FailureReason),
}

impl ProbeResult {
    pub fn invalid_response(response: Vec<u8>) -> Self {
        ProbeResult::Failure(FailureReason::InvalidResponse(response))
    }

    pub fn connection_error(stage: ProbeStage, detail: impl Into<String>) -> Self {
        ProbeResult::Failure(FailureReason::ConnectionError {
            stage,
            detail: detail.into(),
        })
    }

    pub fn from_io_error(stage: ProbeStage, error: &io::Error) -> Self {
        Self::connection_error(stage, describe_io_error(error))
    }

    pub fn timed_out(stage: ProbeStage) -> Self {
        Self::connection_error(stage, TIMED_OUT)
    }

    pub fn kind(&self) -> OutcomeKind {
        match self {
            ProbeResult::Success(_) => OutcomeKind::Success,
            ProbeResult::Failure(FailureReason::InvalidResponse(_)) => OutcomeKind::InvalidResponse,
            ProbeResult::Failure(FailureReason::ConnectionError { .. }) => {
                OutcomeKind::ConnectionError
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ProbeResult::Success(_))
    }

    /// Bytes of the completed read, if there was one.
    pub fn response(&self) -> Option<&[u8]> {
        match self {
            ProbeResult::Success(response)
            | ProbeResult::Failure(FailureReason::InvalidResponse(response)) => {
                Some(response.as_slice())
            }
            ProbeResult::Failure(FailureReason::ConnectionError { .. }) => None,
        }
    }

    pub fn stage(&self) -> Option<ProbeStage> {
        match self {
            ProbeResult::Failure(FailureReason::ConnectionError { stage, .. }) => Some(*stage),
            _ => None,
        }
    }

    pub fn detail(&self) -> Option<&str> {
        match self {
            ProbeResult::Failure(FailureReason::ConnectionError { detail, .. }) => {
                Some(detail.as_str())
            }
            _ => None,
        }
    }

    /// First `max_len` bytes of the response with non-printable bytes escaped.
    pub fn excerpt(&self, max_len: usize) -> Option<String> {
        self.response().map(|response| {
            let end = response.len().min(max_len);
            response[..end].escape_ascii().to_string()
        })
    }

    pub fn status_line(&self) -> Option<String> {
        self.response()
            .and_then(|response| STATUS_LINE.find(response))
            .map(|m| String::from_utf8_lossy(m.as_bytes()).into_owned())
    }

    pub fn verdict(&self) -> String {
        match self {
            ProbeResult::Success(_) => "PASS (Successfully handled split packets)".to_string(),
            ProbeResult::Failure(FailureReason::InvalidResponse(_)) => {
                "FAIL (Invalid response)".to_string()
            }
            ProbeResult::Failure(FailureReason::ConnectionError { stage, detail }) => {
                format!("FAIL (Connection Error: {}: {})", stage, detail)
            }
        }
    }

    pub fn exit_code(&self) -> i32 {
        self.kind().exit_code()
    }
}

pub fn describe_io_error(error: &io::Error) -> String {
    match error.kind() {
        io::ErrorKind::ConnectionRefused => "connection refused".to_string(),
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMED_OUT.to_string(),
        io::ErrorKind::ConnectionReset => "connection reset".to_string(),
        io::ErrorKind::ConnectionAborted => "connection aborted".to_string(),
        io::ErrorKind::BrokenPipe => "broken pipe".to_string(),
        _ => error.to_string(),
    }
}
