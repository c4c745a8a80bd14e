// File: errors.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - Volker Schwaberow <volker@schwaberow.de>

use std::fmt;

#[derive(Debug)]
pub enum ConfigError {
    InvalidTarget(String),
    InvalidSplit(String),
    MalformedRequest(String),
    InvalidMarker(String),
    InvalidPattern(regex::Error),
    InvalidValue(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTarget(msg) => write!(f, "Invalid target: {}", msg),
            Self::InvalidSplit(msg) => write!(f, "Invalid split: {}", msg),
            Self::MalformedRequest(msg) => write!(f, "Malformed request: {}", msg),
            Self::InvalidMarker(msg) => write!(f, "Invalid success marker: {}", msg),
            Self::InvalidPattern(e) => write!(f, "Invalid success pattern: {}", e),
            Self::InvalidValue(msg) => write!(f, "Invalid value: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidPattern(e) => Some(e),
            _ => None,
        }
    }
}

impl From<regex::Error> for ConfigError {
    fn from(error: regex::Error) -> Self {
        Self::InvalidPattern(error)
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;
