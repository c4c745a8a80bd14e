// File: predicate.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - Volker Schwaberow <volker@schwaberow.de>

use crate::errors::{ConfigError, ConfigResult};
use regex::bytes::Regex;
use std::fmt;

pub const DEFAULT_SUCCESS_MARKER: &str = "200 OK";

/// Decides whether the bytes of the single read count as a pass.
#[derive(Debug, Clone)]
pub enum SuccessPredicate {
    Contains(Vec<u8>),
    Matches(Regex),
}

impl SuccessPredicate {
    pub fn marker(marker: &str) -> ConfigResult<Self> {
        if marker.is_empty() {
            return Err(ConfigError::InvalidMarker(
                "marker must not be empty".to_string(),
            ));
        }
        Ok(SuccessPredicate::Contains(marker.as_bytes().to_vec()))
    }

    pub fn pattern(pattern: &str) -> ConfigResult<Self> {
        Ok(SuccessPredicate::Matches(Regex::new(pattern)?))
    }

    pub fn is_satisfied_by(&self, response: &[u8]) -> bool {
        match self {
            SuccessPredicate::Contains(marker) if marker.is_empty() => true,
            SuccessPredicate::Contains(marker) => response
                .windows(marker.len())
                .any(|window| window == marker.as_slice()),
            SuccessPredicate::Matches(regex) => regex.is_match(response),
        }
    }
}

impl Default for SuccessPredicate {
    fn default() -> Self {
        SuccessPredicate::Contains(DEFAULT_SUCCESS_MARKER.as_bytes().to_vec())
    }
}

impl fmt::Display for SuccessPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SuccessPredicate::Contains(marker) => {
                write!(f, "contains {:?}", String::from_utf8_lossy(marker))
            }
            SuccessPredicate::Matches(regex) => write!(f, "matches /{}/", regex.as_str()),
        }
    }
}
