// File: request.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - Volker Schwaberow <volker@schwaberow.de>

use crate::errors::{ConfigError, ConfigResult};

pub const DEFAULT_PATH: &str = "/index.html";
pub const DEFAULT_HOST_HEADER: &str = "127.0.0.1";

const HEAD_TERMINATOR: &[u8] = b"\r\n\r\n";

/// The GET request the probe sends, before it is split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTemplate {
    path: String,
    host_header: String,
}

impl RequestTemplate {
    pub fn new(path: &str, host_header: &str) -> ConfigResult<Self> {
        if !path.starts_with('/') {
            return Err(ConfigError::MalformedRequest(format!(
                "path must start with '/': {:?}",
                path
            )));
        }
        if path.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(ConfigError::MalformedRequest(format!(
                "path contains whitespace or control characters: {:?}",
                path
            )));
        }
        if host_header.is_empty() || host_header.chars().any(|c| c.is_control()) {
            return Err(ConfigError::MalformedRequest(format!(
                "invalid Host header value: {:?}",
                host_header
            )));
        }

        Ok(Self {
            path: path.to_string(),
            host_header: host_header.to_string(),
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn host_header(&self) -> &str {
        &self.host_header
    }

    pub fn render(&self) -> Vec<u8> {
        format!(
            "GET {} HTTP/1.1\r\nHost: {}\r\nConnection: keep-alive\r\n\r\n",
            self.path, self.host_header
        )
        .into_bytes()
    }
}

impl Default for RequestTemplate {
    fn default() -> Self {
        Self {
            path: DEFAULT_PATH.to_string(),
            host_header: DEFAULT_HOST_HEADER.to_string(),
        }
    }
}

/// Checks that `bytes` is one complete request head: a three token request
/// line with an HTTP version, `name: value` header lines and the blank line
/// terminator, with nothing after it.
pub fn validate_request(bytes: &[u8]) -> ConfigResult<()> {
    let head_len = bytes
        .windows(HEAD_TERMINATOR.len())
        .position(|w| w == HEAD_TERMINATOR)
        .map(|pos| pos + HEAD_TERMINATOR.len())
        .ok_or_else(|| {
            ConfigError::MalformedRequest("missing terminating blank line".to_string())
        })?;

    if head_len != bytes.len() {
        return Err(ConfigError::MalformedRequest(format!(
            "{} trailing bytes after the request head",
            bytes.len() - head_len
        )));
    }

    let head = std::str::from_utf8(&bytes[..head_len - HEAD_TERMINATOR.len()])
        .map_err(|_| ConfigError::MalformedRequest("request head is not UTF-8".to_string()))?;
    let mut lines = head.split("\r\n");

    let request_line = lines.next().unwrap_or_default();
    let tokens: Vec<&str> = request_line.split(' ').collect();
    if tokens.len() != 3 || tokens.iter().any(|t| t.is_empty()) {
        return Err(ConfigError::MalformedRequest(format!(
            "invalid request line: {:?}",
            request_line
        )));
    }
    if !tokens[2].starts_with("HTTP/") {
        return Err(ConfigError::MalformedRequest(format!(
            "invalid HTTP version: {:?}",
            tokens[2]
        )));
    }

    for line in lines {
        match line.split_once(':') {
            Some((name, _)) if !name.is_empty() && !name.contains(' ') => {}
            _ => {
                return Err(ConfigError::MalformedRequest(format!(
                    "invalid header line: {:?}",
                    line
                )))
            }
        }
    }

    Ok(())
}
