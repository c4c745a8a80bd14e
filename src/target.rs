// File: target.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2025
// - Volker Schwaberow <volker@schwaberow.de>

use crate::errors::{ConfigError, ConfigResult};
use std::fmt;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3000;

/// The server under test. Fixed for the lifetime of a probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeTarget {
    host: String,
    port: u16,
}

impl ProbeTarget {
    pub fn new(host: &str, port: u16) -> ConfigResult<Self> {
        let host = host.trim();
        if host.is_empty() {
            return Err(ConfigError::InvalidTarget("empty host".to_string()));
        }
        if host.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(ConfigError::InvalidTarget(format!(
                "host contains invalid characters: {:?}",
                host
            )));
        }
        if port == 0 {
            return Err(ConfigError::InvalidTarget("port must not be 0".to_string()));
        }

        let host = host
            .strip_prefix('[')
            .and_then(|h| h.strip_suffix(']'))
            .unwrap_or(host);

        Ok(Self {
            host: host.to_string(),
            port,
        })
    }

    /// Accepts `host`, `host:port` and `[v6]:port`. A bare host gets
    /// `default_port`.
    pub fn parse(input: &str, default_port: u16) -> ConfigResult<Self> {
        let input = input.trim();

        if let Some(rest) = input.strip_prefix('[') {
            let (host, tail) = rest
                .split_once(']')
                .ok_or_else(|| ConfigError::InvalidTarget(format!("unclosed bracket in {}", input)))?;
            let port = match tail.strip_prefix(':') {
                Some(port) => parse_port(port)?,
                None if tail.is_empty() => default_port,
                None => {
                    return Err(ConfigError::InvalidTarget(format!(
                        "unexpected text after address: {}",
                        tail
                    )))
                }
            };
            return Self::new(host, port);
        }

        match input.rsplit_once(':') {
            // More than one colon without brackets is an IPv6 literal.
            Some((host, _)) if host.contains(':') => Self::new(input, default_port),
            Some((host, port)) => Self::new(host, parse_port(port)?),
            None => Self::new(input, default_port),
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Address string suitable for `TcpStream::connect`.
    pub fn connect_addr(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

impl Default for ProbeTarget {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl fmt::Display for ProbeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.connect_addr())
    }
}

fn parse_port(port: &str) -> ConfigResult<u16> {
    port.parse::<u16>()
        .map_err(|_| ConfigError::InvalidTarget(format!("invalid port: {:?}", port)))
}
